use relq::prelude::*;
use relq::{Phase, SQLValue};

use crate::common::{Person, Pet, person, pet, setup_db};

fn seeded() -> relq::sqlite::SqliteAdaptor {
    let mut db = setup_db();
    for (name, age) in [("Ann", 31), ("Bob", 17), ("Cid", 31), ("Dee", 45)] {
        Person::insert(&mut db, &person(name, age)).unwrap();
    }
    let nobody = Person {
        name: "Eve".into(),
        ..Default::default()
    };
    Person::insert(&mut db, &nobody).unwrap();
    db
}

#[test]
fn exec_matches_to_sql() {
    let mut db = seeded();
    let mut relation = Person::r#where(Person::age().ge(18))
        .order_by(Person::name(), Order::Asc)
        .offset(1);
    assert!(
        relation
            .to_sql(db.dialect())
            .unwrap()
            .sql
            .ends_with("LIMIT -1 OFFSET 1")
    );

    let people = relation.exec(&mut db).unwrap();
    let names: Vec<_> = people.iter().map(|p| p.name.to_string()).collect();
    assert_eq!(names, ["Cid", "Dee"]);
    assert_eq!(relation.phase(), Phase::Finalized);
    assert!(matches!(relation.exec(&mut db), Err(Error::Usage(_))));
}

#[test]
fn aggregates() {
    let mut db = seeded();
    assert_eq!(Person::all().sum(&mut db, Person::age()).unwrap(), Some(124));
    assert_eq!(Person::all().min(&mut db, Person::age()).unwrap(), Some(17));
    assert_eq!(Person::all().max(&mut db, Person::name()).unwrap(), Some("Eve".to_string()));
    assert_eq!(Person::all().avg(&mut db, Person::age()).unwrap(), Some(31.0));
    assert_eq!(Person::all().count(&mut db).unwrap(), 5);
    assert_eq!(Person::all().count_of(&mut db, Person::age()).unwrap(), 4);

    let none = || Person::r#where(Person::age().gt(100));
    assert_eq!(none().sum(&mut db, Person::age()).unwrap(), None);
    assert_eq!(none().avg(&mut db, Person::age()).unwrap(), None);
    assert_eq!(none().max(&mut db, Person::age()).unwrap(), None);
    assert_eq!(none().count(&mut db).unwrap(), 0);
}

#[test]
fn grouped_counts() {
    let mut db = seeded();
    let counts = Person::all().count_by(&mut db, Person::age()).unwrap();
    assert_eq!(counts.len(), 4);
    assert_eq!(counts[&Some(31)], 2);
    assert_eq!(counts[&None], 1);

    let err = Person::all()
        .group_by(Person::age())
        .count(&mut db)
        .unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
}

#[test]
fn select_projects_attribute_tuples() {
    let mut db = seeded();
    let rows = Person::select((Person::name(), Person::age()))
        .r#where(Person::age().is_null())
        .exec(&mut db)
        .unwrap();
    assert_eq!(rows.len(), 1);
    let (name, age) = &rows[0];
    assert_eq!(name.to_string(), "Eve");
    assert!(age.is_null());
}

#[test]
fn in_set_edges() {
    let mut db = seeded();
    let some = Person::r#where(Person::name().in_set(["Ann", "Dee", "Ann"]))
        .count(&mut db)
        .unwrap();
    assert_eq!(some, 2);

    let none = Person::r#where(Person::name().in_set(Vec::<String>::new()))
        .count(&mut db)
        .unwrap();
    assert_eq!(none, 0);

    let all = Person::r#where(Person::name().not_in_set(Vec::<String>::new()))
        .count(&mut db)
        .unwrap();
    assert_eq!(all, 5);
}

#[test]
fn updates() {
    let mut db = seeded();
    let changed = Person::r#where(Person::age().eq(31))
        .update(&mut db, &[Person::age().set(32), Person::active().set(false)])
        .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(
        Person::r#where(Person::age().eq(32).and(Person::active().eq(false)))
            .count(&mut db)
            .unwrap(),
        2
    );

    assert!(matches!(
        Person::all().update(&mut db, &[Person::age().set(0)]),
        Err(Error::Usage(_))
    ));
    assert_eq!(
        Person::all()
            .update_all(&mut db, &[Person::score().set(1.5)])
            .unwrap(),
        5
    );
    assert_eq!(
        Person::all()
            .pluck(&mut db, Person::score())
            .unwrap()
            .into_iter()
            .flatten()
            .sum::<f64>(),
        7.5
    );
}

#[test]
fn joins() {
    let mut db = seeded();
    let ann = Person::find(&mut db, 1i64).unwrap().unwrap();
    assert_eq!(ann.name.to_string(), "Ann");
    let ann_id = *ann.id.value().unwrap();

    Pet::insert(&mut db, &pet(ann_id, "Rex", 4)).unwrap();
    Pet::insert(&mut db, &pet(ann_id, "Tweety", 2)).unwrap();
    Pet::insert(&mut db, &pet(4, "Nemo", 0)).unwrap();

    let mut relation = Pet::all()
        .join::<Person>(Pet::owner_id().eq_column(Person::id()))
        .r#where(Person::name().eq("Ann"))
        .order_by(Pet::name(), Order::Asc);
    let pets = relation.exec(&mut db).unwrap();
    let names: Vec<_> = pets.iter().map(|p| p.name.to_string()).collect();
    assert_eq!(names, ["Rex", "Tweety"]);

    let legs = Pet::all()
        .left_join::<Person>(Pet::owner_id().eq_column(Person::id()))
        .r#where(Person::age().gt(40))
        .pluck(&mut db, (Pet::name(), Person::name()))
        .unwrap();
    assert_eq!(legs, vec![(Some("Nemo".to_string()), Some("Dee".to_string()))]);
}

#[test]
fn first_and_destroy_all() {
    let mut db = seeded();
    let first = Person::first(&mut db).unwrap().unwrap();
    assert_eq!(first.name.to_string(), "Ann");
    assert_eq!(Person::destroy_all(&mut db).unwrap(), 5);
    assert_eq!(Person::first(&mut db).unwrap(), None);
    assert_eq!(Person::find(&mut db, 1i64).unwrap(), None);
}

#[test]
fn insert_all_writes_every_record_at_once() {
    let mut db = setup_db();
    let people = [person("Ann", 31), person("Bob", 17), Person {
        name: "Cid".into(),
        score: Attribute::try_new(1.5).unwrap(),
        ..Default::default()
    }];
    assert_eq!(Person::insert_all(&mut db, &people).unwrap(), 3);

    let rows = Person::all()
        .order_by(Person::name(), Order::Asc)
        .pluck(&mut db, (Person::name(), Person::age(), Person::score()))
        .unwrap();
    assert_eq!(
        rows,
        vec![
            (Some("Ann".to_string()), Some(31), None),
            (Some("Bob".to_string()), Some(17), None),
            (Some("Cid".to_string()), None, Some(1.5)),
        ]
    );

    let duplicate = [pet(1, "Rex", 4), pet(1, "Rex", 3)];
    assert!(matches!(
        Pet::insert_all(&mut db, &duplicate),
        Err(Error::Query(_))
    ));
    assert_eq!(Pet::all().count(&mut db).unwrap(), 0);
}

#[test]
fn updates_cannot_be_narrowed_by_limit_or_offset() {
    let mut db = seeded();
    let err = Person::r#where(Person::age().gt(0))
        .order_by(Person::age(), Order::Asc)
        .limit(1)
        .update(&mut db, &[Person::age().set(9)])
        .unwrap_err();
    assert!(matches!(err, Error::Usage(_)));

    let err = Person::r#where(Person::age().gt(0))
        .offset(2)
        .update(&mut db, &[Person::age().set(9)])
        .unwrap_err();
    assert!(matches!(err, Error::Usage(_)));

    assert_eq!(Person::r#where(Person::age().eq(9)).count(&mut db).unwrap(), 0);
}

#[test]
fn non_finite_decimals_are_never_written() {
    let mut db = seeded();
    let err = Person::r#where(Person::name().eq("Ann"))
        .update(&mut db, &[Person::score().set(f64::NAN)])
        .unwrap_err();
    assert!(matches!(err, Error::Domain(_)));

    let err = Person::r#where(Person::score().ge(f64::INFINITY))
        .exec(&mut db)
        .unwrap_err();
    assert!(matches!(err, Error::Domain(_)));

    assert_eq!(
        Person::r#where(Person::name().eq("Ann"))
            .pluck(&mut db, Person::score())
            .unwrap(),
        vec![None]
    );
}

#[test]
fn records_read_and_write_columns_by_name() {
    let mut db = seeded();
    let mut ann = Person::r#where(Person::name().eq("Ann"))
        .exec(&mut db)
        .unwrap()
        .remove(0);
    assert_eq!(ann.get("age").as_deref(), Some("31"));
    assert_eq!(ann.get("photo").as_deref(), Some("NULL"));

    ann.set_str("photo", "cafe").unwrap();
    ann.set_str("born_at", "1990-05-06T07:08:09").unwrap();
    assert_eq!(ann.get("born_at").as_deref(), Some("1990-05-06 07:08:09"));
    assert!(matches!(ann.set_str("legs", "4"), Err(Error::Usage(_))));

    Person::r#where(Person::id().eq(ann.id.value().copied().unwrap()))
        .update(&mut db, &[ann.photo.clone().into()])
        .unwrap();
    let photo = Person::r#where(Person::name().eq("Ann"))
        .pluck(&mut db, Person::photo())
        .unwrap();
    assert_eq!(photo, vec![Some(vec![0xca, 0xfe])]);
}
