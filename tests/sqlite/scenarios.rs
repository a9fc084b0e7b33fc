use relq::SQLValue;
use relq::prelude::*;

use crate::common::{Person, person, setup_db};

#[test]
fn insert_then_pluck() {
    let mut db = setup_db();
    Person::insert(&mut db, &person("Alice", 30)).unwrap();

    let ages = Person::r#where(Person::name().eq("Alice"))
        .pluck(&mut db, Person::age())
        .unwrap();
    assert_eq!(ages, vec![Some(30)]);
}

#[test]
fn filtered_ordered_limited_query() {
    let mut db = setup_db();
    for (name, age) in [("Alice", 30), ("Andy", 19), ("Bob", 25), ("Amy", 40), ("Carl", 20)] {
        Person::insert(&mut db, &person(name, age)).unwrap();
    }

    let mut relation = Person::r#where(
        Person::age()
            .between(18, 30)
            .and(Person::name().like("A%").or(Person::name().eq("Bob"))),
    )
    .order_by(Person::age(), Order::Desc)
    .limit(2);

    let statement = relation.to_sql(Dialect::SQLite).unwrap();
    assert!(statement.sql.contains(
        r#" WHERE ("people"."age" BETWEEN ?1 AND ?2) AND (("people"."name" LIKE ?3) OR ("people"."name" = ?4)) ORDER BY "people"."age" DESC LIMIT 2"#
    ));
    assert_eq!(
        statement.params,
        vec![
            SQLValue::Integer(18),
            SQLValue::Integer(30),
            SQLValue::Text("A%".into()),
            SQLValue::Text("Bob".into()),
        ]
    );

    let names: Vec<String> = relation
        .exec(&mut db)
        .unwrap()
        .into_iter()
        .map(|p| p.name.to_string())
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
}

#[test]
fn destroy_without_matches_is_not_an_error() {
    let mut db = setup_db();
    Person::insert(&mut db, &person("Alice", 30)).unwrap();

    assert_eq!(Person::destroy(&mut db, Person::age().lt(0)).unwrap(), 0);
    assert_eq!(Person::all().count(&mut db).unwrap(), 1);
}

#[test]
fn failed_transaction_leaves_the_table_unchanged() {
    let mut db = setup_db();
    Person::insert(&mut db, &person("Alice", 30)).unwrap();
    let before = Person::all().count(&mut db).unwrap();

    let result: Result<()> = db.transaction(|db| {
        Person::insert(db, &person("Bob", 25))?;
        Err(Error::Usage("changed my mind".into()))
    });
    assert_eq!(result, Err(Error::Usage("changed my mind".into())));

    assert_eq!(Person::all().count(&mut db).unwrap(), before);
}
