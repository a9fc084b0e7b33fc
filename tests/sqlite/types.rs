use chrono::NaiveDate;
use relq::prelude::*;

use crate::common::{Person, setup_db};

#[test]
fn every_kind_survives_storage() {
    let mut db = setup_db();
    let born = NaiveDate::from_ymd_opt(1990, 7, 14)
        .unwrap()
        .and_hms_micro_opt(6, 30, 0, 125_000)
        .unwrap();
    let original = Person {
        name: "Zoë".into(),
        age: (-3).into(),
        score: Attribute::try_new(0.1 + 0.2).unwrap(),
        active: false.into(),
        photo: vec![0u8, 159, 255].into(),
        born_at: born.into(),
        ..Default::default()
    };
    Person::insert(&mut db, &original).unwrap();

    let stored = Person::first(&mut db).unwrap().unwrap();
    assert_eq!(stored.id.value(), Some(&1));
    assert_eq!(stored.name, original.name);
    assert_eq!(stored.age, original.age);
    assert_eq!(stored.score, original.score);
    assert_eq!(stored.active, original.active);
    assert_eq!(stored.photo, original.photo);
    assert_eq!(stored.born_at, original.born_at);
}

#[test]
fn datetimes_compare_chronologically() {
    let mut db = setup_db();
    for (name, year) in [("old", 1950), ("mid", 1999), ("new", 2020)] {
        let born = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let record = Person {
            name: name.into(),
            born_at: born.into(),
            ..Default::default()
        };
        Person::insert(&mut db, &record).unwrap();
    }
    let cutoff = NaiveDate::from_ymd_opt(1990, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let names = Person::r#where(Person::born_at().gt(cutoff))
        .order_by(Person::born_at(), Order::Desc)
        .pluck(&mut db, Person::name())
        .unwrap();
    assert_eq!(names, vec![Some("new".to_string()), Some("mid".to_string())]);
}

#[test]
fn out_of_range_cells_are_domain_errors() {
    let mut db = setup_db();
    db.execute_batch(r#"INSERT INTO "people" ("name", "age") VALUES ('big', 5000000000)"#)
        .unwrap();
    let err = Person::all().exec(&mut db).unwrap_err();
    assert!(matches!(err, Error::Domain(_)), "{err:?}");
}
