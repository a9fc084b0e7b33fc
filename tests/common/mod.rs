//! Models shared by the integration tests.

use relq::prelude::*;

model! {
    pub struct Person in "people" {
        id: Integer<i64> [primary_key, auto_increment],
        name: Text [not_null, max_length(32)],
        age: Integer<i32>,
        score: Decimal,
        active: Boolean,
        photo: Binary,
        born_at: DateTime,
    }
}

model! {
    pub struct Pet in "pets" {
        id: Integer<i64> [primary_key, auto_increment],
        owner_id: ForeignKey<Person> [not_null],
        name: Text [not_null, unique],
        legs: Integer<u8>,
    }
}

pub fn person(name: &str, age: i32) -> Person {
    Person {
        name: name.into(),
        age: age.into(),
        active: true.into(),
        ..Default::default()
    }
}

pub fn pet(owner_id: i64, name: &str, legs: u8) -> Pet {
    Pet {
        owner_id: owner_id.into(),
        name: name.into(),
        legs: legs.into(),
        ..Default::default()
    }
}

#[cfg(feature = "sqlite")]
pub fn setup_db() -> relq::sqlite::SqliteAdaptor {
    let mut db = relq::sqlite::SqliteAdaptor::open_in_memory().expect("open in-memory database");
    db.create_table::<Person>(CreateMode::IfNotExists)
        .expect("create people");
    db.create_table::<Pet>(CreateMode::IfNotExists)
        .expect("create pets");
    db
}
