use relq::prelude::*;

use crate::common::{Person, Pet, person, setup_db};

#[test]
fn create_exists_drop() {
    let mut db = setup_db();
    assert!(db.exists_table::<Person>().unwrap());
    assert!(db.exists_table::<Pet>().unwrap());

    db.create_table::<Pet>(CreateMode::IfNotExists).unwrap();
    let err = db.create_table::<Pet>(CreateMode::AbortIfExists).unwrap_err();
    assert!(matches!(err, Error::Schema(_)), "{err:?}");

    db.drop_table::<Pet>().unwrap();
    assert!(!db.exists_table::<Pet>().unwrap());
    assert!(matches!(db.drop_table::<Pet>(), Err(Error::Schema(_))));
}

#[test]
fn ddl_text() {
    assert_eq!(
        Pet::schema()
            .to_sql(Dialect::SQLite, CreateMode::IfNotExists)
            .unwrap(),
        r#"CREATE TABLE IF NOT EXISTS "pets" ("id" INTEGER PRIMARY KEY AUTOINCREMENT, "owner_id" INTEGER NOT NULL REFERENCES "people" ("id"), "name" TEXT NOT NULL UNIQUE, "legs" INTEGER)"#
    );
    assert_eq!(
        Pet::schema()
            .to_sql(Dialect::PostgreSQL, CreateMode::AbortIfExists)
            .unwrap(),
        r#"CREATE TABLE "pets" ("id" BIGSERIAL PRIMARY KEY, "owner_id" BIGINT NOT NULL REFERENCES "people" ("id"), "name" TEXT NOT NULL UNIQUE, "legs" SMALLINT)"#
    );
}

#[test]
fn constraints_hold_in_the_database() {
    let mut db = setup_db();
    Person::insert(&mut db, &person("Ann", 31)).unwrap();
    let pet = crate::common::pet(1, "Rex", 4);
    Pet::insert(&mut db, &pet).unwrap();

    let err = Pet::insert(&mut db, &pet).unwrap_err();
    assert!(matches!(err, Error::Query(ref msg) if msg.contains("UNIQUE")), "{err:?}");

    let too_long = person("a name that is far longer than allowed", 1);
    assert!(matches!(
        Person::insert(&mut db, &too_long),
        Err(Error::Domain(_))
    ));
}

#[test]
fn version_reporting() {
    let mut db = setup_db();
    assert_eq!(db.dialect(), Dialect::SQLite);
    assert!(db.version_number().unwrap() > 3_000_000);
    db.close().unwrap();
    assert!(matches!(
        Person::all().count(&mut db),
        Err(Error::Connection(_))
    ));
}
