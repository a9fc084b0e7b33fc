use relq::prelude::*;
use relq::sqlite::TransactionType;

use crate::common::{Person, person, setup_db};

#[test]
fn commit() {
    let mut db = setup_db();
    let inserted = db
        .transaction(|db| {
            Person::insert(db, &person("Ann", 31))?;
            Person::insert(db, &person("Bob", 25))
        })
        .unwrap();
    assert_eq!(inserted, 1);
    assert!(!db.in_transaction());
    assert_eq!(Person::all().count(&mut db).unwrap(), 2);
}

#[test]
fn rollback_on_panic() {
    let mut db = setup_db();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<()> = db.transaction(|db| {
            Person::insert(db, &person("Ann", 31))?;
            panic!("abort");
        });
    }));
    assert!(outcome.is_err());
    assert!(!db.in_transaction());
    assert_eq!(Person::all().count(&mut db).unwrap(), 0);
}

#[test]
fn nested_begin_is_rejected() {
    let mut db = setup_db();
    let result: Result<()> = db.transaction(|db| {
        Person::insert(db, &person("Ann", 31))?;
        db.transaction(|_| Ok(()))
    });
    assert!(matches!(result, Err(Error::Usage(_))));
    assert_eq!(Person::all().count(&mut db).unwrap(), 0);
}

#[test]
fn explicit_locking_modes() {
    let mut db = setup_db();
    for mode in [
        TransactionType::Deferred,
        TransactionType::Immediate,
        TransactionType::Exclusive,
    ] {
        db.transaction_with(mode, |db| Person::insert(db, &person("Ann", 31)))
            .unwrap();
    }
    assert_eq!(Person::all().count(&mut db).unwrap(), 3);
}

#[derive(Debug)]
enum AppError {
    Db(Error),
    Rejected,
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Db(err)
    }
}

#[test]
fn caller_error_types_pass_through() {
    let mut db = setup_db();
    let result: std::result::Result<(), AppError> = db.transaction(|db| {
        Person::insert(db, &person("Ann", 31))?;
        Err(AppError::Rejected)
    });
    assert!(matches!(result, Err(AppError::Rejected)));

    let result: std::result::Result<u64, AppError> =
        db.transaction(|db| Ok(Person::all().count(db)?));
    assert!(matches!(result, Ok(0)));
}
