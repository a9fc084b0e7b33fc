//! Runs against a live server when `RELQ_POSTGRES_URL` is set, e.g.
//! `host=localhost user=postgres dbname=relq_test`. Skipped otherwise.

use relq::postgres::{PROTOCOL_VERSION, PostgresAdaptor, TransactionType};
use relq::prelude::*;
use relq::{SQLValue, Statement};

use crate::common::{Person, Pet, person, pet};

fn connect() -> Option<PostgresAdaptor> {
    let url = std::env::var("RELQ_POSTGRES_URL").ok()?;
    let mut db = PostgresAdaptor::open_str(&url).expect("connect to RELQ_POSTGRES_URL");
    db.execute_batch(r#"DROP TABLE IF EXISTS "pets"; DROP TABLE IF EXISTS "people""#)
        .expect("reset tables");
    db.create_table::<Person>(CreateMode::IfNotExists)
        .expect("create people");
    db.create_table::<Pet>(CreateMode::IfNotExists)
        .expect("create pets");
    Some(db)
}

// The tests share two tables, so everything runs in one test body.
#[test]
fn postgres_end_to_end() {
    let Some(mut db) = connect() else {
        return;
    };

    assert_eq!(db.dialect(), Dialect::PostgreSQL);
    assert_eq!(db.protocol_version(), PROTOCOL_VERSION);
    assert!(db.version_number().unwrap() >= 90_000);
    assert!(!db.server_version().unwrap().is_empty());
    assert!(db.exists_table::<Person>().unwrap());

    // insert then pluck
    Person::insert(&mut db, &person("Alice", 30)).unwrap();
    let ages = Person::r#where(Person::name().eq("Alice"))
        .pluck(&mut db, Person::age())
        .unwrap();
    assert_eq!(ages, vec![Some(30)]);

    for (name, age) in [("Andy", 19), ("Bob", 25), ("Amy", 40)] {
        Person::insert(&mut db, &person(name, age)).unwrap();
    }

    // filtered, ordered, limited
    let mut relation = Person::r#where(
        Person::age()
            .between(18, 30)
            .and(Person::name().like("A%").or(Person::name().eq("Bob"))),
    )
    .order_by(Person::age(), Order::Desc)
    .limit(2);
    assert!(relation.to_sql(Dialect::PostgreSQL).unwrap().sql.contains("$4"));
    let names: Vec<_> = relation
        .exec(&mut db)
        .unwrap()
        .into_iter()
        .map(|p| p.name.to_string())
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);

    // aggregates: SUM(int4) is int8, AVG is numeric
    assert_eq!(Person::all().sum(&mut db, Person::age()).unwrap(), Some(114));
    assert_eq!(Person::all().avg(&mut db, Person::age()).unwrap(), Some(28.5));
    assert_eq!(
        Person::r#where(Person::age().gt(100))
            .max(&mut db, Person::age())
            .unwrap(),
        None
    );

    // destroy without matches
    assert_eq!(Person::destroy(&mut db, Person::age().lt(0)).unwrap(), 0);

    // failed transaction
    let before = Person::all().count(&mut db).unwrap();
    let result: Result<()> = db.transaction_with(TransactionType::Serializable, |db| {
        Person::insert(db, &person("Eve", 22))?;
        Err(Error::Usage("rolled back".into()))
    });
    assert!(result.is_err());
    assert!(!db.in_transaction());
    assert_eq!(Person::all().count(&mut db).unwrap(), before);

    // joins and foreign keys
    let alice = Person::r#where(Person::name().eq("Alice"))
        .pluck(&mut db, Person::id())
        .unwrap()[0]
        .unwrap();
    Pet::insert(&mut db, &pet(alice, "Rex", 4)).unwrap();
    let err = Pet::insert(&mut db, &pet(9_999, "Ghost", 0)).unwrap_err();
    assert!(matches!(err, Error::Query(_)), "{err:?}");
    let owners = Pet::all()
        .join::<Person>(Pet::owner_id().eq_column(Person::id()))
        .pluck(&mut db, (Pet::name(), Person::name(), Pet::legs()))
        .unwrap();
    assert_eq!(
        owners,
        vec![(Some("Rex".to_string()), Some("Alice".to_string()), Some(4u8))]
    );

    // parameters coerce to the inferred types
    let echoed = db
        .query(&Statement {
            sql: "SELECT $1::int2 + 1, $2::numeric, $3::bytea, $4::timestamptz IS NOT NULL".into(),
            params: vec![
                SQLValue::Integer(41),
                SQLValue::Real(2.5),
                SQLValue::Blob(vec![1, 2]),
                SQLValue::Timestamp(chrono::NaiveDateTime::default()),
            ],
        })
        .unwrap();
    assert_eq!(
        echoed.iter().next().unwrap(),
        [
            SQLValue::Integer(42),
            SQLValue::Real(2.5),
            SQLValue::Blob(vec![1, 2]),
            SQLValue::Boolean(true),
        ]
    );

    db.drop_table::<Pet>().unwrap();
    db.drop_table::<Person>().unwrap();
    db.close().unwrap();
    assert!(db.is_closed());
    assert!(matches!(
        Person::all().count(&mut db),
        Err(Error::Connection(_))
    ));
}
