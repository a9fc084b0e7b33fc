use proptest::prelude::*;
use relq::prelude::*;

use crate::common::{Person, PersonAge, PersonName, PersonPhoto, PersonScore};

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

proptest! {
    #[test]
    fn attribute_text_round_trips(age in any::<i32>(), name in "\\PC{0,32}", photo in proptest::collection::vec(any::<u8>(), 0..32)) {
        let a: Attribute<PersonAge> = age.into();
        prop_assert_eq!(a.to_string().parse::<Attribute<PersonAge>>(), Ok(a));

        let n: Attribute<PersonName> = name.into();
        prop_assert_eq!(n.to_string().parse::<Attribute<PersonName>>(), Ok(n));

        let p: Attribute<PersonPhoto> = photo.into();
        prop_assert_eq!(p.to_string().parse::<Attribute<PersonPhoto>>(), Ok(p));
    }

    #[test]
    fn decimal_attributes_round_trip(score in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let s = Attribute::<PersonScore>::try_new(score).unwrap();
        prop_assert_eq!(s.to_string().parse::<Attribute<PersonScore>>(), Ok(s));
    }

    #[test]
    fn chained_where_is_conjunction(low in any::<i32>(), high in any::<i32>(), pattern in "[A-Z%]{1,4}") {
        let chained = Person::r#where(Person::age().ge(low))
            .r#where(Person::age().le(high))
            .r#where(Person::name().like(pattern.clone()));
        let combined = Person::r#where(
            Person::age().ge(low).and(Person::age().le(high)).and(Person::name().like(pattern)),
        );
        prop_assert_eq!(
            chained.to_sql(Dialect::PostgreSQL),
            combined.to_sql(Dialect::PostgreSQL)
        );
    }

    #[test]
    fn every_bound_value_has_one_placeholder(values in proptest::collection::vec(any::<i32>(), 0..16), limit in proptest::option::of(0u64..100)) {
        let mut relation = Person::r#where(Person::age().in_set(values.clone()).or(Person::name().is_null()));
        if let Some(limit) = limit {
            relation = relation.limit(limit);
        }
        let statement = relation.to_sql(Dialect::SQLite).unwrap();
        prop_assert_eq!(placeholders(&statement.sql), statement.params.len());
        prop_assert_eq!(statement.params.len(), values.len());
    }

    #[test]
    fn clause_order_is_canonical(limit in 0u64..50, offset in 0u64..50, age in any::<i32>()) {
        let a = Person::all()
            .offset(offset)
            .order_by(Person::age(), Order::Desc)
            .r#where(Person::age().ne(age))
            .limit(limit);
        let b = Person::r#where(Person::age().ne(age))
            .limit(limit)
            .offset(offset)
            .order_by(Person::age(), Order::Desc);
        prop_assert_eq!(a.to_sql(Dialect::SQLite), b.to_sql(Dialect::SQLite));
    }
}

#[cfg(feature = "sqlite")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stored_values_read_back_unchanged(name in "\\PC{1,32}", age in any::<i32>(), photo in proptest::collection::vec(any::<u8>(), 0..32)) {
        let mut db = crate::common::setup_db();
        let record = Person {
            name: name.into(),
            age: age.into(),
            photo: photo.into(),
            ..Default::default()
        };
        Person::insert(&mut db, &record).unwrap();
        let stored = Person::first(&mut db).unwrap().unwrap();
        prop_assert_eq!(stored.name, record.name);
        prop_assert_eq!(stored.age, record.age);
        prop_assert_eq!(stored.photo, record.photo);
    }
}
