//! # relq
//!
//! Typed attributes, conditions and relations over SQLite and PostgreSQL.
//!
//! ## Quick Start
//!
//! ```rust
//! use relq::prelude::*;
//! use relq::sqlite::SqliteAdaptor;
//!
//! model! {
//!     pub struct User in "users" {
//!         id: Integer<i64> [primary_key, auto_increment],
//!         name: Text [not_null, max_length(64)],
//!         age: Integer<i32>,
//!     }
//! }
//!
//! # fn main() -> relq::Result<()> {
//! let mut db = SqliteAdaptor::open_in_memory()?;
//! db.create_table::<User>(CreateMode::IfNotExists)?;
//!
//! User::insert(&mut db, &User { name: "Ann".into(), age: 31.into(), ..Default::default() })?;
//! User::insert(&mut db, &User { name: "Bob".into(), age: 17.into(), ..Default::default() })?;
//!
//! let adults = User::r#where(User::age().ge(18)).exec(&mut db)?;
//! assert_eq!(adults.len(), 1);
//! assert_eq!(adults[0].name.to_string(), "Ann");
//! # Ok(())
//! # }
//! ```
//!
//! ## Database Support
//!
//! | Database   | Driver   | Feature Flag |
//! |------------|----------|--------------|
//! | SQLite     | rusqlite | `sqlite`     |
//! | PostgreSQL | postgres | `postgres`   |

pub use relq_core::*;

/// SQLite adaptor.
#[cfg(feature = "sqlite")]
pub mod sqlite {
    pub use relq_sqlite::*;
}

/// PostgreSQL adaptor.
#[cfg(feature = "postgres")]
pub mod postgres {
    pub use relq_postgres::*;
}

pub mod prelude {
    pub use relq_core::prelude::*;

    #[cfg(feature = "sqlite")]
    pub use relq_sqlite::SqliteAdaptor;

    #[cfg(feature = "postgres")]
    pub use relq_postgres::PostgresAdaptor;
}
