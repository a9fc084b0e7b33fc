//! # relq-core
//!
//! Typed attributes, conditions and relations, rendered to dialect-specific
//! SQL and executed through a storage [`Adaptor`].
//!
//! Models are declared with [`model!`]; columns of a model are zero-sized
//! markers used to build [`Condition`]s; [`Relation`]s accumulate clauses and
//! run them. The dialect crates (`relq-sqlite`, `relq-postgres`) provide the
//! adaptors.
//!
//! ## Checked at compile time
//!
//! Literals must match the column's kind:
//!
//! ```compile_fail
//! use relq_core::prelude::*;
//!
//! model! { pub struct User in "users" { name: Text } }
//!
//! let _ = User::r#where(User::name().eq(42));
//! ```
//!
//! Columns must belong to a model in scope:
//!
//! ```compile_fail
//! use relq_core::prelude::*;
//!
//! model! { pub struct User in "users" { id: Integer<i64> } }
//! model! { pub struct Post in "posts" { id: Integer<i64> } }
//!
//! let _ = User::r#where(Post::id().eq(1));
//! ```
//!
//! Numeric aggregates need a numeric column:
//!
//! ```compile_fail
//! use relq_core::prelude::*;
//!
//! model! { pub struct User in "users" { name: Text } }
//!
//! fn total<A: Adaptor>(db: &mut A) {
//!     let _ = User::all().sum(db, User::name());
//! }
//! ```

pub mod adaptor;
pub mod attribute;
pub mod column;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod kind;
mod macros;
pub mod model;
pub mod relation;
pub mod row;
pub mod schema;
pub mod scope;
pub mod sql;
pub mod trace;
pub mod value;

#[cfg(test)]
mod testing;

pub use adaptor::{Adaptor, run_in_transaction};
pub use attribute::Attribute;
pub use column::{Assignment, Column, Columns, TextColumn, ValueOf};
pub use condition::{CompareOp, Condition};
pub use dialect::{Dialect, DialectParseError};
pub use error::{Error, Result};
pub use kind::{Kind, Literal, Numeric, ValueType};
pub use model::Model;
pub use relation::{JoinKind, Order, Phase, Relation};
pub use row::{FromRow, RowReader, Rows};
pub use schema::{ColumnDef, Constraints, CreateMode, Schema};
pub use scope::{InScope, Joined, Scope};
pub use sql::{ColumnRef, SQL, SQLChunk, Statement};
pub use value::SQLValue;

#[doc(hidden)]
pub use paste;

pub mod prelude {
    pub use crate::adaptor::Adaptor;
    pub use crate::attribute::Attribute;
    pub use crate::column::{Column, TextColumn};
    pub use crate::condition::Condition;
    pub use crate::dialect::Dialect;
    pub use crate::error::{Error, Result};
    pub use crate::kind::{Binary, Boolean, DateTime, Decimal, ForeignKey, Integer, Text};
    pub use crate::model;
    pub use crate::model::Model;
    pub use crate::relation::{Order, Relation};
    pub use crate::schema::CreateMode;
}
