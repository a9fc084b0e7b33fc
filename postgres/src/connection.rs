//! Transaction isolation levels for PostgreSQL.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Isolation level of an explicit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TransactionType {
    ReadUncommitted,
    /// The server default
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl TransactionType {
    pub fn begin_sql(&self) -> String {
        format!("BEGIN ISOLATION LEVEL {self}")
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionType::ReadUncommitted => "READ UNCOMMITTED",
            TransactionType::ReadCommitted => "READ COMMITTED",
            TransactionType::RepeatableRead => "REPEATABLE READ",
            TransactionType::Serializable => "SERIALIZABLE",
        })
    }
}
