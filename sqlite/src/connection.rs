//! Transaction modes for SQLite.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How `BEGIN` acquires locks.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransactionType {
    #[default]
    /// No locks until the first read or write
    Deferred,
    /// A RESERVED lock immediately
    Immediate,
    /// An EXCLUSIVE lock immediately
    Exclusive,
}

impl TransactionType {
    pub const fn begin_sql(&self) -> &'static str {
        match self {
            TransactionType::Deferred => "BEGIN DEFERRED",
            TransactionType::Immediate => "BEGIN IMMEDIATE",
            TransactionType::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

impl From<TransactionType> for rusqlite::TransactionBehavior {
    fn from(tx_type: TransactionType) -> Self {
        match tx_type {
            TransactionType::Deferred => rusqlite::TransactionBehavior::Deferred,
            TransactionType::Immediate => rusqlite::TransactionBehavior::Immediate,
            TransactionType::Exclusive => rusqlite::TransactionBehavior::Exclusive,
        }
    }
}

impl From<rusqlite::TransactionBehavior> for TransactionType {
    fn from(behavior: rusqlite::TransactionBehavior) -> Self {
        match behavior {
            rusqlite::TransactionBehavior::Immediate => TransactionType::Immediate,
            rusqlite::TransactionBehavior::Exclusive => TransactionType::Exclusive,
            _ => TransactionType::Deferred,
        }
    }
}
