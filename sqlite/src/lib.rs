//! SQLite adaptor for relq.
//!
//! Runs relq statements on a [`rusqlite`] connection. Placeholders render as
//! `?N`; booleans are stored as integers and timestamps as sortable text.

mod adaptor;
pub mod connection;
pub mod options;
mod values;

pub use adaptor::SqliteAdaptor;
pub use connection::TransactionType;
pub use options::OpenFlags;

/// The underlying driver, for callers that need to reach past the adaptor.
pub use rusqlite;
