//! PostgreSQL adaptor for relq.
//!
//! Runs relq statements on a synchronous [`postgres`] client. Placeholders
//! render as `$N` and bound values are coerced to the parameter types the
//! server infers.

mod adaptor;
pub mod config;
pub mod connection;
mod values;

pub use adaptor::{PROTOCOL_VERSION, PostgresAdaptor};
pub use config::{Auth, Endpoint, Options};
pub use connection::TransactionType;

/// The underlying driver, for callers that need to reach past the adaptor.
pub use postgres;
