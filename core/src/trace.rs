//! Tracing utilities for relq query, transaction and connection observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate. The
//! macros expand to calls into this module, which compile to nothing when
//! the feature is disabled, so call sites need no `#[cfg]`.

use crate::error::Error;
use crate::sql::Statement;

/// Emit a debug-level `relq.query` event with the SQL text and parameter count.
///
/// ```ignore
/// relq_trace_query!(&statement);
/// ```
#[macro_export]
macro_rules! relq_trace_query {
    ($statement:expr) => {
        $crate::trace::query($statement)
    };
}

/// Emit a `relq.transaction` event (begin, commit, rollback).
///
/// ```ignore
/// relq_trace_tx!("begin", "sqlite");
/// relq_trace_tx!("rollback_failed", "postgresql", err);
/// ```
#[macro_export]
macro_rules! relq_trace_tx {
    ($event:literal, $driver:expr) => {
        $crate::trace::transaction($event, $driver, None)
    };
    ($event:literal, $driver:expr, $error:expr) => {
        $crate::trace::transaction($event, $driver, Some(&$error))
    };
}

/// Emit an info-level `relq.connection` event (open, close).
///
/// ```ignore
/// relq_trace_conn!("open", "sqlite", path);
/// ```
#[macro_export]
macro_rules! relq_trace_conn {
    ($event:literal, $driver:expr, $target:expr) => {
        $crate::trace::connection($event, $driver, $target)
    };
}

#[doc(hidden)]
#[inline]
pub fn query(statement: &Statement) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        sql = %statement.sql,
        params = statement.params.len(),
        "relq.query"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = statement;
}

#[doc(hidden)]
#[inline]
pub fn transaction(event: &'static str, driver: &str, error: Option<&Error>) {
    #[cfg(feature = "tracing")]
    {
        match error {
            None => tracing::info!(event, driver, "relq.transaction"),
            Some(error) => tracing::warn!(event, driver, %error, "relq.transaction"),
        }
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (event, driver, error);
}

#[doc(hidden)]
#[inline]
pub fn connection(event: &'static str, driver: &str, target: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(event, driver, target, "relq.connection");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, driver, target);
}
