//! The storage adaptor contract.

use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::row::Rows;
use crate::schema::CreateMode;
use crate::sql::Statement;

/// One open connection to a backend.
///
/// Adaptors are synchronous and own their connection exclusively; callers
/// serialize access through `&mut`. After [`close`](Adaptor::close) every
/// operation fails with [`Error::Connection`].
pub trait Adaptor {
    /// Dialect used to render statements for this backend.
    fn dialect(&self) -> Dialect;

    /// Runs a statement that returns rows.
    fn query(&mut self, statement: &Statement) -> Result<Rows>;

    /// Runs a statement and returns the number of affected rows.
    fn execute(&mut self, statement: &Statement) -> Result<u64>;

    /// Runs one or more statements without bindings.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    fn in_transaction(&self) -> bool;

    /// Releases the connection. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// Backend version as reported by the server or library.
    fn server_version(&mut self) -> Result<String>;

    /// Backend version as a single comparable number.
    fn version_number(&mut self) -> Result<i64>;

    /// Whether a table with this name exists.
    fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Runs `body` inside BEGIN / COMMIT.
    ///
    /// An `Err` from `body` rolls back and is returned unchanged. A panic
    /// rolls back and then resumes unwinding. Nesting is a usage error.
    fn transaction<T, E, F>(&mut self, body: F) -> std::result::Result<T, E>
    where
        Self: Sized,
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        self.begin()?;
        run_in_transaction(self, body)
    }

    /// `CREATE TABLE` for `M`.
    fn create_table<M: Model>(&mut self, mode: CreateMode) -> Result<()>
    where
        Self: Sized,
    {
        let sql = M::SCHEMA.to_sql(self.dialect(), mode)?;
        self.execute_batch(&sql).map_err(Error::into_schema)
    }

    /// `DROP TABLE` for `M`.
    fn drop_table<M: Model>(&mut self) -> Result<()>
    where
        Self: Sized,
    {
        let sql = M::SCHEMA.drop_sql(self.dialect());
        self.execute_batch(&sql).map_err(Error::into_schema)
    }

    /// Whether the table of `M` exists.
    fn exists_table<M: Model>(&mut self) -> Result<bool>
    where
        Self: Sized,
    {
        self.table_exists(M::TABLE_NAME).map_err(Error::into_schema)
    }
}

/// Finishes a transaction that `adaptor` has already begun: commits when
/// `body` succeeds, rolls back otherwise.
///
/// Adaptors with their own BEGIN variants use this after issuing them.
pub fn run_in_transaction<A, T, E, F>(adaptor: &mut A, body: F) -> std::result::Result<T, E>
where
    A: Adaptor + ?Sized,
    E: From<Error>,
    F: FnOnce(&mut A) -> std::result::Result<T, E>,
{
    let result = catch_unwind(AssertUnwindSafe(|| body(&mut *adaptor)));

    match result {
        Ok(Ok(value)) => {
            if let Err(err) = adaptor.commit() {
                if adaptor.in_transaction() {
                    if let Err(rollback_err) = adaptor.rollback() {
                        crate::relq_trace_tx!("rollback_failed", adaptor.dialect().as_str(), rollback_err);
                    }
                }
                return Err(err.into());
            }
            Ok(value)
        }
        Ok(Err(err)) => {
            if let Err(rollback_err) = adaptor.rollback() {
                crate::relq_trace_tx!("rollback_failed", adaptor.dialect().as_str(), rollback_err);
            }
            Err(err)
        }
        Err(panic_payload) => {
            if let Err(rollback_err) = adaptor.rollback() {
                crate::relq_trace_tx!("rollback_failed", adaptor.dialect().as_str(), rollback_err);
            }
            resume_unwind(panic_payload);
        }
    }
}
