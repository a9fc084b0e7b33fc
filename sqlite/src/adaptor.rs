//! [`Adaptor`] over a rusqlite connection.

use std::path::Path;

use relq_core::adaptor::run_in_transaction;
use relq_core::{Adaptor, Dialect, Error, Result, Rows, Statement};
use rusqlite::{Connection, params_from_iter};

use crate::connection::TransactionType;
use crate::options::OpenFlags;
use crate::values::{SqliteParam, read_value};

const DRIVER: &str = "sqlite";

fn query_error(err: rusqlite::Error) -> Error {
    Error::Query(err.to_string())
}

/// One SQLite connection.
///
/// ```no_run
/// use relq_sqlite::SqliteAdaptor;
/// use relq_core::Adaptor;
///
/// let mut db = SqliteAdaptor::open_in_memory()?;
/// db.execute_batch("CREATE TABLE t (x INTEGER)")?;
/// # Ok::<(), relq_core::Error>(())
/// ```
#[derive(Debug)]
pub struct SqliteAdaptor {
    conn: Option<Connection>,
    target: String,
}

impl SqliteAdaptor {
    /// Opens `path` with `flags`.
    pub fn open(path: impl AsRef<Path>, flags: OpenFlags) -> Result<Self> {
        flags.validate().map_err(Error::Connection)?;
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, flags.into())
            .map_err(|err| Error::Connection(format!("{}: {err}", path.display())))?;
        Ok(Self::from_connection(conn, path.display().to_string()))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::from_connection(conn, ":memory:".to_string()))
    }

    /// Wraps a connection opened elsewhere.
    pub fn from_connection(conn: Connection, target: String) -> Self {
        relq_core::relq_trace_conn!("open", DRIVER, &target);
        Self {
            conn: Some(conn),
            target,
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::Connection(format!("{} is closed", self.target)))
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> Result<&Connection> {
        self.conn()
    }

    /// `BEGIN` with an explicit locking mode.
    pub fn begin_with(&mut self, mode: TransactionType) -> Result<()> {
        if self.in_transaction() {
            return Err(Error::Usage("transaction already open".to_string()));
        }
        relq_core::relq_trace_tx!("begin", DRIVER);
        self.conn()?
            .execute_batch(mode.begin_sql())
            .map_err(query_error)
    }

    /// Like [`Adaptor::transaction`], beginning with `mode`.
    pub fn transaction_with<T, E, F>(&mut self, mode: TransactionType, body: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        self.begin_with(mode)?;
        run_in_transaction(self, body)
    }
}

impl Adaptor for SqliteAdaptor {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn query(&mut self, statement: &Statement) -> Result<Rows> {
        relq_core::relq_trace_query!(statement);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&statement.sql).map_err(query_error)?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let width = columns.len();

        let mut out = Rows::new(columns);
        let mut rows = stmt
            .query(params_from_iter(statement.params.iter().map(SqliteParam)))
            .map_err(query_error)?;
        while let Some(row) = rows.next().map_err(query_error)? {
            let cells = (0..width)
                .map(|i| row.get_ref(i).map(read_value))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_error)?;
            out.push(cells);
        }
        Ok(out)
    }

    fn execute(&mut self, statement: &Statement) -> Result<u64> {
        relq_core::relq_trace_query!(statement);
        let affected = self
            .conn()?
            .execute(
                &statement.sql,
                params_from_iter(statement.params.iter().map(SqliteParam)),
            )
            .map_err(query_error)?;
        Ok(affected as u64)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql).map_err(query_error)
    }

    fn begin(&mut self) -> Result<()> {
        self.begin_with(TransactionType::default())
    }

    fn commit(&mut self) -> Result<()> {
        relq_core::relq_trace_tx!("commit", DRIVER);
        self.conn()?.execute_batch("COMMIT").map_err(query_error)
    }

    fn rollback(&mut self) -> Result<()> {
        relq_core::relq_trace_tx!("rollback", DRIVER);
        self.conn()?.execute_batch("ROLLBACK").map_err(query_error)
    }

    fn in_transaction(&self) -> bool {
        self.conn.as_ref().is_some_and(|conn| !conn.is_autocommit())
    }

    fn close(&mut self) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        relq_core::relq_trace_conn!("close", DRIVER, &self.target);
        conn.close().map_err(|(conn, err)| {
            self.conn = Some(conn);
            Error::Connection(err.to_string())
        })
    }

    fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    fn server_version(&mut self) -> Result<String> {
        self.conn()?;
        Ok(rusqlite::version().to_string())
    }

    fn version_number(&mut self) -> Result<i64> {
        self.conn()?;
        Ok(i64::from(rusqlite::version_number()))
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let statement = Statement {
            sql: "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1".to_string(),
            params: vec![table.into()],
        };
        let count = self.query(&statement)?.into_scalar();
        Ok(count.as_i64().unwrap_or(0) > 0)
    }
}
