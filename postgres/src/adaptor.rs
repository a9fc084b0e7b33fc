//! [`Adaptor`] over a synchronous postgres client.

use std::fmt;

use postgres::types::ToSql;
use postgres::{Client, NoTls};
use relq_core::adaptor::run_in_transaction;
use relq_core::{Adaptor, Dialect, Error, Result, Rows, SQLValue, Statement};
use smallvec::SmallVec;

use crate::config::{Auth, Endpoint, Options, driver_config};
use crate::connection::TransactionType;
use crate::values::{PgParam, read_cell};

const DRIVER: &str = "postgresql";

/// Frontend/backend protocol major version spoken by the `postgres` crate.
pub const PROTOCOL_VERSION: i32 = 3;

fn query_error(err: postgres::Error) -> Error {
    match err.as_db_error() {
        Some(db) => Error::Query(format!("{} ({})", db.message(), db.code().code())),
        None => Error::Query(err.to_string()),
    }
}

/// One PostgreSQL connection.
pub struct PostgresAdaptor {
    client: Option<Client>,
    target: String,
    in_transaction: bool,
}

impl PostgresAdaptor {
    /// Connects to `endpoint` without TLS.
    pub fn open(endpoint: &Endpoint, auth: Option<&Auth>, options: Option<&Options>) -> Result<Self> {
        let target = format!("{}:{}/{}", endpoint.host, endpoint.port, endpoint.db_name);
        let client = driver_config(endpoint, auth, options)
            .connect(NoTls)
            .map_err(|err| Error::Connection(format!("{target}: {err}")))?;
        Ok(Self::from_client(client, target))
    }

    /// Connects with a libpq-style connection string or URL.
    pub fn open_str(conninfo: &str) -> Result<Self> {
        let client = Client::connect(conninfo, NoTls)
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::from_client(client, "conninfo".to_string()))
    }

    /// Wraps a client connected elsewhere.
    pub fn from_client(client: Client, target: String) -> Self {
        relq_core::relq_trace_conn!("open", DRIVER, &target);
        Self {
            client: Some(client),
            target,
            in_transaction: false,
        }
    }

    fn client(&mut self) -> Result<&mut Client> {
        let target = &self.target;
        self.client
            .as_mut()
            .ok_or_else(|| Error::Connection(format!("{target} is closed")))
    }

    /// Borrows the underlying client.
    pub fn client_mut(&mut self) -> Result<&mut Client> {
        self.client()
    }

    pub fn protocol_version(&self) -> i32 {
        PROTOCOL_VERSION
    }

    fn show(&mut self, setting: &str) -> Result<String> {
        let rows = self.query(&Statement::raw(format!("SHOW {setting}")))?;
        match rows.into_scalar() {
            SQLValue::Text(value) => Ok(value),
            other => Err(Error::Query(format!(
                "SHOW {setting} returned {}",
                other.type_name()
            ))),
        }
    }

    /// `BEGIN` with an explicit isolation level.
    pub fn begin_with(&mut self, level: TransactionType) -> Result<()> {
        if self.in_transaction {
            return Err(Error::Usage("transaction already open".to_string()));
        }
        relq_core::relq_trace_tx!("begin", DRIVER);
        self.client()?
            .batch_execute(&level.begin_sql())
            .map_err(query_error)?;
        self.in_transaction = true;
        Ok(())
    }

    /// Like [`Adaptor::transaction`], beginning with `level`.
    pub fn transaction_with<T, E, F>(&mut self, level: TransactionType, body: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
    {
        self.begin_with(level)?;
        run_in_transaction(self, body)
    }

    fn finish(&mut self, sql: &str) -> Result<()> {
        let result = self.client()?.batch_execute(sql).map_err(query_error);
        self.in_transaction = false;
        result
    }
}

fn bind(statement: &Statement) -> SmallVec<[PgParam<'_>; 8]> {
    statement.params.iter().map(PgParam).collect()
}

fn refs<'a>(params: &'a [PgParam<'a>]) -> SmallVec<[&'a (dyn ToSql + Sync); 8]> {
    params
        .iter()
        .map(|p| p as &(dyn ToSql + Sync))
        .collect()
}

impl Adaptor for PostgresAdaptor {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn query(&mut self, statement: &Statement) -> Result<Rows> {
        relq_core::relq_trace_query!(statement);
        let client = self.client()?;
        let prepared = client.prepare(&statement.sql).map_err(query_error)?;
        let params = bind(statement);
        let rows = client
            .query(&prepared, &refs(&params)[..])
            .map_err(query_error)?;

        let mut out = Rows::new(
            prepared
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
        );
        for row in &rows {
            let cells = (0..row.len())
                .map(|index| read_cell(row, index))
                .collect::<Result<Vec<_>>>()?;
            out.push(cells);
        }
        Ok(out)
    }

    fn execute(&mut self, statement: &Statement) -> Result<u64> {
        relq_core::relq_trace_query!(statement);
        let params = bind(statement);
        self.client()?
            .execute(statement.sql.as_str(), &refs(&params)[..])
            .map_err(query_error)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.client()?.batch_execute(sql).map_err(query_error)
    }

    fn begin(&mut self) -> Result<()> {
        self.begin_with(TransactionType::default())
    }

    fn commit(&mut self) -> Result<()> {
        relq_core::relq_trace_tx!("commit", DRIVER);
        self.finish("COMMIT")
    }

    fn rollback(&mut self) -> Result<()> {
        relq_core::relq_trace_tx!("rollback", DRIVER);
        self.finish("ROLLBACK")
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn close(&mut self) -> Result<()> {
        let Some(client) = self.client.take() else {
            return Ok(());
        };
        relq_core::relq_trace_conn!("close", DRIVER, &self.target);
        self.in_transaction = false;
        client
            .close()
            .map_err(|err| Error::Connection(err.to_string()))
    }

    fn is_closed(&self) -> bool {
        self.client.as_ref().is_none_or(Client::is_closed)
    }

    fn server_version(&mut self) -> Result<String> {
        self.show("server_version")
    }

    fn version_number(&mut self) -> Result<i64> {
        let text = self.show("server_version_num")?;
        text.trim()
            .parse()
            .map_err(|_| Error::Query(format!("unexpected server_version_num `{text}`")))
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let statement = Statement {
            sql: "SELECT count(*) FROM pg_catalog.pg_tables \
                  WHERE schemaname = current_schema() AND tablename = $1::text"
                .to_string(),
            params: vec![table.into()],
        };
        let count = self.query(&statement)?.into_scalar();
        Ok(count.as_i64().unwrap_or(0) > 0)
    }
}

impl fmt::Debug for PostgresAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresAdaptor")
            .field("target", &self.target)
            .field("closed", &self.client.is_none())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}
