//! Shared fixtures for unit tests: two models and an adaptor that records
//! statements instead of running them.

use std::collections::VecDeque;

use crate::adaptor::Adaptor;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::kind::{Binary, Boolean, DateTime, Decimal, ForeignKey, Integer, Text};
use crate::row::Rows;
use crate::sql::Statement;
use crate::value::SQLValue;

crate::model! {
    pub struct User in "users" {
        id: Integer<i64> [primary_key, auto_increment],
        name: Text [not_null, max_length(16)],
        age: Integer<i32>,
        score: Decimal,
        active: Boolean,
        avatar: Binary,
        joined_at: DateTime,
    }
}

crate::model! {
    pub struct Post in "posts" {
        id: Integer<i64> [primary_key, auto_increment],
        user_id: ForeignKey<User> [not_null],
        title: Text,
    }
}

crate::model! {
    pub struct Tag in "tags" {
        id: Integer<i64> [primary_key, auto_increment],
        label: Text,
    }
}

#[derive(Debug)]
pub struct Recorder {
    pub dialect: Dialect,
    pub statements: Vec<Statement>,
    pub responses: VecDeque<Rows>,
    pub affected: u64,
    pub in_transaction: bool,
    pub closed: bool,
    pub fail_rollback: bool,
    pub batches: Vec<String>,
}

impl Recorder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            statements: Vec::new(),
            responses: VecDeque::new(),
            affected: 0,
            in_transaction: false,
            closed: false,
            fail_rollback: false,
            batches: Vec::new(),
        }
    }

    /// Queues a single-row, single-column response.
    pub fn respond_scalar(&mut self, value: SQLValue) {
        let mut rows = Rows::new(vec!["value".to_string()]);
        rows.push(vec![value]);
        self.responses.push_back(rows);
    }

    pub fn respond(&mut self, rows: Rows) {
        self.responses.push_back(rows);
    }

    pub fn last(&self) -> &Statement {
        self.statements.last().expect("no statement recorded")
    }
}

impl Adaptor for Recorder {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn query(&mut self, statement: &Statement) -> Result<Rows> {
        self.statements.push(statement.clone());
        Ok(self.responses.pop_front().unwrap_or_default())
    }

    fn execute(&mut self, statement: &Statement) -> Result<u64> {
        self.statements.push(statement.clone());
        Ok(self.affected)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.batches.push(sql.to_string());
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(Error::Usage("transaction already open".into()));
        }
        self.batches.push("BEGIN".into());
        self.in_transaction = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.batches.push("COMMIT".into());
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.batches.push("ROLLBACK".into());
        self.in_transaction = false;
        if self.fail_rollback {
            return Err(Error::Query("rollback refused".into()));
        }
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn server_version(&mut self) -> Result<String> {
        Ok("recorder".into())
    }

    fn version_number(&mut self) -> Result<i64> {
        Ok(0)
    }

    fn table_exists(&mut self, _table: &str) -> Result<bool> {
        Ok(false)
    }
}
