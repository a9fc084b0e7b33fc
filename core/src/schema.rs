//! Static table descriptions and the DDL rendered from them.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::kind::ValueType;
use crate::sql::ColumnRef;
use crate::value::SQLValue;

/// Column constraints, built with const chains:
///
/// ```
/// use relq_core::Constraints;
///
/// const PK: Constraints = Constraints::new().primary_key().auto_increment();
/// assert!(PK.primary_key && PK.auto_increment);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
    pub auto_increment: bool,
    /// Upper bound on the length of text (characters) or binary (bytes) values
    pub max_length: Option<usize>,
}

impl Constraints {
    pub const fn new() -> Self {
        Self {
            primary_key: false,
            not_null: false,
            unique: false,
            auto_increment: false,
            max_length: None,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub const fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// True when the database fills the column in on insert.
    pub const fn is_generated(&self) -> bool {
        self.primary_key && self.auto_increment
    }
}

/// One column of a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub value_type: ValueType,
    pub constraints: Constraints,
}

impl ColumnDef {
    pub const fn new(name: &'static str, value_type: ValueType, constraints: Constraints) -> Self {
        Self {
            name,
            value_type,
            constraints,
        }
    }

    /// Checks a bound value against the column's constraints.
    pub fn validate(&self, value: &SQLValue) -> Result<()> {
        if value.is_null() {
            if (self.constraints.not_null || self.constraints.primary_key)
                && !self.constraints.is_generated()
            {
                return Err(Error::Domain(format!("`{}` must not be null", self.name)));
            }
            return Ok(());
        }
        if let Some(max) = self.constraints.max_length {
            let length = match value {
                SQLValue::Text(text) => text.chars().count(),
                SQLValue::Blob(bytes) => bytes.len(),
                _ => 0,
            };
            if length > max {
                return Err(Error::Domain(format!(
                    "`{}` is {length} long, longer than the allowed {max}",
                    self.name
                )));
            }
        }
        Ok(())
    }

    fn write_sql(&self, dialect: Dialect, out: &mut String) -> Result<()> {
        let constraints = &self.constraints;
        dialect.write_ident(out, self.name);
        out.push(' ');
        out.push_str(self.value_type.sql_type(dialect, constraints));

        if constraints.primary_key {
            out.push_str(" PRIMARY KEY");
            if constraints.auto_increment && dialect == Dialect::SQLite {
                out.push_str(" AUTOINCREMENT");
            }
        } else if constraints.not_null {
            out.push_str(" NOT NULL");
        }
        if constraints.unique && !constraints.primary_key {
            out.push_str(" UNIQUE");
        }
        if let Some(max) = constraints.max_length.filter(|_| self.value_type.has_length()) {
            out.push_str(" CHECK(length(");
            dialect.write_ident(out, self.name);
            out.push_str(&format!(") <= {max})"));
        }
        if let ValueType::ForeignKey(target) = self.value_type {
            let target = target();
            let key = target.primary_key().ok_or_else(|| {
                Error::Schema(format!(
                    "`{}` references `{}`, which has no primary key",
                    self.name, target.table
                ))
            })?;
            out.push_str(" REFERENCES ");
            dialect.write_ident(out, target.table);
            out.push_str(" (");
            dialect.write_ident(out, key.name);
            out.push(')');
        }
        Ok(())
    }
}

/// Whether `CREATE TABLE` fails or is skipped when the table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreateMode {
    #[default]
    AbortIfExists,
    IfNotExists,
}

/// Static description of a mapped table.
#[derive(Debug, PartialEq)]
pub struct Schema {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
}

impl Schema {
    pub const fn new(table: &'static str, columns: &'static [ColumnDef]) -> Self {
        Self { table, columns }
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.constraints.primary_key)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Every column, qualified with the table name, in declaration order.
    pub fn column_refs(&self) -> Vec<ColumnRef> {
        self.columns
            .iter()
            .map(|c| ColumnRef::new(self.table, c.name))
            .collect()
    }

    /// Renders `CREATE TABLE`.
    pub fn to_sql(&self, dialect: Dialect, mode: CreateMode) -> Result<String> {
        if self.columns.is_empty() {
            return Err(Error::Schema(format!("`{}` has no columns", self.table)));
        }
        let mut out = String::from("CREATE TABLE ");
        if mode == CreateMode::IfNotExists {
            out.push_str("IF NOT EXISTS ");
        }
        dialect.write_ident(&mut out, self.table);
        out.push_str(" (");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            column.write_sql(dialect, &mut out)?;
        }
        out.push(')');
        Ok(out)
    }

    /// Renders `DROP TABLE`.
    pub fn drop_sql(&self, dialect: Dialect) -> String {
        format!("DROP TABLE {}", dialect.quote_ident(self.table))
    }

    /// Checks a record's values, given in column order.
    pub fn validate(&self, values: &[SQLValue]) -> Result<()> {
        self.columns
            .iter()
            .zip(values)
            .try_for_each(|(column, value)| column.validate(value))
    }
}
