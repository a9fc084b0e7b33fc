//! Dialect-neutral SQL fragments and the statements rendered from them.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;

use crate::dialect::Dialect;
use crate::value::SQLValue;

/// A fully qualified column: `"table"."column"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: &'static str,
    pub name: &'static str,
}

impl ColumnRef {
    pub const fn new(table: &'static str, name: &'static str) -> Self {
        Self { table, name }
    }
}

/// A SQL chunk represents a part of an SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk {
    /// Verbatim text, keywords and punctuation included
    Text(Cow<'static, str>),
    /// A single quoted identifier
    Ident(Cow<'static, str>),
    /// A table-qualified column
    Column(ColumnRef),
    /// A bound value, rendered as the dialect's next placeholder
    Param(SQLValue),
    /// LIMIT / OFFSET, whose shape depends on the dialect
    Limit {
        limit: Option<u64>,
        offset: Option<u64>,
    },
}

/// An ordered list of chunks. Rendering numbers the parameters left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SQL {
    chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
        Self::empty().push_text(text)
    }

    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self::empty().push_ident(name)
    }

    pub fn column(column: ColumnRef) -> Self {
        Self::empty().push_column(column)
    }

    pub fn param(value: impl Into<SQLValue>) -> Self {
        Self::empty().push_param(value)
    }

    pub fn push_text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.chunks.push(SQLChunk::Text(text.into()));
        self
    }

    pub fn push_ident(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.chunks.push(SQLChunk::Ident(name.into()));
        self
    }

    pub fn push_column(mut self, column: ColumnRef) -> Self {
        self.chunks.push(SQLChunk::Column(column));
        self
    }

    pub fn push_param(mut self, value: impl Into<SQLValue>) -> Self {
        self.chunks.push(SQLChunk::Param(value.into()));
        self
    }

    pub fn push_limit(mut self, limit: Option<u64>, offset: Option<u64>) -> Self {
        if limit.is_some() || offset.is_some() {
            self.chunks.push(SQLChunk::Limit { limit, offset });
        }
        self
    }

    pub fn append(mut self, other: SQL) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    /// Wraps the fragment in parentheses.
    pub fn parens(self) -> Self {
        SQL::text("(").append(self).push_text(")")
    }

    /// Joins fragments with a separator, e.g. `", "`.
    pub fn join<I>(parts: I, separator: &'static str) -> Self
    where
        I: IntoIterator<Item = SQL>,
    {
        let mut out = SQL::empty();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out = out.push_text(separator);
            }
            out = out.append(part);
        }
        out
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[SQLChunk] {
        &self.chunks
    }

    /// Number of bound values in the fragment.
    pub fn param_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| matches!(chunk, SQLChunk::Param(_)))
            .count()
    }

    /// Renders the fragment for `dialect`.
    pub fn render(&self, dialect: Dialect) -> Statement {
        let mut sql = String::with_capacity(self.chunks.len() * 8);
        let mut params = Vec::with_capacity(self.param_count());
        for chunk in &self.chunks {
            match chunk {
                SQLChunk::Text(text) => sql.push_str(text),
                SQLChunk::Ident(name) => dialect.write_ident(&mut sql, name),
                SQLChunk::Column(column) => {
                    dialect.write_ident(&mut sql, column.table);
                    sql.push('.');
                    dialect.write_ident(&mut sql, column.name);
                }
                SQLChunk::Param(value) => {
                    params.push(value.clone());
                    sql.push_str(&dialect.placeholder(params.len()));
                }
                SQLChunk::Limit { limit, offset } => dialect.write_limit(&mut sql, *limit, *offset),
            }
        }
        Statement { sql, params }
    }
}

/// Rendered SQL text plus its positional bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SQLValue>,
}

impl Statement {
    /// A statement without bindings.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
