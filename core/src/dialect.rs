//! SQL dialects and the few places where their rendering differs.

use std::borrow::Cow;
use std::fmt::Write;

/// SQL dialect for backend-specific rendering
///
/// Rendering branches on the dialect in exactly three places: placeholder
/// syntax, identifier quoting and the LIMIT / OFFSET clause.
///
/// # Examples
///
/// ```
/// use relq_core::Dialect;
///
/// assert_eq!(Dialect::PostgreSQL.placeholder(2), "$2");
/// assert_eq!(Dialect::SQLite.placeholder(2), "?2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// SQLite - numbered `?N` placeholders
    #[default]
    SQLite,

    /// PostgreSQL - numbered `$N` placeholders
    PostgreSQL,
}

impl Dialect {
    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Accepts `"sqlite"` as well as `"postgresql"`, `"postgres"` and `"pg"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("sqlite") || s.eq_ignore_ascii_case("sqlite3") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else {
            None
        }
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
        }
    }

    /// Renders the placeholder for the given 1-based parameter index.
    #[inline]
    pub fn placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::SQLite => Cow::Owned(format!("?{index}")),
            Dialect::PostgreSQL => Cow::Owned(format!("${index}")),
        }
    }

    /// Appends `name` as a quoted identifier.
    ///
    /// Both dialects use standard double quotes; embedded quotes are doubled.
    pub fn write_ident(&self, out: &mut String, name: &str) {
        out.push('"');
        for ch in name.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    }

    /// Returns `name` as a quoted identifier.
    pub fn quote_ident(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        self.write_ident(&mut out, name);
        out
    }

    /// Appends the trailing LIMIT / OFFSET clause, with a leading space.
    ///
    /// SQLite only accepts OFFSET after a LIMIT, so a bare offset renders as
    /// `LIMIT -1 OFFSET n` there.
    pub fn write_limit(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match (self, limit, offset) {
            (_, None, None) => {}
            (_, Some(limit), None) => {
                let _ = write!(out, " LIMIT {limit}");
            }
            (_, Some(limit), Some(offset)) => {
                let _ = write!(out, " LIMIT {limit} OFFSET {offset}");
            }
            (Dialect::SQLite, None, Some(offset)) => {
                let _ = write!(out, " LIMIT -1 OFFSET {offset}");
            }
            (Dialect::PostgreSQL, None, Some(offset)) => {
                let _ = write!(out, " OFFSET {offset}");
            }
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| DialectParseError(s.to_string()))
    }
}

/// Error returned when parsing an unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}`")]
pub struct DialectParseError(pub String);
