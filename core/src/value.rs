//! Dialect-neutral bound values.

use chrono::NaiveDateTime;
use std::fmt;

/// Text layout used whenever a timestamp has to travel as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A value as it is bound to, or read back from, a statement.
///
/// Adaptors translate these into their driver's parameter and row types.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SQLValue {
    /// SQL NULL
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl SQLValue {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, SQLValue::Null)
    }

    /// Name of the variant, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            SQLValue::Null => "null",
            SQLValue::Boolean(_) => "boolean",
            SQLValue::Integer(_) => "integer",
            SQLValue::Real(_) => "real",
            SQLValue::Text(_) => "text",
            SQLValue::Blob(_) => "blob",
            SQLValue::Timestamp(_) => "timestamp",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SQLValue::Integer(i) => Some(*i),
            SQLValue::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SQLValue::Real(f) => Some(*f),
            SQLValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SQLValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SQLValue::Blob(b) => Some(b),
            SQLValue::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Display for SQLValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SQLValue::Null => f.write_str("NULL"),
            SQLValue::Boolean(b) => write!(f, "{b}"),
            SQLValue::Integer(i) => write!(f, "{i}"),
            SQLValue::Real(r) => write!(f, "{r}"),
            SQLValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SQLValue::Blob(b) => {
                f.write_str("X'")?;
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            SQLValue::Timestamp(ts) => write!(f, "'{}'", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SQLValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    SQLValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Boolean,
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    i64 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    f32 => Real,
    f64 => Real,
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
    &[u8] => Blob,
    NaiveDateTime => Timestamp,
}

impl<T: Into<SQLValue>> From<Option<T>> for SQLValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SQLValue::Null, Into::into)
    }
}
