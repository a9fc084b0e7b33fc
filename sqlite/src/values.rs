//! Conversions between [`SQLValue`] and rusqlite's value types.

use relq_core::SQLValue;
use relq_core::value::TIMESTAMP_FORMAT;
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

/// Borrowed parameter binding.
///
/// SQLite has no boolean or timestamp storage class: booleans bind as
/// `0`/`1` and timestamps as text in [`TIMESTAMP_FORMAT`], which sorts
/// chronologically.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SqliteParam<'a>(pub(crate) &'a SQLValue);

impl ToSql for SqliteParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            SQLValue::Null => ToSqlOutput::Owned(Value::Null),
            SQLValue::Boolean(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            SQLValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SQLValue::Real(r) => ToSqlOutput::Owned(Value::Real(*r)),
            SQLValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SQLValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            SQLValue::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

/// Reads one result cell. Text that is not valid UTF-8 is kept as a blob.
pub(crate) fn read_value(value: ValueRef<'_>) -> SQLValue {
    match value {
        ValueRef::Null => SQLValue::Null,
        ValueRef::Integer(i) => SQLValue::Integer(i),
        ValueRef::Real(r) => SQLValue::Real(r),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => SQLValue::Text(text.to_string()),
            Err(_) => SQLValue::Blob(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => SQLValue::Blob(bytes.to_vec()),
    }
}
