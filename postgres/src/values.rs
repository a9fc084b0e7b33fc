//! Conversions between [`SQLValue`] and the postgres wire types.
//!
//! Parameters are coerced to whatever type the server inferred for their
//! placeholder, so an `i64` compared against an `int4` column binds as
//! `int4`. Coercions that would lose information fail instead.

use std::error::Error as StdError;

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres::Row;
use postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use relq_core::value::TIMESTAMP_FORMAT;
use relq_core::{Error, Result, SQLValue};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

type BoxError = Box<dyn StdError + Sync + Send>;

fn is_text(ty: &Type) -> bool {
    matches!(ty.name(), "text" | "varchar" | "bpchar" | "name" | "unknown")
}

fn unsupported(value: &SQLValue, ty: &Type) -> BoxError {
    format!("cannot bind {} as {}", value.type_name(), ty.name()).into()
}

/// Borrowed parameter binding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PgParam<'a>(pub(crate) &'a SQLValue);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
        match self.0 {
            SQLValue::Null => Ok(IsNull::Yes),
            SQLValue::Boolean(b) => match ty.name() {
                "bool" => b.to_sql(ty, out),
                "int2" => i16::from(*b).to_sql(ty, out),
                "int4" => i32::from(*b).to_sql(ty, out),
                "int8" => i64::from(*b).to_sql(ty, out),
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
            SQLValue::Integer(i) => match ty.name() {
                "int2" => i16::try_from(*i)?.to_sql(ty, out),
                "int4" => i32::try_from(*i)?.to_sql(ty, out),
                "int8" => i.to_sql(ty, out),
                "float4" => (*i as f32).to_sql(ty, out),
                "float8" => (*i as f64).to_sql(ty, out),
                "numeric" => Decimal::from(*i).to_sql(ty, out),
                "bool" => (*i != 0).to_sql(ty, out),
                _ if is_text(ty) => i.to_string().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
            SQLValue::Real(r) => match ty.name() {
                "float4" => (*r as f32).to_sql(ty, out),
                "float8" => r.to_sql(ty, out),
                "numeric" => Decimal::try_from(*r)?.to_sql(ty, out),
                _ if is_text(ty) => r.to_string().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
            SQLValue::Text(s) => match ty.name() {
                "bytea" => s.as_bytes().to_sql(ty, out),
                _ if is_text(ty) => s.as_str().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
            SQLValue::Blob(bytes) => match ty.name() {
                "bytea" => bytes.as_slice().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
            SQLValue::Timestamp(ts) => match ty.name() {
                "timestamp" => ts.to_sql(ty, out),
                "timestamptz" => ts.and_utc().to_sql(ty, out),
                "date" => ts.date().to_sql(ty, out),
                _ if is_text(ty) => ts.format(TIMESTAMP_FORMAT).to_string().to_sql(ty, out),
                _ => Err(unsupported(self.0, ty)),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn numeric(value: Decimal) -> SQLValue {
    if value.scale() == 0 {
        if let Some(i) = value.to_i64() {
            return SQLValue::Integer(i);
        }
    }
    value.to_f64().map_or(SQLValue::Null, SQLValue::Real)
}

fn cell<'a, T, F>(row: &'a Row, index: usize, map: F) -> Result<SQLValue>
where
    T: postgres::types::FromSql<'a>,
    F: FnOnce(T) -> SQLValue,
{
    row.try_get::<_, Option<T>>(index)
        .map(|value| value.map_or(SQLValue::Null, map))
        .map_err(|err| Error::Conversion(format!("column {index}: {err}")))
}

/// Reads cell `index` of `row` according to its declared type.
pub(crate) fn read_cell(row: &Row, index: usize) -> Result<SQLValue> {
    let ty = row.columns()[index].type_();
    match ty.name() {
        "bool" => cell(row, index, SQLValue::Boolean),
        "int2" => cell(row, index, |v: i16| SQLValue::Integer(v.into())),
        "int4" => cell(row, index, |v: i32| SQLValue::Integer(v.into())),
        "int8" => cell(row, index, SQLValue::Integer),
        "float4" => cell(row, index, |v: f32| SQLValue::Real(v.into())),
        "float8" => cell(row, index, SQLValue::Real),
        "numeric" => cell(row, index, numeric),
        "text" | "varchar" | "bpchar" | "name" => cell(row, index, SQLValue::Text),
        "bytea" => cell(row, index, SQLValue::Blob),
        "timestamp" => cell(row, index, SQLValue::Timestamp),
        "timestamptz" => cell(row, index, |v: chrono::DateTime<Utc>| {
            SQLValue::Timestamp(v.naive_utc())
        }),
        "date" => cell(row, index, |v: NaiveDate| {
            SQLValue::Timestamp(NaiveDateTime::new(v, NaiveTime::MIN))
        }),
        other => Err(Error::Conversion(format!(
            "column {index} has unsupported type {other}"
        ))),
    }
}
