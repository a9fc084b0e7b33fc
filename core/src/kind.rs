//! Value kinds: the closed set of column types an attribute can hold.
//!
//! A kind ties together the native Rust value, its bound [`SQLValue`]
//! representation, its lossless text codec and its domain check.

use chrono::NaiveDateTime;
use std::fmt;
use std::marker::PhantomData;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::schema::{Constraints, Schema};
use crate::value::{SQLValue, TIMESTAMP_FORMAT};

/// Database-level type of a column, used for DDL.
#[derive(Debug, Clone, Copy)]
pub enum ValueType {
    Binary,
    Boolean,
    DateTime,
    Decimal,
    /// Integer column referencing another table's primary key
    ForeignKey(fn() -> &'static Schema),
    Integer { bits: u8, signed: bool },
    Text,
}

impl ValueType {
    /// Column type name for `CREATE TABLE`.
    pub fn sql_type(&self, dialect: Dialect, constraints: &Constraints) -> &'static str {
        match dialect {
            Dialect::SQLite => match self {
                ValueType::Binary => "BLOB",
                ValueType::Boolean | ValueType::ForeignKey(_) | ValueType::Integer { .. } => {
                    "INTEGER"
                }
                ValueType::DateTime | ValueType::Text => "TEXT",
                ValueType::Decimal => "REAL",
            },
            Dialect::PostgreSQL => match self {
                ValueType::Binary => "BYTEA",
                ValueType::Boolean => "BOOLEAN",
                ValueType::DateTime => "TIMESTAMP",
                ValueType::Decimal => "DOUBLE PRECISION",
                ValueType::ForeignKey(_) => "BIGINT",
                ValueType::Integer { bits, signed } => {
                    let serial = constraints.auto_increment;
                    match (*bits, *signed, serial) {
                        (8, _, false) | (16, true, false) => "SMALLINT",
                        (8, _, true) | (16, true, true) => "SMALLSERIAL",
                        (16, false, false) | (32, true, false) => "INTEGER",
                        (16, false, true) | (32, true, true) => "SERIAL",
                        (_, _, false) => "BIGINT",
                        (_, _, true) => "BIGSERIAL",
                    }
                }
                ValueType::Text => "TEXT",
            },
        }
    }

    /// True for kinds whose values have a length (text and binary).
    pub const fn has_length(&self) -> bool {
        matches!(self, ValueType::Text | ValueType::Binary)
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::ForeignKey(a), ValueType::ForeignKey(b)) => a().table == b().table,
            (
                ValueType::Integer { bits, signed },
                ValueType::Integer {
                    bits: other_bits,
                    signed: other_signed,
                },
            ) => bits == other_bits && signed == other_signed,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// A column value kind.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a relq value kind",
    label = "expected one of Binary, Boolean, DateTime, Decimal, ForeignKey, Integer or Text"
)]
pub trait Kind: 'static {
    /// Native value held by an attribute of this kind
    type Value: Clone + PartialEq + fmt::Debug + 'static;

    const TYPE: ValueType;

    /// Bound representation of a value.
    fn encode(value: &Self::Value) -> SQLValue;

    /// Reads a value back from a row cell. NULL decodes to `None`.
    fn decode(value: SQLValue) -> Result<Option<Self::Value>>;

    /// Text codec: `parse(&format(v)) == v` for every in-domain `v`.
    fn format(value: &Self::Value) -> String;

    fn parse(text: &str) -> Result<Self::Value>;

    /// Domain check for values constructed outside the text codec.
    fn check(_value: &Self::Value) -> Result<()> {
        Ok(())
    }

    /// [`decode`](Kind::decode) followed by [`check`](Kind::check) on a
    /// present value.
    fn read(value: SQLValue) -> Result<Option<Self::Value>> {
        let value = Self::decode(value)?;
        if let Some(value) = &value {
            Self::check(value)?;
        }
        Ok(value)
    }

    /// [`check`](Kind::check) followed by [`encode`](Kind::encode).
    fn bind(value: &Self::Value) -> Result<SQLValue> {
        Self::check(value)?;
        Ok(Self::encode(value))
    }
}

/// Kinds that `sum` and `avg` accept.
pub trait Numeric: Kind {}

/// Native values usable as comparison operands for columns of kind `K`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be compared with a `{K}` column",
    label = "wrong value type for this column"
)]
pub trait Literal<K: Kind> {
    fn into_value(self) -> K::Value;
}

fn mismatch(expected: &str, found: &SQLValue) -> Error {
    Error::Conversion(format!("expected {expected}, found {}", found.type_name()))
}

/// Backing integer types of [`Integer`] columns.
///
/// Limited to types that fit a signed 64-bit backend integer.
pub trait Integral:
    Copy + PartialEq + fmt::Debug + fmt::Display + Into<i64> + TryFrom<i64> + 'static
{
    const BITS: u8;
    const SIGNED: bool;
    const NAME: &'static str;
}

macro_rules! impl_integral {
    ($($ty:ty => $bits:literal, $signed:literal);* $(;)?) => {
        $(
            impl Integral for $ty {
                const BITS: u8 = $bits;
                const SIGNED: bool = $signed;
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

impl_integral! {
    i8 => 8, true;
    i16 => 16, true;
    i32 => 32, true;
    i64 => 64, true;
    u8 => 8, false;
    u16 => 16, false;
    u32 => 32, false;
}

fn narrow<I: Integral>(value: i64) -> Result<I> {
    I::try_from(value)
        .map_err(|_| Error::Domain(format!("{value} is out of range for {}", I::NAME)))
}

/// Integer column backed by `I` (default `i32`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer<I = i32>(PhantomData<I>);

impl<I: Integral> Kind for Integer<I> {
    type Value = I;
    const TYPE: ValueType = ValueType::Integer {
        bits: I::BITS,
        signed: I::SIGNED,
    };

    fn encode(value: &I) -> SQLValue {
        SQLValue::Integer((*value).into())
    }

    fn decode(value: SQLValue) -> Result<Option<I>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Integer(i) => narrow(i).map(Some),
            SQLValue::Boolean(b) => narrow(i64::from(b)).map(Some),
            SQLValue::Real(r) if r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64 => {
                narrow(r as i64).map(Some)
            }
            SQLValue::Text(text) => Self::parse(&text).map(Some),
            other => Err(mismatch(I::NAME, &other)),
        }
    }

    fn format(value: &I) -> String {
        value.to_string()
    }

    fn parse(text: &str) -> Result<I> {
        let wide: i128 = text
            .parse()
            .map_err(|_| Error::Conversion(format!("`{text}` is not an integer")))?;
        let value = i64::try_from(wide)
            .map_err(|_| Error::Domain(format!("{text} is out of range for {}", I::NAME)))?;
        narrow(value)
    }
}

impl<I: Integral> Numeric for Integer<I> {}

impl<I: Integral> Literal<Integer<I>> for I {
    #[inline]
    fn into_value(self) -> I {
        self
    }
}

/// Integer column holding the primary key of `M`.
pub struct ForeignKey<M>(PhantomData<fn() -> M>);

impl<M: Model> Kind for ForeignKey<M> {
    type Value = i64;
    const TYPE: ValueType = ValueType::ForeignKey(<M as Model>::schema);

    fn encode(value: &i64) -> SQLValue {
        SQLValue::Integer(*value)
    }

    fn decode(value: SQLValue) -> Result<Option<i64>> {
        Integer::<i64>::decode(value)
    }

    fn format(value: &i64) -> String {
        value.to_string()
    }

    fn parse(text: &str) -> Result<i64> {
        Integer::<i64>::parse(text)
    }
}

impl<M: Model> Literal<ForeignKey<M>> for i64 {
    #[inline]
    fn into_value(self) -> i64 {
        self
    }
}

/// Floating point column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decimal;

impl Kind for Decimal {
    type Value = f64;
    const TYPE: ValueType = ValueType::Decimal;

    fn encode(value: &f64) -> SQLValue {
        SQLValue::Real(*value)
    }

    fn decode(value: SQLValue) -> Result<Option<f64>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Real(r) => Ok(Some(r)),
            SQLValue::Integer(i) => Ok(Some(i as f64)),
            SQLValue::Text(text) => Self::parse(&text).map(Some),
            other => Err(mismatch("decimal", &other)),
        }
    }

    fn format(value: &f64) -> String {
        value.to_string()
    }

    fn parse(text: &str) -> Result<f64> {
        let value: f64 = text
            .parse()
            .map_err(|_| Error::Conversion(format!("`{text}` is not a decimal")))?;
        Self::check(&value)?;
        Ok(value)
    }

    fn check(value: &f64) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Error::Domain(format!("{value} is not a finite decimal")))
        }
    }
}

impl Numeric for Decimal {}

impl Literal<Decimal> for f64 {
    #[inline]
    fn into_value(self) -> f64 {
        self
    }
}

impl Literal<Decimal> for f32 {
    #[inline]
    fn into_value(self) -> f64 {
        f64::from(self)
    }
}

/// Boolean column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Kind for Boolean {
    type Value = bool;
    const TYPE: ValueType = ValueType::Boolean;

    fn encode(value: &bool) -> SQLValue {
        SQLValue::Boolean(*value)
    }

    fn decode(value: SQLValue) -> Result<Option<bool>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Boolean(b) => Ok(Some(b)),
            SQLValue::Integer(i) => Ok(Some(i != 0)),
            SQLValue::Text(text) => Self::parse(&text).map(Some),
            other => Err(mismatch("boolean", &other)),
        }
    }

    fn format(value: &bool) -> String {
        value.to_string()
    }

    fn parse(text: &str) -> Result<bool> {
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Ok(false)
        } else {
            Err(Error::Conversion(format!("`{text}` is not a boolean")))
        }
    }
}

impl Literal<Boolean> for bool {
    #[inline]
    fn into_value(self) -> bool {
        self
    }
}

/// UTF-8 text column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Kind for Text {
    type Value = String;
    const TYPE: ValueType = ValueType::Text;

    fn encode(value: &String) -> SQLValue {
        SQLValue::Text(value.clone())
    }

    fn decode(value: SQLValue) -> Result<Option<String>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Text(text) => Ok(Some(text)),
            SQLValue::Blob(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|err| Error::Conversion(format!("invalid UTF-8 in text column: {err}"))),
            other => Err(mismatch("text", &other)),
        }
    }

    fn format(value: &String) -> String {
        value.clone()
    }

    fn parse(text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

impl Literal<Text> for &str {
    #[inline]
    fn into_value(self) -> String {
        self.to_string()
    }
}

impl Literal<Text> for String {
    #[inline]
    fn into_value(self) -> String {
        self
    }
}

impl Literal<Text> for &String {
    #[inline]
    fn into_value(self) -> String {
        self.clone()
    }
}

/// Byte string column. Text form is lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Kind for Binary {
    type Value = Vec<u8>;
    const TYPE: ValueType = ValueType::Binary;

    fn encode(value: &Vec<u8>) -> SQLValue {
        SQLValue::Blob(value.clone())
    }

    fn decode(value: SQLValue) -> Result<Option<Vec<u8>>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Blob(bytes) => Ok(Some(bytes)),
            SQLValue::Text(text) => Ok(Some(text.into_bytes())),
            other => Err(mismatch("binary", &other)),
        }
    }

    fn format(value: &Vec<u8>) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut out = String::with_capacity(value.len() * 2);
        for byte in value {
            out.push(HEX[usize::from(byte >> 4)] as char);
            out.push(HEX[usize::from(byte & 0x0f)] as char);
        }
        out
    }

    fn parse(text: &str) -> Result<Vec<u8>> {
        if text.len() % 2 != 0 {
            return Err(Error::Conversion(format!(
                "hex string has odd length {}",
                text.len()
            )));
        }
        let digit = |c: u8| -> Result<u8> {
            match c {
                b'0'..=b'9' => Ok(c - b'0'),
                b'a'..=b'f' => Ok(c - b'a' + 10),
                b'A'..=b'F' => Ok(c - b'A' + 10),
                _ => Err(Error::Conversion(format!(
                    "`{}` is not a hex digit",
                    c as char
                ))),
            }
        };
        text.as_bytes()
            .chunks_exact(2)
            .map(|pair| Ok((digit(pair[0])? << 4) | digit(pair[1])?))
            .collect()
    }
}

impl Literal<Binary> for Vec<u8> {
    #[inline]
    fn into_value(self) -> Vec<u8> {
        self
    }
}

impl Literal<Binary> for &[u8] {
    #[inline]
    fn into_value(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> Literal<Binary> for &[u8; N] {
    #[inline]
    fn into_value(self) -> Vec<u8> {
        self.to_vec()
    }
}

/// Timestamp column without time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTime;

impl Kind for DateTime {
    type Value = NaiveDateTime;
    const TYPE: ValueType = ValueType::DateTime;

    fn encode(value: &NaiveDateTime) -> SQLValue {
        SQLValue::Timestamp(*value)
    }

    fn decode(value: SQLValue) -> Result<Option<NaiveDateTime>> {
        match value {
            SQLValue::Null => Ok(None),
            SQLValue::Timestamp(ts) => Ok(Some(ts)),
            SQLValue::Text(text) => Self::parse(&text).map(Some),
            other => Err(mismatch("datetime", &other)),
        }
    }

    fn format(value: &NaiveDateTime) -> String {
        value.format(TIMESTAMP_FORMAT).to_string()
    }

    fn parse(text: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
            .map_err(|err| Error::Conversion(format!("`{text}` is not a datetime: {err}")))
    }
}

impl Literal<DateTime> for NaiveDateTime {
    #[inline]
    fn into_value(self) -> NaiveDateTime {
        self
    }
}
