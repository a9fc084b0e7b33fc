//! Typed column values.

use chrono::NaiveDateTime;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::column::{Assignment, Column, ValueOf};
use crate::condition::{CompareOp, Condition, Node};
use crate::error::{Error, Result};
use crate::kind::{Kind, Literal};
use crate::row::{FromRow, RowReader};
use crate::scope::InScope;
use crate::value::SQLValue;

/// The value of column `C` for one record. Absent means SQL NULL.
///
/// A present value always satisfies the column kind's domain:
/// constructors that could break it ([`try_new`](Attribute::try_new),
/// [`FromStr`]) validate, and the infallible `From` conversions only exist
/// for native types that cannot fall outside it.
pub struct Attribute<C: Column> {
    value: Option<ValueOf<C>>,
    column: PhantomData<C>,
}

impl<C: Column> Attribute<C> {
    /// An absent (NULL) value.
    pub const fn null() -> Self {
        Self {
            value: None,
            column: PhantomData,
        }
    }

    /// Wraps a native value after checking its domain.
    pub fn try_new(value: ValueOf<C>) -> Result<Self> {
        C::Kind::check(&value)?;
        Ok(Self::present(value))
    }

    /// Like [`try_new`](Attribute::try_new), `None` giving NULL.
    pub fn from_option(value: Option<ValueOf<C>>) -> Result<Self> {
        match value {
            Some(value) => Self::try_new(value),
            None => Ok(Self::null()),
        }
    }

    fn present(value: ValueOf<C>) -> Self {
        Self {
            value: Some(value),
            column: PhantomData,
        }
    }

    pub fn value(&self) -> Option<&ValueOf<C>> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<ValueOf<C>> {
        self.value
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// The column this value belongs to.
    pub fn column(&self) -> C {
        C::default()
    }

    pub fn name(&self) -> &'static str {
        C::NAME
    }

    /// Bound representation, NULL when absent.
    pub fn to_sql_value(&self) -> SQLValue {
        self.value.as_ref().map_or(SQLValue::Null, C::Kind::encode)
    }

    /// Decodes a row cell, checking the domain.
    pub fn from_sql_value(value: SQLValue) -> Result<Self> {
        Self::from_option(C::Kind::decode(value)?)
    }

    /// Equality with the held value, or `IS NULL` when absent.
    pub fn to_condition<S, I>(&self) -> Condition<S>
    where
        S: InScope<C::Model, I>,
    {
        match &self.value {
            Some(value) => Condition::new(Node::Compare {
                column: C::column_ref(),
                op: CompareOp::Eq,
                value: C::Kind::encode(value),
            }),
            None => Condition::new(Node::Null {
                column: C::column_ref(),
                negated: false,
            }),
        }
    }
}

impl<C: Column> Clone for Attribute<C> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            column: PhantomData,
        }
    }
}

impl<C: Column> PartialEq for Attribute<C> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<C: Column> Default for Attribute<C> {
    fn default() -> Self {
        Self::null()
    }
}

impl<C: Column> fmt::Debug for Attribute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({:?})", C::NAME, value),
            None => write!(f, "{}(NULL)", C::NAME),
        }
    }
}

impl<C: Column> fmt::Display for Attribute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.write_str(&C::Kind::format(value)),
            None => f.write_str("NULL"),
        }
    }
}

impl<C: Column> FromStr for Attribute<C> {
    type Err = Error;

    /// Always yields a present value; `"NULL"` is text like any other.
    fn from_str(text: &str) -> Result<Self> {
        let value = C::Kind::parse(text)?;
        Self::try_new(value)
    }
}

impl<C: Column> FromRow for Attribute<C> {
    fn from_row(row: &mut RowReader) -> Result<Self> {
        let position = row.position();
        Self::from_sql_value(row.next_value()?).map_err(|err| match err {
            Error::Conversion(msg) => {
                Error::Conversion(format!("column {position} (`{}`): {msg}", C::NAME))
            }
            Error::Domain(msg) => Error::Domain(format!("column {position} (`{}`): {msg}", C::NAME)),
            other => other,
        })
    }
}

impl<C: Column> From<Attribute<C>> for Assignment<C::Model> {
    fn from(attribute: Attribute<C>) -> Self {
        Assignment::new(C::NAME, attribute.to_sql_value())
    }
}

macro_rules! impl_from_native {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<C: Column> From<$ty> for Attribute<C>
            where
                $ty: Literal<C::Kind>,
            {
                fn from(value: $ty) -> Self {
                    Self::present(value.into_value())
                }
            }
        )*
    };
}

impl_from_native!(i8, i16, i32, i64, u8, u16, u32, bool, String, Vec<u8>, NaiveDateTime);

impl<'a, C: Column> From<&'a str> for Attribute<C>
where
    &'a str: Literal<C::Kind>,
{
    fn from(value: &'a str) -> Self {
        Self::present(value.into_value())
    }
}

impl<'a, C: Column> From<&'a [u8]> for Attribute<C>
where
    &'a [u8]: Literal<C::Kind>,
{
    fn from(value: &'a [u8]) -> Self {
        Self::present(value.into_value())
    }
}
