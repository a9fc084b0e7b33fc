//! Column markers and the comparison builders hanging off them.

use std::fmt;
use std::marker::PhantomData;

use crate::condition::{CompareOp, Condition, Node};
use crate::error::{Error, Result};
use crate::kind::{Kind, Literal, Text};
use crate::model::Model;
use crate::row::RowReader;
use crate::schema::Constraints;
use crate::scope::InScope;
use crate::sql::ColumnRef;
use crate::value::SQLValue;

/// Native value type of column `C`.
pub type ValueOf<C> = <<C as Column>::Kind as Kind>::Value;

/// A column of a mapped model.
///
/// Implementors are zero-sized markers generated by [`model!`](crate::model!).
/// The marker doubles as the column reference used to build conditions:
///
/// ```ignore
/// User::age().between(18, 30).and(User::name().like("A%"))
/// ```
pub trait Column: Copy + Default + fmt::Debug + 'static {
    type Model: Model;
    type Kind: Kind;

    const NAME: &'static str;
    const CONSTRAINTS: Constraints;

    /// Table-qualified reference to this column.
    fn column_ref() -> ColumnRef {
        ColumnRef::new(<Self::Model as Model>::TABLE_NAME, Self::NAME)
    }

    #[doc(hidden)]
    fn compare<S>(op: CompareOp, value: ValueOf<Self>) -> Condition<S> {
        let mut error = None;
        let value = bind_literal::<Self>(&value, &mut error);
        Condition::new(Node::Compare {
            column: Self::column_ref(),
            op,
            value,
        })
        .with_error(error)
    }

    fn eq<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Eq, value.into_value())
    }

    fn ne<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Ne, value.into_value())
    }

    fn lt<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Lt, value.into_value())
    }

    fn le<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Le, value.into_value())
    }

    fn gt<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Gt, value.into_value())
    }

    fn ge<S, I>(self, value: impl Literal<Self::Kind>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Self::compare(CompareOp::Ge, value.into_value())
    }

    /// `column BETWEEN low AND high`, both ends inclusive.
    fn between<S, I>(
        self,
        low: impl Literal<Self::Kind>,
        high: impl Literal<Self::Kind>,
    ) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        let mut error = None;
        let low = bind_literal::<Self>(&low.into_value(), &mut error);
        let high = bind_literal::<Self>(&high.into_value(), &mut error);
        Condition::new(Node::Between {
            column: Self::column_ref(),
            low,
            high,
        })
        .with_error(error)
    }

    /// `column IN (...)`. An empty set matches nothing.
    fn in_set<S, I, L>(self, values: impl IntoIterator<Item = L>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
        L: Literal<Self::Kind>,
    {
        let mut error = None;
        let values = encode_all::<Self, L>(values, &mut error);
        Condition::new(Node::InSet {
            column: Self::column_ref(),
            values,
            negated: false,
        })
        .with_error(error)
    }

    /// `column NOT IN (...)`. An empty set matches everything.
    fn not_in_set<S, I, L>(self, values: impl IntoIterator<Item = L>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
        L: Literal<Self::Kind>,
    {
        let mut error = None;
        let values = encode_all::<Self, L>(values, &mut error);
        Condition::new(Node::InSet {
            column: Self::column_ref(),
            values,
            negated: true,
        })
        .with_error(error)
    }

    fn is_null<S, I>(self) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Condition::new(Node::Null {
            column: Self::column_ref(),
            negated: false,
        })
    }

    fn is_not_null<S, I>(self) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Condition::new(Node::Null {
            column: Self::column_ref(),
            negated: true,
        })
    }

    /// `column = other`, for join predicates. Both columns must hold the
    /// same native value type.
    fn eq_column<S, I, J, O>(self, other: O) -> Condition<S>
    where
        O: Column,
        O::Kind: Kind<Value = ValueOf<Self>>,
        S: InScope<Self::Model, I> + InScope<O::Model, J>,
    {
        let _ = other;
        Condition::new(Node::CompareColumn {
            column: Self::column_ref(),
            op: CompareOp::Eq,
            other: O::column_ref(),
        })
    }

    /// `SET column = value` for [`Relation::update`](crate::Relation::update).
    ///
    /// An out-of-domain value makes the update fail with
    /// [`Error::Domain`] before anything is sent.
    fn set(self, value: impl Literal<Self::Kind>) -> Assignment<Self::Model> {
        let mut error = None;
        let value = bind_literal::<Self>(&value.into_value(), &mut error);
        let mut assignment = Assignment::new(Self::NAME, value);
        assignment.error = error;
        assignment
    }

    /// `SET column = NULL`.
    fn set_null(self) -> Assignment<Self::Model> {
        Assignment::new(Self::NAME, SQLValue::Null)
    }
}

/// Encodes a literal operand, keeping the first domain failure in `error`.
fn bind_literal<C: Column>(value: &ValueOf<C>, error: &mut Option<Error>) -> SQLValue {
    match C::Kind::bind(value) {
        Ok(bound) => bound,
        Err(err) => {
            error.get_or_insert(err);
            C::Kind::encode(value)
        }
    }
}

fn encode_all<C: Column, L: Literal<C::Kind>>(
    values: impl IntoIterator<Item = L>,
    error: &mut Option<Error>,
) -> Vec<SQLValue> {
    values
        .into_iter()
        .map(|value| bind_literal::<C>(&value.into_value(), error))
        .collect()
}

/// Pattern matching, available on text columns only.
pub trait TextColumn: Column<Kind = Text> {
    fn like<S, I>(self, pattern: impl Into<String>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Condition::new(Node::Like {
            column: Self::column_ref(),
            pattern: pattern.into(),
            negated: false,
        })
    }

    fn not_like<S, I>(self, pattern: impl Into<String>) -> Condition<S>
    where
        S: InScope<Self::Model, I>,
    {
        Condition::new(Node::Like {
            column: Self::column_ref(),
            pattern: pattern.into(),
            negated: true,
        })
    }
}

impl<C: Column<Kind = Text>> TextColumn for C {}

/// One `SET` entry of an `UPDATE` on model `M`.
pub struct Assignment<M> {
    pub(crate) column: &'static str,
    pub(crate) value: SQLValue,
    pub(crate) error: Option<Error>,
    model: PhantomData<fn() -> M>,
}

impl<M> Assignment<M> {
    pub(crate) fn new(column: &'static str, value: SQLValue) -> Self {
        Self {
            column,
            value,
            error: None,
            model: PhantomData,
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn value(&self) -> &SQLValue {
        &self.value
    }
}

impl<M> Clone for Assignment<M> {
    fn clone(&self) -> Self {
        let mut assignment = Assignment::new(self.column, self.value.clone());
        assignment.error = self.error.clone();
        assignment
    }
}

impl<M> fmt::Debug for Assignment<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assignment")
            .field("column", &self.column)
            .field("value", &self.value)
            .field("error", &self.error)
            .finish()
    }
}

/// A column list usable as a projection over scope `S`: a single column
/// marker or a tuple of them.
///
/// `I` is an inferred index proving every column is in scope.
pub trait Columns<S, I> {
    /// Row type of [`Relation::select`](crate::Relation::select)
    type Attributes: crate::row::FromRow;
    /// Row type of [`Relation::pluck`](crate::Relation::pluck)
    type Values;

    fn column_refs(&self) -> Vec<ColumnRef>;

    fn read_values(row: &mut RowReader) -> Result<Self::Values>;
}

/// Implements [`Columns`] for one column marker. Used by [`model!`](crate::model!).
#[doc(hidden)]
#[macro_export]
macro_rules! __impl_columns {
    ($marker:ty, $model:ty) => {
        impl<S, I> $crate::Columns<S, I> for $marker
        where
            S: $crate::InScope<$model, I>,
        {
            type Attributes = $crate::Attribute<$marker>;
            type Values = ::std::option::Option<$crate::ValueOf<$marker>>;

            fn column_refs(&self) -> ::std::vec::Vec<$crate::ColumnRef> {
                ::std::vec![<$marker as $crate::Column>::column_ref()]
            }

            fn read_values(row: &mut $crate::RowReader) -> $crate::Result<Self::Values> {
                <<$marker as $crate::Column>::Kind as $crate::Kind>::read(row.next_value()?)
            }
        }
    };
}

macro_rules! impl_columns_tuple {
    ($(($name:ident, $index:ident, $field:tt)),+) => {
        impl<S, $($name, $index),+> Columns<S, ($($index,)+)> for ($($name,)+)
        where
            $($name: Columns<S, $index>),+
        {
            type Attributes = ($($name::Attributes,)+);
            type Values = ($($name::Values,)+);

            fn column_refs(&self) -> Vec<ColumnRef> {
                let mut refs = Vec::new();
                $(refs.extend(self.$field.column_refs());)+
                refs
            }

            fn read_values(row: &mut RowReader) -> Result<Self::Values> {
                Ok(($($name::read_values(row)?,)+))
            }
        }
    };
}

impl_columns_tuple!((A, IA, 0));
impl_columns_tuple!((A, IA, 0), (B, IB, 1));
impl_columns_tuple!((A, IA, 0), (B, IB, 1), (C, IC, 2));
impl_columns_tuple!((A, IA, 0), (B, IB, 1), (C, IC, 2), (D, ID, 3));
impl_columns_tuple!((A, IA, 0), (B, IB, 1), (C, IC, 2), (D, ID, 3), (E, IE, 4));
impl_columns_tuple!(
    (A, IA, 0),
    (B, IB, 1),
    (C, IC, 2),
    (D, ID, 3),
    (E, IE, 4),
    (F, IF, 5)
);
impl_columns_tuple!(
    (A, IA, 0),
    (B, IB, 1),
    (C, IC, 2),
    (D, ID, 3),
    (E, IE, 4),
    (F, IF, 5),
    (G, IG, 6)
);
impl_columns_tuple!(
    (A, IA, 0),
    (B, IB, 1),
    (C, IC, 2),
    (D, ID, 3),
    (E, IE, 4),
    (F, IF, 5),
    (G, IG, 6),
    (H, IH, 7)
);
