//! Typed boolean predicates.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr};

use crate::dialect::Dialect;
use crate::error::Error;
use crate::sql::{ColumnRef, SQL, Statement};
use crate::value::SQLValue;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Untyped predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: SQLValue,
    },
    CompareColumn {
        column: ColumnRef,
        op: CompareOp,
        other: ColumnRef,
    },
    Between {
        column: ColumnRef,
        low: SQLValue,
        high: SQLValue,
    },
    InSet {
        column: ColumnRef,
        values: Vec<SQLValue>,
        negated: bool,
    },
    Like {
        column: ColumnRef,
        pattern: String,
        negated: bool,
    },
    Null {
        column: ColumnRef,
        negated: bool,
    },
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

impl Node {
    pub(crate) fn and(self, other: Node) -> Node {
        Node::And(Box::new(self), Box::new(other))
    }

    pub(crate) fn to_sql(&self) -> SQL {
        match self {
            Node::Compare { column, op, value } => SQL::column(*column)
                .push_text(format!(" {} ", op.as_str()))
                .push_param(value.clone()),
            Node::CompareColumn { column, op, other } => SQL::column(*column)
                .push_text(format!(" {} ", op.as_str()))
                .push_column(*other),
            Node::Between { column, low, high } => SQL::column(*column)
                .push_text(" BETWEEN ")
                .push_param(low.clone())
                .push_text(" AND ")
                .push_param(high.clone()),
            Node::InSet {
                values, negated, ..
            } if values.is_empty() => SQL::text(if *negated { "1 = 1" } else { "1 = 0" }),
            Node::InSet {
                column,
                values,
                negated,
            } => {
                let list = SQL::join(values.iter().map(|value| SQL::param(value.clone())), ", ").parens();
                SQL::column(*column)
                    .push_text(if *negated { " NOT IN " } else { " IN " })
                    .append(list)
            }
            Node::Like {
                column,
                pattern,
                negated,
            } => SQL::column(*column)
                .push_text(if *negated { " NOT LIKE " } else { " LIKE " })
                .push_param(pattern.clone()),
            Node::Null { column, negated } => SQL::column(*column).push_text(if *negated {
                " IS NOT NULL"
            } else {
                " IS NULL"
            }),
            Node::And(left, right) => left
                .to_sql()
                .parens()
                .push_text(" AND ")
                .append(right.to_sql().parens()),
            Node::Or(left, right) => left
                .to_sql()
                .parens()
                .push_text(" OR ")
                .append(right.to_sql().parens()),
        }
    }
}

/// A boolean predicate over scope `S`.
///
/// Built from column markers (`User::age().gt(30)`) and combined with
/// [`and`](Condition::and) / [`or`](Condition::or) or the `&` / `|`
/// operators. Conditions over different scopes are different types and
/// cannot be combined.
///
/// An operand outside its column's domain (a NaN decimal) is recorded as
/// [`error`](Condition::error); relations and deletes refuse to run such a
/// condition.
pub struct Condition<S> {
    pub(crate) node: Node,
    pub(crate) error: Option<Error>,
    scope: PhantomData<fn() -> S>,
}

impl<S> Condition<S> {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            node,
            error: None,
            scope: PhantomData,
        }
    }

    pub(crate) fn with_error(mut self, error: Option<Error>) -> Self {
        if self.error.is_none() {
            self.error = error;
        }
        self
    }

    /// Both conditions must hold.
    pub fn and(self, other: Condition<S>) -> Condition<S> {
        Condition::new(self.node.and(other.node)).with_error(self.error.or(other.error))
    }

    /// Either condition must hold.
    pub fn or(self, other: Condition<S>) -> Condition<S> {
        Condition::new(Node::Or(Box::new(self.node), Box::new(other.node)))
            .with_error(self.error.or(other.error))
    }

    /// The first invalid operand recorded while building, if any.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Dialect-neutral fragment.
    pub fn to_sql(&self) -> SQL {
        self.node.to_sql()
    }

    /// SQL text and bound values for `dialect`.
    pub fn render(&self, dialect: Dialect) -> Statement {
        self.to_sql().render(dialect)
    }
}

impl<S> Clone for Condition<S> {
    fn clone(&self) -> Self {
        Condition::new(self.node.clone()).with_error(self.error.clone())
    }
}

impl<S> PartialEq for Condition<S> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.error == other.error
    }
}

impl<S> fmt::Debug for Condition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Condition");
        tuple.field(&self.node);
        if let Some(error) = &self.error {
            tuple.field(error);
        }
        tuple.finish()
    }
}

impl<S> BitAnd for Condition<S> {
    type Output = Condition<S>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<S> BitOr for Condition<S> {
    type Output = Condition<S>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}
