//! Typed query pipelines.
//!
//! A [`Relation`] accumulates clauses in any order and always renders them in
//! canonical order: SELECT, FROM / JOIN, WHERE, GROUP BY, ORDER BY,
//! LIMIT / OFFSET. Builder methods consume and return the relation; terminal
//! methods borrow it mutably, execute through an [`Adaptor`] and leave it
//! finalized.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::adaptor::Adaptor;
use crate::column::{Assignment, Column, Columns, ValueOf};
use crate::condition::{CompareOp, Condition, Node};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::kind::{Decimal, Integer, Kind, Numeric};
use crate::model::Model;
use crate::row::{FromRow, RowReader};
use crate::scope::{InScope, Joined, Scope};
use crate::sql::{ColumnRef, SQL, Statement};
use crate::value::SQLValue;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    const fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT JOIN ",
        }
    }
}

/// Lifecycle of a relation. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing recorded yet
    Initial,
    /// A condition has been recorded
    Filtering,
    /// Projection, grouping, ordering, limits or joins have been recorded
    Shaping,
    /// A terminal operation ran
    Finalized,
}

#[derive(Debug, Clone, PartialEq)]
struct Join {
    table: &'static str,
    kind: JoinKind,
    on: Node,
}

#[derive(Debug, Clone, Copy)]
enum Aggregate {
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl Aggregate {
    const fn function(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Count => "COUNT",
        }
    }
}

/// A query over scope `S` producing rows of type `Out`.
pub struct Relation<S: Scope, Out> {
    projection: Vec<ColumnRef>,
    joins: Vec<Join>,
    condition: Option<Node>,
    group_by: Vec<ColumnRef>,
    order_by: Vec<(ColumnRef, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
    phase: Phase,
    error: Option<Error>,
    marker: PhantomData<fn() -> (S, Out)>,
}

fn finalized() -> Error {
    Error::Usage("relation already executed".to_string())
}

impl<S: Scope, Out> Relation<S, Out> {
    pub(crate) fn new(projection: Vec<ColumnRef>) -> Self {
        Self {
            projection,
            joins: Vec::new(),
            condition: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            phase: Phase::Initial,
            error: None,
            marker: PhantomData,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves the relation forward, or records a usage error when it has
    /// already been executed. Returns false in the latter case.
    fn advance(&mut self, phase: Phase) -> bool {
        if self.phase == Phase::Finalized {
            if self.error.is_none() {
                self.error = Some(finalized());
            }
            return false;
        }
        self.phase = self.phase.max(phase);
        true
    }

    fn recast<T, Out2>(self, projection: Vec<ColumnRef>) -> Relation<T, Out2>
    where
        T: Scope,
    {
        Relation {
            projection,
            joins: self.joins,
            condition: self.condition,
            group_by: self.group_by,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            phase: self.phase,
            error: self.error,
            marker: PhantomData,
        }
    }

    fn record(&mut self, error: Option<Error>) {
        if self.error.is_none() {
            self.error = error;
        }
    }

    /// AND-composes `condition` with what is already recorded.
    pub fn r#where(mut self, condition: Condition<S>) -> Self {
        if self.advance(Phase::Filtering) {
            self.record(condition.error);
            self.condition = Some(match self.condition.take() {
                Some(existing) => existing.and(condition.node),
                None => condition.node,
            });
        }
        self
    }

    pub(crate) fn filter_raw(&mut self, column: &'static str, value: SQLValue) {
        let node = Node::Compare {
            column: ColumnRef::new(<S::Root as Model>::TABLE_NAME, column),
            op: CompareOp::Eq,
            value,
        };
        if self.advance(Phase::Filtering) {
            self.condition = Some(match self.condition.take() {
                Some(existing) => existing.and(node),
                None => node,
            });
        }
    }

    /// Projects to the given columns; rows become tuples of attributes.
    pub fn select<K, I>(mut self, columns: K) -> Relation<S, K::Attributes>
    where
        K: Columns<S, I>,
    {
        let projection = columns.column_refs();
        self.advance(Phase::Shaping);
        self.recast(projection)
    }

    /// Appends grouping columns.
    pub fn group_by<K, I>(mut self, columns: K) -> Self
    where
        K: Columns<S, I>,
    {
        if self.advance(Phase::Shaping) {
            self.group_by.extend(columns.column_refs());
        }
        self
    }

    /// Appends an ordering term.
    pub fn order_by<C, I>(mut self, column: C, order: Order) -> Self
    where
        C: Column,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        if self.advance(Phase::Shaping) {
            self.order_by.push((C::column_ref(), order));
        }
        self
    }

    /// Caps the number of rows. A later call replaces the earlier one.
    pub fn limit(mut self, limit: u64) -> Self {
        if self.advance(Phase::Shaping) {
            self.limit = Some(limit);
        }
        self
    }

    /// Skips rows. A later call replaces the earlier one.
    pub fn offset(mut self, offset: u64) -> Self {
        if self.advance(Phase::Shaping) {
            self.offset = Some(offset);
        }
        self
    }

    /// `INNER JOIN` model `N` on `on`.
    pub fn join<N: Model>(self, on: Condition<Joined<S, N>>) -> Relation<Joined<S, N>, Out> {
        self.push_join(JoinKind::Inner, on)
    }

    /// `LEFT JOIN` model `N` on `on`.
    pub fn left_join<N: Model>(self, on: Condition<Joined<S, N>>) -> Relation<Joined<S, N>, Out> {
        self.push_join(JoinKind::Left, on)
    }

    fn push_join<N: Model>(
        mut self,
        kind: JoinKind,
        on: Condition<Joined<S, N>>,
    ) -> Relation<Joined<S, N>, Out> {
        if self.advance(Phase::Shaping) {
            self.record(on.error);
            self.joins.push(Join {
                table: N::TABLE_NAME,
                kind,
                on: on.node,
            });
        }
        let projection = std::mem::take(&mut self.projection);
        self.recast(projection)
    }

    /// FROM, JOIN and WHERE.
    fn source_sql(&self) -> SQL {
        let mut sql = SQL::text(" FROM ").push_ident(<S::Root as Model>::TABLE_NAME);
        for join in &self.joins {
            sql = sql
                .push_text(join.kind.keyword())
                .push_ident(join.table)
                .push_text(" ON ")
                .append(join.on.to_sql());
        }
        if let Some(condition) = &self.condition {
            sql = sql.push_text(" WHERE ").append(condition.to_sql());
        }
        sql
    }

    fn group_sql(group_by: &[ColumnRef]) -> SQL {
        if group_by.is_empty() {
            return SQL::empty();
        }
        SQL::text(" GROUP BY ").append(SQL::join(group_by.iter().copied().map(SQL::column), ", "))
    }

    fn select_sql(&self, projection: &[ColumnRef]) -> SQL {
        let mut sql = SQL::text("SELECT ")
            .append(SQL::join(projection.iter().copied().map(SQL::column), ", "))
            .append(self.source_sql())
            .append(Self::group_sql(&self.group_by));
        if !self.order_by.is_empty() {
            let terms = self.order_by.iter().map(|(column, order)| {
                SQL::column(*column)
                    .push_text(" ")
                    .push_text(order.as_str())
            });
            sql = sql.push_text(" ORDER BY ").append(SQL::join(terms, ", "));
        }
        sql.push_limit(self.limit, self.offset)
    }

    fn aggregate_sql(&self, aggregate: Aggregate, column: Option<ColumnRef>) -> Result<SQL> {
        if !self.group_by.is_empty() {
            return Err(Error::Usage(format!(
                "{} on a grouped relation; use count_by for per-group counts",
                aggregate.function()
            )));
        }
        let argument = column.map_or_else(|| SQL::text("*"), SQL::column);
        Ok(SQL::text("SELECT ")
            .push_text(aggregate.function())
            .append(argument.parens())
            .append(self.source_sql()))
    }

    /// The SELECT this relation runs on [`exec`](Relation::exec), as it
    /// would be sent through an adaptor of `dialect`.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Statement> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(self.select_sql(&self.projection).render(dialect))
    }

    /// Marks the relation executed. Fails if it already was, or if a builder
    /// call was made after that.
    fn finalize(&mut self) -> Result<()> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.phase == Phase::Finalized {
            return Err(finalized());
        }
        self.phase = Phase::Finalized;
        Ok(())
    }

    /// Runs the query and decodes every row.
    pub fn exec<A>(&mut self, adaptor: &mut A) -> Result<Vec<Out>>
    where
        A: Adaptor + ?Sized,
        Out: FromRow,
    {
        self.finalize()?;
        let statement = self.select_sql(&self.projection).render(adaptor.dialect());
        adaptor.query(&statement)?.decode()
    }

    /// Runs the query projected to `columns`, returning bare values.
    pub fn pluck<A, K, I>(&mut self, adaptor: &mut A, columns: K) -> Result<Vec<K::Values>>
    where
        A: Adaptor + ?Sized,
        K: Columns<S, I>,
    {
        self.finalize()?;
        let statement = self
            .select_sql(&columns.column_refs())
            .render(adaptor.dialect());
        adaptor
            .query(&statement)?
            .into_iter()
            .map(|cells| {
                let mut row = RowReader::new(cells);
                let values = K::read_values(&mut row)?;
                row.finish()?;
                Ok(values)
            })
            .collect()
    }

    fn scalar<A>(&mut self, adaptor: &mut A, aggregate: Aggregate, column: Option<ColumnRef>) -> Result<SQLValue>
    where
        A: Adaptor + ?Sized,
    {
        self.finalize()?;
        let statement = self.aggregate_sql(aggregate, column)?.render(adaptor.dialect());
        Ok(adaptor.query(&statement)?.into_scalar())
    }

    /// `SUM(column)`; absent on an empty set.
    pub fn sum<A, C, I>(&mut self, adaptor: &mut A, column: C) -> Result<Option<ValueOf<C>>>
    where
        A: Adaptor + ?Sized,
        C: Column,
        C::Kind: Numeric,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        let value = self.scalar(adaptor, Aggregate::Sum, Some(C::column_ref()))?;
        C::Kind::read(value)
    }

    /// `AVG(column)`; absent on an empty set.
    pub fn avg<A, C, I>(&mut self, adaptor: &mut A, column: C) -> Result<Option<f64>>
    where
        A: Adaptor + ?Sized,
        C: Column,
        C::Kind: Numeric,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        let value = self.scalar(adaptor, Aggregate::Avg, Some(C::column_ref()))?;
        Decimal::read(value)
    }

    /// `MIN(column)`; absent on an empty set.
    pub fn min<A, C, I>(&mut self, adaptor: &mut A, column: C) -> Result<Option<ValueOf<C>>>
    where
        A: Adaptor + ?Sized,
        C: Column,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        let value = self.scalar(adaptor, Aggregate::Min, Some(C::column_ref()))?;
        C::Kind::read(value)
    }

    /// `MAX(column)`; absent on an empty set.
    pub fn max<A, C, I>(&mut self, adaptor: &mut A, column: C) -> Result<Option<ValueOf<C>>>
    where
        A: Adaptor + ?Sized,
        C: Column,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        let value = self.scalar(adaptor, Aggregate::Max, Some(C::column_ref()))?;
        C::Kind::read(value)
    }

    /// `COUNT(*)`.
    pub fn count<A>(&mut self, adaptor: &mut A) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        let value = self.scalar(adaptor, Aggregate::Count, None)?;
        decode_count(value)
    }

    /// `COUNT(column)`: rows where `column` is not NULL.
    pub fn count_of<A, C, I>(&mut self, adaptor: &mut A, column: C) -> Result<u64>
    where
        A: Adaptor + ?Sized,
        C: Column,
        S: InScope<C::Model, I>,
    {
        let _ = column;
        let value = self.scalar(adaptor, Aggregate::Count, Some(C::column_ref()))?;
        decode_count(value)
    }

    /// Row counts per distinct value of `keys`, grouped on the relation's
    /// existing grouping columns followed by `keys`.
    pub fn count_by<A, K, I>(&mut self, adaptor: &mut A, keys: K) -> Result<HashMap<K::Values, u64>>
    where
        A: Adaptor + ?Sized,
        K: Columns<S, I>,
        K::Values: Eq + Hash,
    {
        self.finalize()?;
        let key_refs = keys.column_refs();
        let mut group_by = self.group_by.clone();
        group_by.extend(key_refs.iter().copied());

        let sql = SQL::text("SELECT ")
            .append(SQL::join(key_refs.iter().copied().map(SQL::column), ", "))
            .push_text(", COUNT(*)")
            .append(self.source_sql())
            .append(Self::group_sql(&group_by));
        let statement = sql.render(adaptor.dialect());

        let mut counts = HashMap::new();
        for cells in adaptor.query(&statement)? {
            let mut row = RowReader::new(cells);
            let key = K::read_values(&mut row)?;
            let count = decode_count(row.next_value()?)?;
            row.finish()?;
            *counts.entry(key).or_insert(0) += count;
        }
        Ok(counts)
    }
}

fn decode_count(value: SQLValue) -> Result<u64> {
    let count = Integer::<i64>::decode(value)?.unwrap_or(0);
    u64::try_from(count).map_err(|_| Error::Query(format!("negative row count {count}")))
}

impl<M: Model, Out> Relation<M, Out> {
    /// First recorded clause an `UPDATE` cannot express.
    fn unsupported_in_update(&self) -> Option<&'static str> {
        if self.limit.is_some() {
            Some("limit")
        } else if self.offset.is_some() {
            Some("offset")
        } else if !self.order_by.is_empty() {
            Some("order_by")
        } else if !self.group_by.is_empty() {
            Some("group_by")
        } else if self.projection != M::SCHEMA.column_refs() {
            Some("select")
        } else {
            None
        }
    }

    fn update_sql(&self, assignments: &[Assignment<M>]) -> Result<SQL> {
        if let Some(clause) = self.unsupported_in_update() {
            return Err(Error::Usage(format!(
                "update on a relation with {clause}; narrow it with a condition instead"
            )));
        }
        if assignments.is_empty() {
            return Err(Error::Usage("update without assignments".to_string()));
        }
        if let Some(error) = assignments.iter().find_map(|assignment| assignment.error.clone()) {
            return Err(error);
        }
        let set = assignments.iter().map(|assignment| {
            SQL::ident(assignment.column)
                .push_text(" = ")
                .push_param(assignment.value.clone())
        });
        let mut sql = SQL::text("UPDATE ")
            .push_ident(M::TABLE_NAME)
            .push_text(" SET ")
            .append(SQL::join(set, ", "));
        if let Some(condition) = &self.condition {
            sql = sql.push_text(" WHERE ").append(condition.to_sql());
        }
        Ok(sql)
    }

    /// `UPDATE ... SET ... WHERE <condition>`; returns affected rows.
    ///
    /// Requires a recorded condition; use [`update_all`](Relation::update_all)
    /// to touch every row.
    pub fn update<A>(&mut self, adaptor: &mut A, assignments: &[Assignment<M>]) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        self.finalize()?;
        if self.condition.is_none() {
            return Err(Error::Usage(
                "update without a condition; use update_all to update every row".to_string(),
            ));
        }
        let statement = self.update_sql(assignments)?.render(adaptor.dialect());
        adaptor.execute(&statement)
    }

    /// Like [`update`](Relation::update), without requiring a condition.
    pub fn update_all<A>(&mut self, adaptor: &mut A, assignments: &[Assignment<M>]) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        self.finalize()?;
        let statement = self.update_sql(assignments)?.render(adaptor.dialect());
        adaptor.execute(&statement)
    }
}

impl<S: Scope, Out> fmt::Debug for Relation<S, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("table", &<S::Root as Model>::TABLE_NAME)
            .field("projection", &self.projection)
            .field("joins", &self.joins)
            .field("condition", &self.condition)
            .field("group_by", &self.group_by)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("phase", &self.phase)
            .finish()
    }
}
