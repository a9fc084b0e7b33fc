//! Schema-bound entry points, one model per mapped table.

use crate::adaptor::Adaptor;
use crate::column::Columns;
use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::row::FromRow;
use crate::schema::Schema;
use crate::scope::Scope;
use crate::sql::SQL;
use crate::value::SQLValue;

/// A mapped table.
///
/// Implemented by [`model!`](crate::model!), which also generates the
/// column markers, the [`Schema`] and the row decoding.
pub trait Model: Scope<Root = Self> + FromRow + Sized + 'static {
    const TABLE_NAME: &'static str;
    const SCHEMA: &'static Schema;

    fn schema() -> &'static Schema {
        Self::SCHEMA
    }

    /// Bound values of every column, in schema order. Absent is NULL.
    fn to_values(&self) -> Vec<SQLValue>;

    /// Text form of column `column`, `"NULL"` when absent. `None` if the
    /// model has no such column.
    fn get(&self, column: &str) -> Option<String>;

    /// Parses `text` into column `column` with the column kind's text codec.
    ///
    /// Fails with [`Error::Usage`] for an unknown column, otherwise as
    /// [`Attribute::from_str`](crate::Attribute) does. The record is left
    /// unchanged on failure.
    fn set_str(&mut self, column: &str, text: &str) -> Result<()>;

    /// Every column name with its text form, in schema order.
    fn attribute_strings(&self) -> Vec<(&'static str, String)> {
        Self::SCHEMA
            .columns
            .iter()
            .filter_map(|column| Some((column.name, self.get(column.name)?)))
            .collect()
    }

    /// Checks the record against the schema's constraints.
    fn validate(&self) -> Result<()> {
        Self::SCHEMA.validate(&self.to_values())
    }

    /// Every record.
    fn all() -> Relation<Self, Self> {
        Relation::new(Self::SCHEMA.column_refs())
    }

    fn r#where(condition: Condition<Self>) -> Relation<Self, Self> {
        Self::all().r#where(condition)
    }

    fn select<K, I>(columns: K) -> Relation<Self, K::Attributes>
    where
        K: Columns<Self, I>,
    {
        Self::all().select(columns)
    }

    /// The first record in storage order, if any.
    fn first<A>(adaptor: &mut A) -> Result<Option<Self>>
    where
        A: Adaptor + ?Sized,
    {
        Ok(Self::all().limit(1).exec(adaptor)?.into_iter().next())
    }

    /// Validates `record`, then inserts its present attributes.
    ///
    /// Returns the number of inserted rows.
    fn insert<A>(adaptor: &mut A, record: &Self) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        Self::insert_all(adaptor, std::slice::from_ref(record))
    }

    /// Validates every record, then inserts them with one multi-row
    /// `INSERT`. Nothing is sent if any record fails validation.
    ///
    /// The column list holds every column present in at least one record;
    /// records lacking one of them bind NULL there. Records with no present
    /// attribute at all are inserted one `DEFAULT VALUES` statement each.
    fn insert_all<A>(adaptor: &mut A, records: &[Self]) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        let rows = records
            .iter()
            .map(|record| {
                let values = record.to_values();
                Self::SCHEMA.validate(&values)?;
                Ok(values)
            })
            .collect::<Result<Vec<_>>>()?;

        let columns = Self::SCHEMA.columns;
        let present: Vec<usize> = (0..columns.len())
            .filter(|&index| rows.iter().any(|row| !row[index].is_null()))
            .collect();

        let table = SQL::text("INSERT INTO ").push_ident(Self::TABLE_NAME);
        if present.is_empty() {
            let statement = table.push_text(" DEFAULT VALUES").render(adaptor.dialect());
            let mut inserted = 0;
            for _ in &rows {
                inserted += adaptor.execute(&statement)?;
            }
            return Ok(inserted);
        }

        let names = present.iter().map(|&index| SQL::ident(columns[index].name));
        let tuples = rows.into_iter().map(|mut row| {
            SQL::join(
                present
                    .iter()
                    .map(|&index| SQL::param(std::mem::take(&mut row[index]))),
                ", ",
            )
            .parens()
        });
        let sql = table
            .push_text(" ")
            .append(SQL::join(names, ", ").parens())
            .push_text(" VALUES ")
            .append(SQL::join(tuples, ", "));
        adaptor.execute(&sql.render(adaptor.dialect()))
    }

    /// Deletes the records matching `condition`. Zero matches is `Ok(0)`.
    fn destroy<A>(adaptor: &mut A, condition: Condition<Self>) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        if let Some(error) = condition.error() {
            return Err(error.clone());
        }
        let sql = SQL::text("DELETE FROM ")
            .push_ident(Self::TABLE_NAME)
            .push_text(" WHERE ")
            .append(condition.to_sql());
        adaptor.execute(&sql.render(adaptor.dialect()))
    }

    /// Deletes every record.
    fn destroy_all<A>(adaptor: &mut A) -> Result<u64>
    where
        A: Adaptor + ?Sized,
    {
        let sql = SQL::text("DELETE FROM ").push_ident(Self::TABLE_NAME);
        adaptor.execute(&sql.render(adaptor.dialect()))
    }

    /// Looks a record up by primary key value.
    fn find<A>(adaptor: &mut A, key: impl Into<SQLValue>) -> Result<Option<Self>>
    where
        A: Adaptor + ?Sized,
    {
        let key_column = Self::SCHEMA.primary_key().ok_or_else(|| {
            Error::Usage(format!("`{}` has no primary key", Self::TABLE_NAME))
        })?;
        let mut relation = Self::all().limit(1);
        relation.filter_raw(key_column.name, key.into());
        Ok(relation.exec(adaptor)?.into_iter().next())
    }
}
