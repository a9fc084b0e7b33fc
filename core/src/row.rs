//! Result sets and typed row decoding.

use crate::error::{Error, Result};
use crate::value::SQLValue;

/// A fully materialized result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Vec<SQLValue>>,
}

impl Rows {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<SQLValue>) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[SQLValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// First cell of the first row, or NULL for an empty result.
    pub fn into_scalar(self) -> SQLValue {
        self.rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or(SQLValue::Null)
    }

    /// Decodes every row as `T`.
    pub fn decode<T: FromRow>(self) -> Result<Vec<T>> {
        self.rows
            .into_iter()
            .map(|row| {
                let mut reader = RowReader::new(row);
                let value = T::from_row(&mut reader)?;
                reader.finish()?;
                Ok(value)
            })
            .collect()
    }
}

impl IntoIterator for Rows {
    type Item = Vec<SQLValue>;
    type IntoIter = std::vec::IntoIter<Vec<SQLValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Cursor over the cells of one row, consumed left to right.
#[derive(Debug)]
pub struct RowReader {
    cells: std::vec::IntoIter<SQLValue>,
    position: usize,
}

impl RowReader {
    pub fn new(cells: Vec<SQLValue>) -> Self {
        Self {
            cells: cells.into_iter(),
            position: 0,
        }
    }

    /// Takes the next cell.
    pub fn next_value(&mut self) -> Result<SQLValue> {
        let cell = self.cells.next().ok_or_else(|| {
            Error::Query(format!(
                "row has {} columns, more were expected",
                self.position
            ))
        })?;
        self.position += 1;
        Ok(cell)
    }

    /// Index of the next cell.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Fails if cells are left over.
    pub fn finish(self) -> Result<()> {
        let left = self.cells.len();
        if left == 0 {
            Ok(())
        } else {
            Err(Error::Query(format!(
                "row has {} unread columns after column {}",
                left, self.position
            )))
        }
    }
}

/// Types decodable from consecutive cells of a row.
pub trait FromRow: Sized {
    fn from_row(row: &mut RowReader) -> Result<Self>;
}

macro_rules! impl_from_row_tuple {
    ($($name:ident),+) => {
        impl<$($name: FromRow),+> FromRow for ($($name,)+) {
            fn from_row(row: &mut RowReader) -> Result<Self> {
                Ok(($($name::from_row(row)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(A);
impl_from_row_tuple!(A, B);
impl_from_row_tuple!(A, B, C);
impl_from_row_tuple!(A, B, C, D);
impl_from_row_tuple!(A, B, C, D, E);
impl_from_row_tuple!(A, B, C, D, E, F);
impl_from_row_tuple!(A, B, C, D, E, F, G);
impl_from_row_tuple!(A, B, C, D, E, F, G, H);
