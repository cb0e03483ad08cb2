#![forbid(unsafe_code)]

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::fold::FrameBuilder;
use crate::index::Index;
use crate::value::Value;
use std::sync::Arc;

/// Reference to a table column by label or by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnRef {
    Label(Arc<str>),
    Position(usize),
}

impl ColumnRef {
    pub(crate) fn resolve(&self, index: &Index) -> FrameResult<usize> {
        match self {
            ColumnRef::Label(label) => index.position(label),
            ColumnRef::Position(p) => index.check_position(*p),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(label: &str) -> Self {
        ColumnRef::Label(Arc::from(label))
    }
}

impl From<String> for ColumnRef {
    fn from(label: String) -> Self {
        ColumnRef::Label(Arc::from(label))
    }
}

impl From<usize> for ColumnRef {
    fn from(position: usize) -> Self {
        ColumnRef::Position(position)
    }
}

/// Immutable table of equal-length, labeled columns.
///
/// Every transformation returns a new table. Columns that a transformation does not touch are
/// shared with the source table rather than copied.
#[derive(Clone, Debug)]
pub struct Table {
    index: Index,
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Fails if the number of columns differs from the index size or if the columns differ in
    /// length.
    pub fn new(index: Index, columns: Vec<Column>) -> FrameResult<Self> {
        if columns.len() != index.size() {
            return Err(FrameError::WidthMismatch {
                expected: index.size(),
                actual: columns.len(),
            });
        }

        let height = columns.first().map(Column::size).unwrap_or(0);
        for (label, column) in index.labels().iter().zip(&columns) {
            if column.size() != height {
                return Err(FrameError::HeightMismatch {
                    label: label.to_string(),
                    expected: height,
                    actual: column.size(),
                });
            }
        }

        Ok(Self {
            index,
            columns,
            height,
        })
    }

    /// Zero-height table with an empty object column per label.
    pub fn empty(index: Index) -> Self {
        let columns = (0..index.size())
            .map(|_| Column::for_values(Vec::new()))
            .collect();
        Self {
            index,
            columns,
            height: 0,
        }
    }

    pub fn builder<I, S>(labels: I) -> FrameResult<FrameBuilder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(FrameBuilder::new(Index::for_labels(labels)?))
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column: impl Into<ColumnRef>) -> FrameResult<&Column> {
        let pos = column.into().resolve(&self.index)?;
        Ok(&self.columns[pos])
    }

    /// Labeled columns in index order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.index
            .labels()
            .iter()
            .map(|l| l.as_ref())
            .zip(self.columns.iter())
    }

    pub fn get(&self, row: usize, column: impl Into<ColumnRef>) -> FrameResult<Value> {
        self.column(column)?.get(row)
    }

    pub fn row(&self, row: usize) -> FrameResult<RowProxy<'_>> {
        FrameError::check_index(row, self.height)?;
        Ok(RowProxy { table: self, row })
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = RowProxy<'_>> + '_ {
        (0..self.height).map(move |row| RowProxy { table: self, row })
    }

    /// New table with the named columns, sharing their storage.
    pub fn select_columns<C: Into<ColumnRef>>(
        &self,
        columns: impl IntoIterator<Item = C>,
    ) -> FrameResult<Table> {
        let positions = columns
            .into_iter()
            .map(|c| c.into().resolve(&self.index))
            .collect::<FrameResult<Vec<_>>>()?;
        let index = self.index.select_positions(&positions)?;
        let columns = positions.iter().map(|&p| self.columns[p].clone()).collect();
        Table::new(index, columns)
    }

    /// New table with `column` appended after the existing columns.
    pub fn add_column(&self, label: &str, column: Column) -> FrameResult<Table> {
        if self.index.contains(label) {
            return Err(FrameError::DuplicateLabel(label.to_string()));
        }
        let index = self.index.add_labels(&Index::for_labels([label])?);
        let mut columns = self.columns.clone();
        columns.push(column);
        Table::new(index, columns)
    }

    pub fn head(&self, len: usize) -> Table {
        self.map_columns(|c| c.head(len))
    }

    pub fn tail(&self, len: usize) -> Table {
        self.map_columns(|c| c.tail(len))
    }

    pub fn range(&self, from_inclusive: usize, to_exclusive: usize) -> FrameResult<Table> {
        FrameError::check_range(from_inclusive, to_exclusive, self.height)?;
        let columns = self
            .columns
            .iter()
            .map(|c| c.range(from_inclusive, to_exclusive))
            .collect::<FrameResult<Vec<_>>>()?;
        Table::new(self.index.clone(), columns)
    }

    /// Forces every virtual column into array storage.
    pub fn materialize(&self) -> Table {
        self.map_columns(Column::materialize)
    }

    /// Reindexes every column by the same (sentinel-capable) position list.
    pub fn select_rows(&self, positions: &[Option<usize>]) -> FrameResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.select(positions))
            .collect::<FrameResult<Vec<_>>>()?;
        Table::new(self.index.clone(), columns)
    }

    pub(crate) fn take_rows(&self, positions: &[usize]) -> FrameResult<Table> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.take(positions))
            .collect::<FrameResult<Vec<_>>>()?;
        Ok(Table {
            index: self.index.clone(),
            columns,
            height: positions.len(),
        })
    }

    fn map_columns(&self, f: impl Fn(&Column) -> Column) -> Table {
        let columns: Vec<Column> = self.columns.iter().map(f).collect();
        let height = columns.first().map(Column::size).unwrap_or(0);
        Table {
            index: self.index.clone(),
            columns,
            height,
        }
    }
}

impl PartialEq for Table {
    /// Same labels and same values; column representations may differ.
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.columns == other.columns
    }
}

/// Borrowed view of one table row.
#[derive(Clone, Copy, Debug)]
pub struct RowProxy<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> RowProxy<'a> {
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn get(&self, column: impl Into<ColumnRef>) -> FrameResult<Value> {
        self.table.get(self.row, column)
    }

    pub fn len(&self) -> usize {
        self.table.width()
    }

    pub fn is_empty(&self) -> bool {
        self.table.width() == 0
    }

    pub fn values(&self) -> Vec<Value> {
        self.table
            .columns
            .iter()
            .map(|c| c.value_at(self.row))
            .collect()
    }
}
