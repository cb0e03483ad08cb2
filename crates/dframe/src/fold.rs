//! Table construction: from columns, from rows, and by folding a flat sequence of values into
//! a fixed set of labeled columns.

use crate::accumulator::{Accumulator, ObjectAccumulator};
use crate::array::{ArrayColumn, ColumnElement, Primitive};
use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::index::Index;
use crate::table::Table;
use crate::value::Value;

/// Builds tables over a fixed column index.
#[derive(Clone, Debug)]
pub struct FrameBuilder {
    index: Index,
}

impl FrameBuilder {
    pub fn new(index: Index) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn empty(&self) -> Table {
        Table::empty(self.index.clone())
    }

    pub fn columns(&self, columns: Vec<Column>) -> FrameResult<Table> {
        Table::new(self.index.clone(), columns)
    }

    /// One table row per input row. Values past the index width are ignored.
    pub fn rows(&self, rows: &[Vec<Value>]) -> FrameResult<Table> {
        let mut appender = self.by_row_with_capacity(rows.len())?;
        for row in rows {
            appender.add_row(row.iter().cloned())?;
        }
        appender.finish()
    }

    /// Converts each input object into a row.
    pub fn objects_to_rows<T, I, F>(&self, objects: I, mut mapper: F) -> FrameResult<Table>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Vec<Value>,
    {
        let objects = objects.into_iter();
        let mut appender = self.by_row_with_capacity(objects.size_hint().0)?;
        for object in objects {
            appender.add_row(mapper(object))?;
        }
        appender.finish()
    }

    pub fn by_row(&self) -> FrameResult<RowAppender> {
        self.by_row_with_capacity(0)
    }

    fn by_row_with_capacity(&self, capacity: usize) -> FrameResult<RowAppender> {
        let width = self.width()?;
        Ok(RowAppender {
            index: self.index.clone(),
            columns: (0..width)
                .map(|_| ObjectAccumulator::with_capacity(capacity.max(10)))
                .collect(),
        })
    }

    /// Element `k` goes to row `k / width`, column `k % width`. A partial last row is padded
    /// with nulls.
    pub fn fold_by_row(&self, data: &[Value]) -> FrameResult<Table> {
        self.fold_iter_by_row(data.iter().cloned())
    }

    pub fn fold_iter_by_row<I, V>(&self, data: I) -> FrameResult<Table>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.fold_elements_by_row(Value::Null, data.into_iter().map(Into::into))
    }

    /// Fills columns top to bottom, left to right. A partial last column is padded with nulls.
    pub fn fold_by_column(&self, data: &[Value]) -> FrameResult<Table> {
        self.fold_elements_by_column(Value::Null, data)
    }

    pub fn fold_iter_by_column<I, V>(&self, data: I) -> FrameResult<Table>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let data: Vec<Value> = data.into_iter().map(Into::into).collect();
        self.fold_elements_by_column(Value::Null, &data)
    }

    /// Primitive folds without an explicit pad fill the short row or column with zero.
    pub fn fold_int_by_column(&self, data: &[i32]) -> FrameResult<Table> {
        self.fold_int_by_column_padded(0, data)
    }

    pub fn fold_int_iter_by_row(&self, data: impl IntoIterator<Item = i32>) -> FrameResult<Table> {
        self.fold_int_iter_by_row_padded(0, data)
    }

    pub fn fold_int_iter_by_column(
        &self,
        data: impl IntoIterator<Item = i32>,
    ) -> FrameResult<Table> {
        self.fold_int_iter_by_column_padded(0, data)
    }

    pub fn fold_long_by_column(&self, data: &[i64]) -> FrameResult<Table> {
        self.fold_long_by_column_padded(0, data)
    }

    pub fn fold_long_iter_by_row(&self, data: impl IntoIterator<Item = i64>) -> FrameResult<Table> {
        self.fold_long_iter_by_row_padded(0, data)
    }

    pub fn fold_long_iter_by_column(
        &self,
        data: impl IntoIterator<Item = i64>,
    ) -> FrameResult<Table> {
        self.fold_long_iter_by_column_padded(0, data)
    }

    pub fn fold_double_by_column(&self, data: &[f64]) -> FrameResult<Table> {
        self.fold_double_by_column_padded(0.0, data)
    }

    pub fn fold_double_iter_by_row(
        &self,
        data: impl IntoIterator<Item = f64>,
    ) -> FrameResult<Table> {
        self.fold_double_iter_by_row_padded(0.0, data)
    }

    pub fn fold_double_iter_by_column(
        &self,
        data: impl IntoIterator<Item = f64>,
    ) -> FrameResult<Table> {
        self.fold_double_iter_by_column_padded(0.0, data)
    }

    pub fn fold_int_by_column_padded(&self, pad: i32, data: &[i32]) -> FrameResult<Table> {
        self.fold_elements_by_column(pad, data)
    }

    pub fn fold_int_iter_by_row_padded(
        &self,
        pad: i32,
        data: impl IntoIterator<Item = i32>,
    ) -> FrameResult<Table> {
        self.fold_elements_by_row(pad, data)
    }

    pub fn fold_int_iter_by_column_padded(
        &self,
        pad: i32,
        data: impl IntoIterator<Item = i32>,
    ) -> FrameResult<Table> {
        self.fold_primitive_iter_by_column(pad, data)
    }

    pub fn fold_long_by_column_padded(&self, pad: i64, data: &[i64]) -> FrameResult<Table> {
        self.fold_elements_by_column(pad, data)
    }

    pub fn fold_long_iter_by_row_padded(
        &self,
        pad: i64,
        data: impl IntoIterator<Item = i64>,
    ) -> FrameResult<Table> {
        self.fold_elements_by_row(pad, data)
    }

    pub fn fold_long_iter_by_column_padded(
        &self,
        pad: i64,
        data: impl IntoIterator<Item = i64>,
    ) -> FrameResult<Table> {
        self.fold_primitive_iter_by_column(pad, data)
    }

    pub fn fold_double_by_column_padded(&self, pad: f64, data: &[f64]) -> FrameResult<Table> {
        self.fold_elements_by_column(pad, data)
    }

    pub fn fold_double_iter_by_row_padded(
        &self,
        pad: f64,
        data: impl IntoIterator<Item = f64>,
    ) -> FrameResult<Table> {
        self.fold_elements_by_row(pad, data)
    }

    pub fn fold_double_iter_by_column_padded(
        &self,
        pad: f64,
        data: impl IntoIterator<Item = f64>,
    ) -> FrameResult<Table> {
        self.fold_primitive_iter_by_column(pad, data)
    }

    fn width(&self) -> FrameResult<usize> {
        match self.index.size() {
            0 => Err(FrameError::EmptyColumns),
            width => Ok(width),
        }
    }

    fn fold_primitive_iter_by_column<T: Primitive>(
        &self,
        pad: T,
        data: impl IntoIterator<Item = T>,
    ) -> FrameResult<Table> {
        let data: Vec<T> = data.into_iter().collect();
        self.fold_elements_by_column(pad, &data)
    }

    fn fold_elements_by_row<T: ColumnElement>(
        &self,
        pad: T,
        data: impl IntoIterator<Item = T>,
    ) -> FrameResult<Table> {
        let width = self.width()?;
        let data = data.into_iter();
        let capacity = data.size_hint().0 / width + 1;

        let mut columns: Vec<Accumulator<T>> = (0..width)
            .map(|_| Accumulator::with_capacity(capacity))
            .collect();
        let mut count = 0usize;
        for value in data {
            columns[count % width].add(value);
            count += 1;
        }

        let partial = count % width;
        if partial != 0 {
            for column in &mut columns[partial..] {
                column.add(pad.clone());
            }
        }

        self.columns(columns.into_iter().map(Accumulator::finish).collect())
    }

    fn fold_elements_by_column<T: ColumnElement>(&self, pad: T, data: &[T]) -> FrameResult<Table> {
        let geometry = ColumnGeometry::new(data.len(), self.width()?);

        let columns = (0..geometry.width)
            .map(|i| {
                let (from, to) = geometry.column_bounds(i);
                let mut values = Vec::with_capacity(geometry.height);
                values.extend_from_slice(&data[from..to]);
                values.resize(geometry.height, pad.clone());
                T::wrap(ArrayColumn::from_vec(values))
            })
            .collect();
        self.columns(columns)
    }
}

/// Column-major layout of `len` elements over `width` columns. Every column is `height` tall;
/// column `i` holds elements `i * height ..` until the input runs out, the rest is padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ColumnGeometry {
    width: usize,
    height: usize,
    len: usize,
}

impl ColumnGeometry {
    fn new(len: usize, width: usize) -> Self {
        let height = len / width + usize::from(len % width != 0);
        Self { width, height, len }
    }

    fn column_bounds(&self, column: usize) -> (usize, usize) {
        let from = (column * self.height).min(self.len);
        let to = (from + self.height).min(self.len);
        (from, to)
    }
}

/// Incremental row-by-row table construction into object columns.
#[derive(Debug)]
pub struct RowAppender {
    index: Index,
    columns: Vec<ObjectAccumulator>,
}

impl RowAppender {
    /// Appends one row. Values past the width are ignored; a short row is rejected and leaves
    /// the appender unchanged.
    pub fn add_row<I, V>(&mut self, row: I) -> FrameResult<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let width = self.columns.len();
        let values: Vec<Value> = row.into_iter().take(width).map(Into::into).collect();
        if values.len() < width {
            return Err(FrameError::RowTooShort {
                expected: width,
                actual: values.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.add(value);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(Accumulator::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(self) -> FrameResult<Table> {
        let columns = self.columns.into_iter().map(Accumulator::finish).collect();
        Table::new(self.index, columns)
    }
}
