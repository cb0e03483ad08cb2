#![forbid(unsafe_code)]

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::value::{ColumnType, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Element types that can back an [`ArrayColumn`].
pub trait ColumnElement: Clone + fmt::Debug + Send + Sync + 'static {
    const COLUMN_TYPE: ColumnType;

    fn to_value(&self) -> Value;

    fn compare(a: &Self, b: &Self) -> Ordering;

    fn wrap(column: ArrayColumn<Self>) -> Column;
}

/// Unboxed numeric element types.
pub trait Primitive: ColumnElement + Copy + Default + PartialEq {
    fn to_f64(self) -> f64;
}

impl ColumnElement for i32 {
    const COLUMN_TYPE: ColumnType = ColumnType::Int;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.cmp(b)
    }

    fn wrap(column: ArrayColumn<Self>) -> Column {
        Column::Int(column)
    }
}

impl Primitive for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ColumnElement for i64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Long;

    fn to_value(&self) -> Value {
        Value::Long(*self)
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.cmp(b)
    }

    fn wrap(column: ArrayColumn<Self>) -> Column {
        Column::Long(column)
    }
}

impl Primitive for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl ColumnElement for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Double;

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.total_cmp(b)
    }

    fn wrap(column: ArrayColumn<Self>) -> Column {
        Column::Double(column)
    }
}

impl Primitive for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl ColumnElement for Value {
    const COLUMN_TYPE: ColumnType = ColumnType::Object;

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.total_cmp(b)
    }

    fn wrap(column: ArrayColumn<Self>) -> Column {
        Column::Object(column)
    }
}

/// Window over a shared contiguous buffer.
///
/// Sub-ranges share the buffer and only move the window, so `range`/`head`/`tail` never copy.
#[derive(Clone)]
pub struct ArrayColumn<T> {
    data: Arc<[T]>,
    offset: usize,
    len: usize,
}

pub type IntColumn = ArrayColumn<i32>;
pub type LongColumn = ArrayColumn<i64>;
pub type DoubleColumn = ArrayColumn<f64>;
pub type ObjectColumn = ArrayColumn<Value>;

impl<T: ColumnElement> ArrayColumn<T> {
    pub fn from_vec(values: Vec<T>) -> Self {
        let len = values.len();
        Self {
            data: Arc::from(values),
            offset: 0,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data[self.offset..self.offset + self.len]
    }

    pub fn get(&self, index: usize) -> FrameResult<&T> {
        self.as_slice()
            .get(index)
            .ok_or(FrameError::IndexOutOfBounds {
                index,
                len: self.len,
            })
    }

    /// Copies `len` elements starting at `from_offset` into `dest[to_offset..]`.
    pub fn copy_to(
        &self,
        dest: &mut [T],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        let from_end = from_offset.saturating_add(len);
        FrameError::check_range(from_offset, from_end, self.len)?;
        let to_end = to_offset.saturating_add(len);
        FrameError::check_range(to_offset, to_end, dest.len())?;

        dest[to_offset..to_end].clone_from_slice(&self.as_slice()[from_offset..from_end]);
        Ok(())
    }

    pub fn range(&self, from_inclusive: usize, to_exclusive: usize) -> FrameResult<Self> {
        FrameError::check_range(from_inclusive, to_exclusive, self.len)?;
        Ok(Self {
            data: self.data.clone(),
            offset: self.offset + from_inclusive,
            len: to_exclusive - from_inclusive,
        })
    }

    pub fn head(&self, len: usize) -> Self {
        let len = len.min(self.len);
        Self {
            data: self.data.clone(),
            offset: self.offset,
            len,
        }
    }

    pub fn tail(&self, len: usize) -> Self {
        let len = len.min(self.len);
        Self {
            data: self.data.clone(),
            offset: self.offset + self.len - len,
            len,
        }
    }

    /// Re-projects the column. `None` positions produce nulls, which forces the result into an
    /// object column.
    pub fn select(&self, positions: &[Option<usize>]) -> FrameResult<Column> {
        let values = self.as_slice();
        for p in positions.iter().flatten() {
            FrameError::check_index(*p, self.len)?;
        }

        if positions.iter().all(Option::is_some) {
            let selected: Vec<T> = positions
                .iter()
                .flatten()
                .map(|&p| values[p].clone())
                .collect();
            return Ok(T::wrap(ArrayColumn::from_vec(selected)));
        }

        let selected: Vec<Value> = positions
            .iter()
            .map(|p| match p {
                Some(p) => values[*p].to_value(),
                None => Value::Null,
            })
            .collect();
        Ok(Column::Object(ArrayColumn::from_vec(selected)))
    }

    /// Re-projects the column without nulls; the element type is always preserved.
    pub fn take(&self, positions: &[usize]) -> FrameResult<Self> {
        let values = self.as_slice();
        let mut selected = Vec::with_capacity(positions.len());
        for &p in positions {
            FrameError::check_index(p, self.len)?;
            selected.push(values[p].clone());
        }
        Ok(Self::from_vec(selected))
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.as_slice().iter().map(ColumnElement::to_value).collect()
    }

    pub(crate) fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<T: ColumnElement> fmt::Debug for ArrayColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayColumn")
            .field("type", &T::COLUMN_TYPE)
            .field("values", &self.as_slice())
            .finish()
    }
}

impl<T: ColumnElement + PartialEq> PartialEq for ArrayColumn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_views_share_storage() {
        let column = LongColumn::from_vec(vec![1, 2, 3, 4, 5]);
        let middle = column.range(1, 4).unwrap();
        assert_eq!(middle.as_slice(), &[2, 3, 4]);
        assert!(middle.shares_storage_with(&column));

        let tail = middle.tail(2);
        assert_eq!(tail.as_slice(), &[3, 4]);
        assert_eq!(column.head(10).as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn range_out_of_bounds_fails() {
        let column = IntColumn::from_vec(vec![1, 2, 3]);
        assert_eq!(
            column.range(2, 4).unwrap_err(),
            FrameError::RangeOutOfBounds {
                from: 2,
                to: 4,
                len: 3
            }
        );
        assert!(column.range(2, 1).is_err());
    }

    #[test]
    fn copy_to_checks_both_buffers() {
        let column = DoubleColumn::from_vec(vec![1.0, 2.0, 3.0]).range(1, 3).unwrap();
        let mut dest = [0.0; 4];
        column.copy_to(&mut dest, 0, 1, 2).unwrap();
        assert_eq!(dest, [0.0, 2.0, 3.0, 0.0]);

        assert!(column.copy_to(&mut dest, 1, 0, 2).is_err());
        assert!(column.copy_to(&mut dest, 0, 3, 2).is_err());
    }
}
