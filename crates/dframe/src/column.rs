#![forbid(unsafe_code)]

use crate::array::{ArrayColumn, DoubleColumn, IntColumn, LongColumn, ObjectColumn};
use crate::error::{FrameError, FrameResult};
use crate::sequence::IntSequence;
use crate::value::{ColumnType, Value};
use std::cmp::Ordering;
use std::sync::Arc;

/// An immutable, fixed-type sequence of values.
///
/// Cloning a column clones a reference to its storage, so the same column can back any number
/// of tables.
#[derive(Clone, Debug)]
pub enum Column {
    Int(IntColumn),
    Long(LongColumn),
    Double(DoubleColumn),
    Object(ObjectColumn),
    IntSequence(IntSequence),
}

impl Column {
    pub fn for_ints(values: Vec<i32>) -> Self {
        Column::Int(ArrayColumn::from_vec(values))
    }

    pub fn for_longs(values: Vec<i64>) -> Self {
        Column::Long(ArrayColumn::from_vec(values))
    }

    pub fn for_doubles(values: Vec<f64>) -> Self {
        Column::Double(ArrayColumn::from_vec(values))
    }

    pub fn for_values(values: Vec<Value>) -> Self {
        Column::Object(ArrayColumn::from_vec(values))
    }

    /// Object column from anything convertible into [`Value`]s.
    pub fn for_data<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::for_values(values.into_iter().map(Into::into).collect())
    }

    pub fn for_sequence(first: i32, last_exclusive: i32) -> Self {
        Column::IntSequence(IntSequence::new(first, last_exclusive))
    }

    pub fn size(&self) -> usize {
        match self {
            Column::Int(c) => c.len(),
            Column::Long(c) => c.len(),
            Column::Double(c) => c.len(),
            Column::Object(c) => c.len(),
            Column::IntSequence(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int(_) | Column::IntSequence(_) => ColumnType::Int,
            Column::Long(_) => ColumnType::Long,
            Column::Double(_) => ColumnType::Double,
            Column::Object(_) => ColumnType::Object,
        }
    }

    pub fn get(&self, index: usize) -> FrameResult<Value> {
        Ok(match self {
            Column::Int(c) => Value::Int(*c.get(index)?),
            Column::Long(c) => Value::Long(*c.get(index)?),
            Column::Double(c) => Value::Double(*c.get(index)?),
            Column::Object(c) => c.get(index)?.clone(),
            Column::IntSequence(s) => Value::Int(s.get(index)?),
        })
    }

    /// Value at a position already known to be in bounds.
    pub(crate) fn value_at(&self, index: usize) -> Value {
        self.get(index).unwrap_or(Value::Null)
    }

    pub fn iter(&self) -> ColumnIter<'_> {
        ColumnIter {
            column: self,
            next: 0,
            end: self.size(),
        }
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    pub fn copy_to_int(
        &self,
        dest: &mut [i32],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        match self {
            Column::Int(c) => c.copy_to(dest, from_offset, to_offset, len),
            Column::IntSequence(s) => s.copy_to(dest, from_offset, to_offset, len),
            other => Err(other.mismatch(ColumnType::Int)),
        }
    }

    pub fn copy_to_long(
        &self,
        dest: &mut [i64],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        match self {
            Column::Long(c) => c.copy_to(dest, from_offset, to_offset, len),
            other => Err(other.mismatch(ColumnType::Long)),
        }
    }

    pub fn copy_to_double(
        &self,
        dest: &mut [f64],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        match self {
            Column::Double(c) => c.copy_to(dest, from_offset, to_offset, len),
            other => Err(other.mismatch(ColumnType::Double)),
        }
    }

    /// Boxed bulk copy; works for every variant.
    pub fn copy_to_values(
        &self,
        dest: &mut [Value],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        if let Column::Object(c) = self {
            return c.copy_to(dest, from_offset, to_offset, len);
        }
        FrameError::check_range(from_offset, from_offset.saturating_add(len), self.size())?;
        FrameError::check_range(to_offset, to_offset.saturating_add(len), dest.len())?;
        for k in 0..len {
            dest[to_offset + k] = self.value_at(from_offset + k);
        }
        Ok(())
    }

    pub fn range(&self, from_inclusive: usize, to_exclusive: usize) -> FrameResult<Column> {
        Ok(match self {
            Column::Int(c) => Column::Int(c.range(from_inclusive, to_exclusive)?),
            Column::Long(c) => Column::Long(c.range(from_inclusive, to_exclusive)?),
            Column::Double(c) => Column::Double(c.range(from_inclusive, to_exclusive)?),
            Column::Object(c) => Column::Object(c.range(from_inclusive, to_exclusive)?),
            Column::IntSequence(s) => Column::IntSequence(s.range(from_inclusive, to_exclusive)?),
        })
    }

    pub fn head(&self, len: usize) -> Column {
        match self {
            Column::Int(c) => Column::Int(c.head(len)),
            Column::Long(c) => Column::Long(c.head(len)),
            Column::Double(c) => Column::Double(c.head(len)),
            Column::Object(c) => Column::Object(c.head(len)),
            Column::IntSequence(s) => Column::IntSequence(s.head(len)),
        }
    }

    pub fn tail(&self, len: usize) -> Column {
        match self {
            Column::Int(c) => Column::Int(c.tail(len)),
            Column::Long(c) => Column::Long(c.tail(len)),
            Column::Double(c) => Column::Double(c.tail(len)),
            Column::Object(c) => Column::Object(c.tail(len)),
            Column::IntSequence(s) => Column::IntSequence(s.tail(len)),
        }
    }

    /// Forces a virtual column into array storage; array columns are returned as is.
    pub fn materialize(&self) -> Column {
        match self {
            Column::IntSequence(s) => Column::Int(s.materialize()),
            other => other.clone(),
        }
    }

    /// Re-projects the column by position. `None` entries produce nulls; when any is present
    /// the result is an object column because primitive storage cannot hold a null.
    pub fn select(&self, positions: &[Option<usize>]) -> FrameResult<Column> {
        match self {
            Column::Int(c) => c.select(positions),
            Column::Long(c) => c.select(positions),
            Column::Double(c) => c.select(positions),
            Column::Object(c) => c.select(positions),
            Column::IntSequence(s) => s.select(positions),
        }
    }

    /// Re-projects the column by position, preserving the element type.
    pub fn take(&self, positions: &[usize]) -> FrameResult<Column> {
        Ok(match self {
            Column::Int(c) => Column::Int(c.take(positions)?),
            Column::Long(c) => Column::Long(c.take(positions)?),
            Column::Double(c) => Column::Double(c.take(positions)?),
            Column::Object(c) => Column::Object(c.take(positions)?),
            Column::IntSequence(s) => Column::Int(s.take(positions)?),
        })
    }

    /// Compares two in-bounds rows of this column without boxing primitive values.
    pub(crate) fn compare_rows(&self, a: usize, b: usize) -> Ordering {
        match self {
            Column::Int(c) => {
                let v = c.as_slice();
                v[a].cmp(&v[b])
            }
            Column::Long(c) => {
                let v = c.as_slice();
                v[a].cmp(&v[b])
            }
            Column::Double(c) => {
                let v = c.as_slice();
                v[a].total_cmp(&v[b])
            }
            Column::Object(c) => {
                let v = c.as_slice();
                v[a].total_cmp(&v[b])
            }
            Column::IntSequence(_) => a.cmp(&b),
        }
    }

    /// Whether both columns are views over the same storage.
    pub fn shares_storage_with(&self, other: &Column) -> bool {
        match (self, other) {
            (Column::Int(a), Column::Int(b)) => a.shares_storage_with(b),
            (Column::Long(a), Column::Long(b)) => a.shares_storage_with(b),
            (Column::Double(a), Column::Double(b)) => a.shares_storage_with(b),
            (Column::Object(a), Column::Object(b)) => a.shares_storage_with(b),
            (Column::IntSequence(a), Column::IntSequence(b)) => a == b,
            _ => false,
        }
    }

    pub(crate) fn mismatch(&self, expected: ColumnType) -> FrameError {
        FrameError::TypeMismatch {
            expected,
            actual: self.column_type(),
        }
    }
}

impl PartialEq for Column {
    /// Columns are equal when they hold the same values, regardless of representation.
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl From<Vec<i32>> for Column {
    fn from(values: Vec<i32>) -> Self {
        Column::for_ints(values)
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::for_longs(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::for_doubles(values)
    }
}

impl From<Vec<Value>> for Column {
    fn from(values: Vec<Value>) -> Self {
        Column::for_values(values)
    }
}

impl From<Vec<Arc<str>>> for Column {
    fn from(values: Vec<Arc<str>>) -> Self {
        Column::for_data(values)
    }
}

pub struct ColumnIter<'a> {
    column: &'a Column,
    next: usize,
    end: usize,
}

impl Iterator for ColumnIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.next >= self.end {
            return None;
        }
        let value = self.column.value_at(self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn select_without_sentinels_keeps_primitive_type() {
        let column = Column::for_longs(vec![3, 4, 2]);
        let selected = column.select(&[Some(2), Some(1)]).unwrap();
        assert_eq!(selected.column_type(), ColumnType::Long);
        assert_eq!(selected.to_values(), vec![Value::Long(2), Value::Long(4)]);
    }

    #[test]
    fn select_with_sentinel_degrades_to_object() {
        let column = Column::for_longs(vec![3, 4, 2]);
        let selected = column.select(&[Some(2), Some(1), None]).unwrap();
        assert_eq!(selected.column_type(), ColumnType::Object);
        assert_eq!(
            selected.to_values(),
            vec![Value::Long(2), Value::Long(4), Value::Null]
        );
    }

    #[test]
    fn select_empty_keeps_type() {
        let selected = Column::for_longs(vec![3, 4, 2]).select(&[]).unwrap();
        assert_eq!(selected.size(), 0);
        assert_eq!(selected.column_type(), ColumnType::Long);
    }

    #[test]
    fn select_out_of_bounds_fails() {
        let err = Column::for_longs(vec![3, 4, 2])
            .select(&[Some(0), Some(3)])
            .unwrap_err();
        assert_eq!(err, FrameError::IndexOutOfBounds { index: 3, len: 3 });
    }

    #[test]
    fn sequence_select_and_materialize() {
        let seq = Column::for_sequence(10, 14);
        assert_eq!(seq.materialize(), Column::for_ints(vec![10, 11, 12, 13]));
        assert!(matches!(seq.materialize(), Column::Int(_)));

        let selected = seq.select(&[Some(3), None]).unwrap();
        assert_eq!(selected.to_values(), vec![Value::Int(13), Value::Null]);
        assert_eq!(selected.column_type(), ColumnType::Object);
    }

    #[test]
    fn primitive_copy_rejects_other_types() {
        let mut dest = [0i64; 2];
        let err = Column::for_ints(vec![1, 2])
            .copy_to_long(&mut dest, 0, 0, 2)
            .unwrap_err();
        assert_eq!(
            err,
            FrameError::TypeMismatch {
                expected: ColumnType::Long,
                actual: ColumnType::Int,
            }
        );
    }

    #[test]
    fn boxed_copy_works_for_virtual_columns() {
        let mut dest = vec![Value::Null; 3];
        Column::for_sequence(0, 5)
            .copy_to_values(&mut dest, 2, 0, 3)
            .unwrap();
        assert_eq!(dest, vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
    }
}
