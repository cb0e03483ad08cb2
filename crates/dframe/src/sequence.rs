#![forbid(unsafe_code)]

use crate::array::IntColumn;
use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::value::Value;

/// A virtual int column holding the consecutive integers `[first, last_exclusive)`.
///
/// Nothing is materialized: positional access, sub-ranges and aggregates are computed from the
/// two bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntSequence {
    first: i32,
    last_exclusive: i32,
}

impl IntSequence {
    /// An inverted range (`last_exclusive < first`) is treated as empty.
    pub fn new(first: i32, last_exclusive: i32) -> Self {
        Self {
            first,
            last_exclusive: last_exclusive.max(first),
        }
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last_exclusive(&self) -> i32 {
        self.last_exclusive
    }

    pub fn len(&self) -> usize {
        (self.last_exclusive as i64 - self.first as i64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last_exclusive
    }

    pub fn get(&self, index: usize) -> FrameResult<i32> {
        FrameError::check_index(index, self.len())?;
        Ok(self.at(index))
    }

    fn at(&self, index: usize) -> i32 {
        (self.first as i64 + index as i64) as i32
    }

    pub fn copy_to(
        &self,
        dest: &mut [i32],
        from_offset: usize,
        to_offset: usize,
        len: usize,
    ) -> FrameResult<()> {
        FrameError::check_range(from_offset, from_offset.saturating_add(len), self.len())?;
        FrameError::check_range(to_offset, to_offset.saturating_add(len), dest.len())?;

        for (k, slot) in dest[to_offset..to_offset + len].iter_mut().enumerate() {
            *slot = self.at(from_offset + k);
        }
        Ok(())
    }

    pub fn range(&self, from_inclusive: usize, to_exclusive: usize) -> FrameResult<Self> {
        let len = self.len();
        FrameError::check_range(from_inclusive, to_exclusive, len)?;
        if from_inclusive == 0 && to_exclusive == len {
            return Ok(*self);
        }
        Ok(Self::new(self.at(from_inclusive), self.at(to_exclusive)))
    }

    pub fn head(&self, len: usize) -> Self {
        if len >= self.len() {
            return *self;
        }
        Self::new(self.first, self.at(len))
    }

    pub fn tail(&self, len: usize) -> Self {
        let size = self.len();
        if len >= size {
            return *self;
        }
        Self::new(self.at(size - len), self.last_exclusive)
    }

    pub fn materialize(&self) -> IntColumn {
        IntColumn::from_vec((self.first..self.last_exclusive).collect())
    }

    pub fn select(&self, positions: &[Option<usize>]) -> FrameResult<Column> {
        // Selection generally breaks contiguity, so materialize the selected values.
        let len = self.len();
        for p in positions.iter().flatten() {
            FrameError::check_index(*p, len)?;
        }

        if positions.iter().all(Option::is_some) {
            let values = positions.iter().flatten().map(|&p| self.at(p)).collect();
            return Ok(Column::Int(IntColumn::from_vec(values)));
        }

        let values = positions
            .iter()
            .map(|p| p.map(|p| Value::Int(self.at(p))).unwrap_or(Value::Null))
            .collect();
        Ok(Column::Object(crate::array::ObjectColumn::from_vec(values)))
    }

    pub fn take(&self, positions: &[usize]) -> FrameResult<IntColumn> {
        let len = self.len();
        let mut values = Vec::with_capacity(positions.len());
        for &p in positions {
            FrameError::check_index(p, len)?;
            values.push(self.at(p));
        }
        Ok(IntColumn::from_vec(values))
    }

    /// Arithmetic-series sum: `n * (first + last) / 2` with `last = last_exclusive - 1`.
    pub fn sum(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        let n = self.len() as i128;
        let first = self.first as i128;
        let last = self.last_exclusive as i128 - 1;
        (n * (first + last) / 2) as i64
    }

    pub fn min(&self) -> Option<i32> {
        (!self.is_empty()).then_some(self.first)
    }

    pub fn max(&self) -> Option<i32> {
        (!self.is_empty()).then(|| self.last_exclusive - 1)
    }

    pub fn average(&self) -> Option<f64> {
        self.midpoint()
    }

    /// For consecutive integers the median is the midpoint of the bounds, for both odd and
    /// even lengths.
    pub fn median(&self) -> Option<f64> {
        self.midpoint()
    }

    fn midpoint(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some((self.first as f64 + (self.last_exclusive as f64 - 1.0)) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_access() {
        let seq = IntSequence::new(5, 8);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap(), 5);
        assert_eq!(seq.get(2).unwrap(), 7);
        assert_eq!(
            seq.get(3),
            Err(FrameError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn sub_ranges_stay_virtual() {
        let seq = IntSequence::new(-2, 6);
        assert_eq!(seq.range(1, 4).unwrap(), IntSequence::new(-1, 2));
        assert_eq!(seq.range(0, 8).unwrap(), seq);
        assert_eq!(seq.head(3), IntSequence::new(-2, 1));
        assert_eq!(seq.head(100), seq);
        assert_eq!(seq.tail(2), IntSequence::new(4, 6));
        assert_eq!(seq.tail(8), seq);
        assert!(seq.range(3, 9).is_err());
    }

    #[test]
    fn copy_to_honors_from_offset() {
        let seq = IntSequence::new(10, 15);
        let mut dest = [0; 4];
        seq.copy_to(&mut dest, 2, 1, 3).unwrap();
        assert_eq!(dest, [0, 12, 13, 14]);

        assert_eq!(
            seq.copy_to(&mut dest, 3, 0, 3),
            Err(FrameError::RangeOutOfBounds {
                from: 3,
                to: 6,
                len: 5
            })
        );
    }

    #[test]
    fn inverted_bounds_are_empty() {
        let seq = IntSequence::new(3, 1);
        assert!(seq.is_empty());
        assert_eq!(seq.sum(), 0);
        assert_eq!(seq.min(), None);
        assert_eq!(seq.median(), None);
    }
}
