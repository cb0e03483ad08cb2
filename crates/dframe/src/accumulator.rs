#![forbid(unsafe_code)]

use crate::array::{ArrayColumn, ColumnElement};
use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::value::{ColumnType, Value};

const DEFAULT_CAPACITY: usize = 10;

/// Growable buffer that freezes into an immutable [`Column`].
///
/// Appends are amortized O(1). [`Accumulator::finish`] consumes the accumulator, so a frozen
/// column can never be mutated through it:
///
/// ```compile_fail
/// use dframe::IntAccumulator;
///
/// let mut acc = IntAccumulator::new();
/// acc.add(1);
/// let column = acc.finish();
/// acc.add(2);
/// ```
#[derive(Debug, Clone)]
pub struct Accumulator<T> {
    data: Vec<T>,
}

pub type IntAccumulator = Accumulator<i32>;
pub type LongAccumulator = Accumulator<i64>;
pub type DoubleAccumulator = Accumulator<f64>;
pub type ObjectAccumulator = Accumulator<Value>;

impl<T: ColumnElement> Accumulator<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, value: T) {
        self.data.push(value);
    }

    pub fn replace(&mut self, index: usize, value: T) -> FrameResult<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(FrameError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn finish(self) -> Column {
        T::wrap(ArrayColumn::from_vec(self.data))
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: ColumnElement> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ColumnElement> Extend<T> for Accumulator<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.data.extend(iter);
    }
}

/// Accumulator for a declared column type that accepts arbitrary [`Value`]s.
///
/// Integers widen into long and double columns. A null or any other mismatching value
/// converts the accumulator into an object accumulator, keeping everything appended so far.
#[derive(Debug, Clone)]
pub enum TypedAccumulator {
    Int(IntAccumulator),
    Long(LongAccumulator),
    Double(DoubleAccumulator),
    Object(ObjectAccumulator),
}

impl TypedAccumulator {
    pub fn new(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Int => TypedAccumulator::Int(Accumulator::with_capacity(capacity)),
            ColumnType::Long => TypedAccumulator::Long(Accumulator::with_capacity(capacity)),
            ColumnType::Double => TypedAccumulator::Double(Accumulator::with_capacity(capacity)),
            ColumnType::Object => TypedAccumulator::Object(Accumulator::with_capacity(capacity)),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            TypedAccumulator::Int(_) => ColumnType::Int,
            TypedAccumulator::Long(_) => ColumnType::Long,
            TypedAccumulator::Double(_) => ColumnType::Double,
            TypedAccumulator::Object(_) => ColumnType::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedAccumulator::Int(a) => a.len(),
            TypedAccumulator::Long(a) => a.len(),
            TypedAccumulator::Double(a) => a.len(),
            TypedAccumulator::Object(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&mut self, value: Value) {
        let value = match (&mut *self, value) {
            (TypedAccumulator::Int(a), Value::Int(v)) => return a.add(v),
            (TypedAccumulator::Long(a), Value::Long(v)) => return a.add(v),
            (TypedAccumulator::Long(a), Value::Int(v)) => return a.add(v as i64),
            (TypedAccumulator::Double(a), Value::Double(v)) => return a.add(v),
            (TypedAccumulator::Double(a), Value::Int(v)) => return a.add(v as f64),
            (TypedAccumulator::Double(a), Value::Long(v)) => return a.add(v as f64),
            (TypedAccumulator::Object(a), value) => return a.add(value),
            (_, value) => value,
        };

        log::trace!(
            "degrading {:?} accumulator to object after {} values (got {:?})",
            self.column_type(),
            self.len(),
            value
        );
        let mut boxed = self.take_boxed();
        boxed.add(value);
        *self = TypedAccumulator::Object(boxed);
    }

    fn take_boxed(&mut self) -> ObjectAccumulator {
        let taken = std::mem::replace(self, TypedAccumulator::Object(Accumulator::with_capacity(0)));
        match taken {
            TypedAccumulator::Int(a) => boxed(a),
            TypedAccumulator::Long(a) => boxed(a),
            TypedAccumulator::Double(a) => boxed(a),
            TypedAccumulator::Object(a) => a,
        }
    }

    pub fn finish(self) -> Column {
        match self {
            TypedAccumulator::Int(a) => a.finish(),
            TypedAccumulator::Long(a) => a.finish(),
            TypedAccumulator::Double(a) => a.finish(),
            TypedAccumulator::Object(a) => a.finish(),
        }
    }
}

fn boxed<T: ColumnElement>(acc: Accumulator<T>) -> ObjectAccumulator {
    let values = acc.into_vec();
    let mut out = Accumulator::with_capacity(values.len().max(DEFAULT_CAPACITY));
    out.extend(values.iter().map(ColumnElement::to_value));
    out
}
