//! Column aggregates.
//!
//! Primitive columns aggregate over their raw slices. [`IntSequence`](crate::IntSequence)
//! columns never iterate: every aggregate is computed from the bounds. Object columns skip
//! nulls.

use crate::array::{ArrayColumn, Primitive};
use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::value::{ColumnType, Value};

impl Column {
    /// `Long` for integer columns, `Double` for double columns; object columns sum as `Long`
    /// unless a double is present.
    pub fn sum(&self) -> FrameResult<Value> {
        Ok(match self {
            Column::Int(c) => Value::Long(sum_integers(c.as_slice().iter().map(|v| *v as i64))?),
            Column::Long(c) => Value::Long(sum_integers(c.as_slice().iter().copied())?),
            Column::Double(c) => Value::Double(sum_doubles(c.as_slice().iter().copied())),
            Column::IntSequence(s) => Value::Long(s.sum()),
            Column::Object(c) => {
                let numbers = numeric_values(c.as_slice())?;
                if numbers.iter().any(|v| matches!(v, Value::Double(_))) {
                    Value::Double(sum_doubles(numbers.iter().filter_map(Value::as_f64)))
                } else {
                    Value::Long(sum_integers(numbers.iter().filter_map(Value::as_i64))?)
                }
            }
        })
    }

    pub fn min(&self) -> FrameResult<Value> {
        Ok(match self {
            Column::Int(c) => primitive_min(c).map(Value::Int).into(),
            Column::Long(c) => primitive_min(c).map(Value::Long).into(),
            Column::Double(c) => primitive_min(c).map(Value::Double).into(),
            Column::IntSequence(s) => s.min().map(Value::Int).into(),
            Column::Object(c) => c.as_slice().iter().filter(|v| !v.is_null()).min().cloned().into(),
        })
    }

    pub fn max(&self) -> FrameResult<Value> {
        Ok(match self {
            Column::Int(c) => primitive_max(c).map(Value::Int).into(),
            Column::Long(c) => primitive_max(c).map(Value::Long).into(),
            Column::Double(c) => primitive_max(c).map(Value::Double).into(),
            Column::IntSequence(s) => s.max().map(Value::Int).into(),
            Column::Object(c) => c.as_slice().iter().filter(|v| !v.is_null()).max().cloned().into(),
        })
    }

    pub fn average(&self) -> FrameResult<Value> {
        let avg = match self {
            Column::Int(c) => primitive_average(c),
            Column::Long(c) => primitive_average(c),
            Column::Double(c) => primitive_average(c),
            Column::IntSequence(s) => s.average(),
            Column::Object(c) => {
                let numbers: Vec<f64> = numeric_values(c.as_slice())?
                    .iter()
                    .filter_map(Value::as_f64)
                    .collect();
                average_of(&numbers)
            }
        };
        Ok(avg.into())
    }

    pub fn median(&self) -> FrameResult<Value> {
        let median = match self {
            Column::Int(c) => median_of(c.as_slice().iter().map(|v| v.to_f64()).collect()),
            Column::Long(c) => median_of(c.as_slice().iter().map(|v| v.to_f64()).collect()),
            Column::Double(c) => median_of(c.as_slice().to_vec()),
            Column::IntSequence(s) => s.median(),
            Column::Object(c) => median_of(
                numeric_values(c.as_slice())?
                    .iter()
                    .filter_map(Value::as_f64)
                    .collect(),
            ),
        };
        Ok(median.into())
    }
}

fn sum_integers(mut values: impl Iterator<Item = i64>) -> FrameResult<i64> {
    values.try_fold(0i64, |acc, v| acc.checked_add(v).ok_or(FrameError::SumOverflow))
}

// `Iterator::sum` for floats starts from -0.0.
fn sum_doubles(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

fn primitive_min<T: Primitive>(column: &ArrayColumn<T>) -> Option<T> {
    column
        .as_slice()
        .iter()
        .copied()
        .min_by(|a, b| T::compare(a, b))
}

fn primitive_max<T: Primitive>(column: &ArrayColumn<T>) -> Option<T> {
    column
        .as_slice()
        .iter()
        .copied()
        .max_by(|a, b| T::compare(a, b))
}

fn primitive_average<T: Primitive>(column: &ArrayColumn<T>) -> Option<f64> {
    let values: Vec<f64> = column.as_slice().iter().map(|v| v.to_f64()).collect();
    average_of(&values)
}

fn average_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum_doubles(values.iter().copied()) / values.len() as f64)
}

fn median_of(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

fn numeric_values(values: &[Value]) -> FrameResult<Vec<Value>> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        match v {
            Value::Null => {}
            Value::Int(_) | Value::Long(_) | Value::Double(_) => out.push(v.clone()),
            _ => {
                return Err(FrameError::TypeMismatch {
                    expected: ColumnType::Double,
                    actual: v.column_type(),
                })
            }
        }
    }
    Ok(out)
}
