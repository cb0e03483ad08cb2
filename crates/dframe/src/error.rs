use crate::value::ColumnType;

pub type FrameResult<T> = Result<T, FrameError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("empty columns")]
    EmptyColumns,

    #[error("row must be at least {expected} elements long: {actual}")]
    RowTooShort { expected: usize, actual: usize },

    #[error("duplicate column label: {0}")]
    DuplicateLabel(String),

    #[error("expected {expected} columns, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("column {label} has {actual} values, table height is {expected}")]
    HeightMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("join key arity mismatch: {left} left columns vs {right} right columns")]
    KeyArityMismatch { left: usize, right: usize },

    #[error("no join key columns specified")]
    EmptyJoinKeys,

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("range {from}..{to} out of bounds for length {len}")]
    RangeOutOfBounds { from: usize, to: usize, len: usize },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column position {position} out of bounds for width {width}")]
    ColumnPositionOutOfBounds { position: usize, width: usize },

    #[error("type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: ColumnType,
        actual: ColumnType,
    },

    #[error("integer sum overflows i64")]
    SumOverflow,

    #[error("invalid combination: {0}")]
    InvalidCombination(String),
}

impl FrameError {
    pub(crate) fn check_index(index: usize, len: usize) -> FrameResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(FrameError::IndexOutOfBounds { index, len })
        }
    }

    pub(crate) fn check_range(from: usize, to: usize, len: usize) -> FrameResult<()> {
        if from <= to && to <= len {
            Ok(())
        } else {
            Err(FrameError::RangeOutOfBounds { from, to, len })
        }
    }
}
