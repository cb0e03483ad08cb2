//! In-memory, column-oriented tables.
//!
//! This crate focuses on:
//! - Typed column storage (unboxed `i32`/`i64`/`f64` arrays, boxed values, and a virtual integer
//!   range column) with zero-copy views.
//! - Growable accumulators that freeze into immutable columns.
//! - Table construction by folding flat value sequences by row or by column.
//! - Hash joins (inner/left/right/full), stable multi-key sorts and column aggregates.

#![forbid(unsafe_code)]

mod accumulator;
mod agg;
mod array;
mod column;
mod error;
mod fold;
mod index;
mod join;
mod sequence;
mod sort;
mod table;
mod table_builder;
mod value;

pub use crate::accumulator::{
    Accumulator, DoubleAccumulator, IntAccumulator, LongAccumulator, ObjectAccumulator,
    TypedAccumulator,
};
pub use crate::array::{
    ArrayColumn, ColumnElement, DoubleColumn, IntColumn, LongColumn, ObjectColumn, Primitive,
};
pub use crate::column::{Column, ColumnIter};
pub use crate::error::{FrameError, FrameResult};
pub use crate::fold::{FrameBuilder, RowAppender};
pub use crate::index::Index;
pub use crate::join::{Join, JoinIndices, JoinType, TableJoin};
pub use crate::sequence::IntSequence;
pub use crate::sort::SortKey;
pub use crate::table::{ColumnRef, RowProxy, Table};
pub use crate::table_builder::{ColumnSchema, TableBuilder};
pub use crate::value::{ColumnType, Value};
