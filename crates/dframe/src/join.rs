//! Hash joins.
//!
//! One side is indexed into a multimap `key tuple -> rows` (rows kept in their original order),
//! the other side probes it row by row. The resulting row correspondences are applied to both
//! tables with [`Column::select`], so a side that has unmatched rows comes out as object
//! columns with nulls in those rows.
//!
//! Key tuples containing a null never match anything, including another null.

use crate::column::Column;
use crate::error::{FrameError, FrameResult};
use crate::table::{ColumnRef, Table};
use crate::value::Value;
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// Per-output-row source positions. `None` marks a row with no counterpart on that side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinIndices {
    pub left: Vec<Option<usize>>,
    pub right: Vec<Option<usize>>,
}

impl JoinIndices {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    fn push(&mut self, left: Option<usize>, right: Option<usize>) {
        self.left.push(left);
        self.right.push(right);
    }
}

/// Join kind plus paired key columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    kind: JoinType,
    left_keys: Vec<ColumnRef>,
    right_keys: Vec<ColumnRef>,
}

impl Join {
    pub fn new(kind: JoinType) -> Self {
        Self {
            kind,
            left_keys: Vec::new(),
            right_keys: Vec::new(),
        }
    }

    pub fn kind(&self) -> JoinType {
        self.kind
    }

    /// Adds a key pair.
    pub fn on(mut self, left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        self.left_keys.push(left.into());
        self.right_keys.push(right.into());
        self
    }

    pub fn on_positions(self, left: usize, right: usize) -> Self {
        self.on(left, right)
    }

    /// Adds a key column present under the same label (or position) on both sides.
    pub fn on_column(self, column: impl Into<ColumnRef>) -> Self {
        let column = column.into();
        self.on(column.clone(), column)
    }

    /// Adds key columns given as two separate lists. Lists of different lengths are rejected
    /// when the join runs.
    pub fn on_columns<L, R>(
        mut self,
        left: impl IntoIterator<Item = L>,
        right: impl IntoIterator<Item = R>,
    ) -> Self
    where
        L: Into<ColumnRef>,
        R: Into<ColumnRef>,
    {
        self.left_keys.extend(left.into_iter().map(Into::into));
        self.right_keys.extend(right.into_iter().map(Into::into));
        self
    }

    /// Row correspondences between `left` and `right`.
    ///
    /// Ordering: inner, left and full joins are left-row-major, with matches for one left row in
    /// the right table's original order. Right joins are right-row-major. Full joins append the
    /// unmatched right rows, in their original order, after all left-driven rows.
    pub fn indices(&self, left: &Table, right: &Table) -> FrameResult<JoinIndices> {
        if self.left_keys.len() != self.right_keys.len() {
            return Err(FrameError::KeyArityMismatch {
                left: self.left_keys.len(),
                right: self.right_keys.len(),
            });
        }
        if self.left_keys.is_empty() {
            return Err(FrameError::EmptyJoinKeys);
        }

        let left_keys = resolve_keys(left, &self.left_keys)?;
        let right_keys = resolve_keys(right, &self.right_keys)?;
        let mut out = JoinIndices::default();

        match self.kind {
            JoinType::Inner | JoinType::Left | JoinType::Full => {
                let index = build_index(&right_keys, right.height());
                let keep_unmatched = self.kind != JoinType::Inner;
                let mut right_matched = vec![false; right.height()];

                for row in 0..left.height() {
                    match row_key(&left_keys, row).and_then(|k| index.get(&k)) {
                        Some(matches) => {
                            for &r in matches {
                                out.push(Some(row), Some(r));
                                right_matched[r] = true;
                            }
                        }
                        None if keep_unmatched => out.push(Some(row), None),
                        None => {}
                    }
                }

                if self.kind == JoinType::Full {
                    for (r, matched) in right_matched.iter().enumerate() {
                        if !matched {
                            out.push(None, Some(r));
                        }
                    }
                }
            }
            JoinType::Right => {
                let index = build_index(&left_keys, left.height());
                for row in 0..right.height() {
                    match row_key(&right_keys, row).and_then(|k| index.get(&k)) {
                        Some(matches) => {
                            for &l in matches {
                                out.push(Some(l), Some(row));
                            }
                        }
                        None => out.push(None, Some(row)),
                    }
                }
            }
        }

        Ok(out)
    }

    /// Joined table: all left columns followed by all right columns. Right labels that collide
    /// with left labels get a `_` suffix.
    pub fn execute(&self, left: &Table, right: &Table) -> FrameResult<Table> {
        let indices = self.indices(left, right)?;

        let index = left.index().add_labels(right.index());
        let mut columns = Vec::with_capacity(left.width() + right.width());
        for column in left.columns() {
            columns.push(column.select(&indices.left)?);
        }
        for column in right.columns() {
            columns.push(column.select(&indices.right)?);
        }

        log::debug!(
            "{:?} join: {} x {} rows -> {} rows",
            self.kind,
            left.height(),
            right.height(),
            indices.len()
        );
        Table::new(index, columns)
    }
}

/// Fluent join starting from the left table: `left.join(kind).on(a, b).with(&right)`.
#[derive(Clone, Debug)]
pub struct TableJoin<'a> {
    left: &'a Table,
    join: Join,
}

impl<'a> TableJoin<'a> {
    pub fn on(mut self, left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        self.join = self.join.on(left, right);
        self
    }

    pub fn on_positions(mut self, left: usize, right: usize) -> Self {
        self.join = self.join.on_positions(left, right);
        self
    }

    pub fn on_column(mut self, column: impl Into<ColumnRef>) -> Self {
        self.join = self.join.on_column(column);
        self
    }

    pub fn on_columns<L, R>(
        mut self,
        left: impl IntoIterator<Item = L>,
        right: impl IntoIterator<Item = R>,
    ) -> Self
    where
        L: Into<ColumnRef>,
        R: Into<ColumnRef>,
    {
        self.join = self.join.on_columns(left, right);
        self
    }

    pub fn indices(&self, right: &Table) -> FrameResult<JoinIndices> {
        self.join.indices(self.left, right)
    }

    pub fn with(&self, right: &Table) -> FrameResult<Table> {
        self.join.execute(self.left, right)
    }
}

impl Table {
    pub fn join(&self, kind: JoinType) -> TableJoin<'_> {
        TableJoin {
            left: self,
            join: Join::new(kind),
        }
    }

    pub fn inner_join(&self) -> TableJoin<'_> {
        self.join(JoinType::Inner)
    }

    pub fn left_join(&self) -> TableJoin<'_> {
        self.join(JoinType::Left)
    }

    pub fn right_join(&self) -> TableJoin<'_> {
        self.join(JoinType::Right)
    }

    pub fn full_join(&self) -> TableJoin<'_> {
        self.join(JoinType::Full)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum KeyPart {
    Bool(bool),
    // Int and Long keys join with each other.
    Integer(i64),
    Double(OrderedFloat<f64>),
    String(Arc<str>),
}

type JoinKey = SmallVec<[KeyPart; 2]>;

fn resolve_keys<'t>(table: &'t Table, keys: &[ColumnRef]) -> FrameResult<Vec<&'t Column>> {
    keys.iter()
        .map(|k| Ok(&table.columns()[k.resolve(table.index())?]))
        .collect()
}

fn key_part(value: Value) -> Option<KeyPart> {
    match value {
        Value::Null => None,
        Value::Bool(v) => Some(KeyPart::Bool(v)),
        Value::Int(v) => Some(KeyPart::Integer(v as i64)),
        Value::Long(v) => Some(KeyPart::Integer(v)),
        Value::Double(v) => Some(KeyPart::Double(OrderedFloat(v))),
        Value::String(v) => Some(KeyPart::String(v)),
    }
}

fn row_key(columns: &[&Column], row: usize) -> Option<JoinKey> {
    columns
        .iter()
        .map(|c| key_part(c.value_at(row)))
        .collect()
}

fn build_index(columns: &[&Column], height: usize) -> AHashMap<JoinKey, Vec<usize>> {
    let mut index: AHashMap<JoinKey, Vec<usize>> = AHashMap::with_capacity(height);
    for row in 0..height {
        if let Some(key) = row_key(columns, row) {
            index.entry(key).or_default().push(row);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;
    use pretty_assertions::assert_eq;

    fn table(labels: [&str; 2], keys: Vec<Value>, payload: Vec<i32>) -> Table {
        Table::new(
            Index::for_labels(labels).unwrap(),
            vec![Column::for_values(keys), Column::for_ints(payload)],
        )
        .unwrap()
    }

    #[test]
    fn null_keys_never_match() {
        let left = table(
            ["k", "l"],
            vec![Value::Null, Value::Int(1)],
            vec![10, 11],
        );
        let right = table(
            ["k", "r"],
            vec![Value::Null, Value::Long(1)],
            vec![20, 21],
        );

        let indices = left.inner_join().on_column("k").indices(&right).unwrap();
        assert_eq!(indices.left, vec![Some(1)]);
        assert_eq!(indices.right, vec![Some(1)]);

        let full = left.full_join().on_column("k").indices(&right).unwrap();
        assert_eq!(full.left, vec![Some(0), Some(1), None]);
        assert_eq!(full.right, vec![None, Some(1), Some(0)]);
    }

    #[test]
    fn double_keys_treat_signed_zero_as_equal() {
        let left = table(["k", "l"], vec![Value::Double(0.0)], vec![1]);
        let right = table(["k", "r"], vec![Value::Double(-0.0)], vec![2]);
        let joined = left.inner_join().on_column("k").with(&right).unwrap();
        assert_eq!(joined.height(), 1);
    }

    #[test]
    fn key_list_validation() {
        let left = table(["k", "l"], vec![Value::Int(1)], vec![1]);
        let right = table(["k", "r"], vec![Value::Int(1)], vec![2]);

        let err = Join::new(JoinType::Inner)
            .on_columns(["k", "l"], ["k"])
            .execute(&left, &right)
            .unwrap_err();
        assert_eq!(err, FrameError::KeyArityMismatch { left: 2, right: 1 });

        let err = Join::new(JoinType::Inner).execute(&left, &right).unwrap_err();
        assert_eq!(err, FrameError::EmptyJoinKeys);

        let err = left.inner_join().on("k", "x").with(&right).unwrap_err();
        assert_eq!(err, FrameError::UnknownColumn("x".to_string()));
    }
}
