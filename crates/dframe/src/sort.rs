use crate::error::{FrameError, FrameResult};
use crate::table::{ColumnRef, RowProxy, Table};
use std::cmp::Ordering;

/// One sort criterion: a column and a direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub column: ColumnRef,
    pub ascending: bool,
}

impl SortKey {
    pub fn new(column: impl Into<ColumnRef>, ascending: bool) -> Self {
        Self {
            column: column.into(),
            ascending,
        }
    }

    pub fn asc(column: impl Into<ColumnRef>) -> Self {
        Self::new(column, true)
    }

    pub fn desc(column: impl Into<ColumnRef>) -> Self {
        Self::new(column, false)
    }
}

impl Table {
    /// Stable multi-key sort. Rows are compared key by key; rows that tie on every key keep
    /// their original relative order.
    pub fn sort(&self, keys: &[SortKey]) -> FrameResult<Table> {
        let resolved = keys
            .iter()
            .map(|k| Ok((&self.columns()[k.column.resolve(self.index())?], k.ascending)))
            .collect::<FrameResult<Vec<_>>>()?;

        let mut order: Vec<usize> = (0..self.height()).collect();
        order.sort_by(|&a, &b| {
            for (column, ascending) in &resolved {
                let ord = column.compare_rows(a, b);
                let ord = if *ascending { ord } else { ord.reverse() };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        log::debug!(
            "sorted {} rows by {} key(s)",
            self.height(),
            resolved.len()
        );
        self.take_rows(&order)
    }

    pub fn sort_by_column(&self, column: impl Into<ColumnRef>, ascending: bool) -> FrameResult<Table> {
        self.sort(&[SortKey::new(column, ascending)])
    }

    /// Stable sort by a key extracted from each row. The key is computed once per row.
    pub fn sort_by_key<K, F>(&self, mut key: F) -> FrameResult<Table>
    where
        K: Ord,
        F: FnMut(&RowProxy<'_>) -> K,
    {
        let keys: Vec<K> = self.rows().map(|row| key(&row)).collect();
        let mut order: Vec<usize> = (0..self.height()).collect();
        order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        self.take_rows(&order)
    }

    /// Like [`Table::sort_by_key`] for extractors that can fail (e.g. by looking up a column).
    pub fn try_sort_by_key<K, F>(&self, mut key: F) -> FrameResult<Table>
    where
        K: Ord,
        F: FnMut(&RowProxy<'_>) -> FrameResult<K>,
    {
        let keys = self
            .rows()
            .map(|row| key(&row))
            .collect::<Result<Vec<K>, FrameError>>()?;
        let mut order: Vec<usize> = (0..self.height()).collect();
        order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        self.take_rows(&order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::index::Index;
    use crate::value::Value;

    #[test]
    fn descending_sort_keeps_ties_stable() {
        let table = Table::new(
            Index::for_labels(["k", "tag"]).unwrap(),
            vec![
                Column::for_doubles(vec![1.0, 3.0, 1.0, 3.0]),
                Column::for_data(["a", "b", "c", "d"]),
            ],
        )
        .unwrap();

        let sorted = table.sort(&[SortKey::desc("k")]).unwrap();
        let tags: Vec<Value> = sorted.column("tag").unwrap().to_values();
        assert_eq!(
            tags,
            vec![
                Value::from("b"),
                Value::from("d"),
                Value::from("a"),
                Value::from("c")
            ]
        );
    }

    #[test]
    fn unknown_sort_column_fails() {
        let table = Table::new(
            Index::for_labels(["k"]).unwrap(),
            vec![Column::for_ints(vec![1])],
        )
        .unwrap();
        assert_eq!(
            table.sort(&[SortKey::asc("x")]).unwrap_err(),
            FrameError::UnknownColumn("x".to_string())
        );
        assert!(table.sort(&[SortKey::asc(3usize)]).is_err());
    }
}
