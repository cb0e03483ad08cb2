use crate::accumulator::TypedAccumulator;
use crate::error::{FrameError, FrameResult};
use crate::index::Index;
use crate::table::Table;
use crate::value::{ColumnType, Value};
use std::sync::Arc;

/// Declared name and storage type of one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: Arc<str>,
    pub column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<Arc<str>>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Row-at-a-time builder for a table with declared column types.
///
/// Each column starts in the declared representation. A column that receives a null or a value
/// of another kind switches to object storage for good, keeping the values appended so far.
#[derive(Debug)]
pub struct TableBuilder {
    index: Index,
    columns: Vec<TypedAccumulator>,
}

impl TableBuilder {
    pub fn new(schema: &[ColumnSchema], capacity: usize) -> FrameResult<Self> {
        let index = Index::for_labels(schema.iter().map(|c| c.name.as_ref()))?;
        let columns = schema
            .iter()
            .map(|c| TypedAccumulator::new(c.column_type, capacity))
            .collect();
        Ok(Self { index, columns })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(TypedAccumulator::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current storage type per column.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(TypedAccumulator::column_type).collect()
    }

    pub fn append_row(&mut self, row: &[Value]) -> FrameResult<()> {
        if row.len() != self.columns.len() {
            return Err(FrameError::WidthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.add(value.clone());
        }
        Ok(())
    }

    pub fn finish(self) -> FrameResult<Table> {
        let columns = self
            .columns
            .into_iter()
            .map(TypedAccumulator::finish)
            .collect();
        Table::new(self.index, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use pretty_assertions::assert_eq;

    fn schema() -> Vec<ColumnSchema> {
        vec![
            ColumnSchema::new("id", ColumnType::Long),
            ColumnSchema::new("score", ColumnType::Double),
            ColumnSchema::new("name", ColumnType::Object),
        ]
    }

    #[test]
    fn typed_columns_keep_primitive_storage() {
        let mut builder = TableBuilder::new(&schema(), 2).unwrap();
        builder
            .append_row(&[Value::Long(1), Value::Double(0.5), Value::from("a")])
            .unwrap();
        builder
            .append_row(&[Value::Int(2), Value::Long(3), Value::Null])
            .unwrap();

        let table = builder.finish().unwrap();
        assert_eq!(table.column("id").unwrap(), &Column::for_longs(vec![1, 2]));
        assert!(matches!(table.column("score").unwrap(), Column::Double(_)));
        assert_eq!(table.get(1, "score").unwrap(), Value::Double(3.0));
        assert_eq!(table.get(1, "name").unwrap(), Value::Null);
    }

    #[test]
    fn null_degrades_only_its_column() {
        let mut builder = TableBuilder::new(&schema(), 2).unwrap();
        builder
            .append_row(&[Value::Null, Value::Double(1.0), Value::from("a")])
            .unwrap();
        assert_eq!(
            builder.column_types(),
            vec![ColumnType::Object, ColumnType::Double, ColumnType::Object]
        );
    }

    #[test]
    fn rows_must_match_width() {
        let mut builder = TableBuilder::new(&schema(), 0).unwrap();
        assert_eq!(
            builder.append_row(&[Value::Long(1)]).unwrap_err(),
            FrameError::WidthMismatch {
                expected: 3,
                actual: 1
            }
        );
        assert!(builder.is_empty());
    }
}
