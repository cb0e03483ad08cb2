//! Assertion helpers for `dframe` columns and tables.
//!
//! Helpers panic with a descriptive message on the first failed expectation and return `self`
//! so expectations can be chained.

use dframe::{Column, ColumnType, Table, Value};
use pretty_assertions::assert_eq;

/// Default absolute tolerance for [`DoubleColumnAsserts`].
pub const DOUBLE_TOLERANCE: f64 = 1e-9;

pub struct ColumnAsserts<'a> {
    column: &'a Column,
}

impl<'a> ColumnAsserts<'a> {
    pub fn new(column: &'a Column) -> Self {
        Self { column }
    }

    pub fn expect_type(self, column_type: ColumnType) -> Self {
        assert_eq!(
            self.column.column_type(),
            column_type,
            "unexpected column type"
        );
        self
    }

    pub fn expect_len(self, len: usize) -> Self {
        assert_eq!(self.column.size(), len, "unexpected column size");
        self
    }

    pub fn expect_data<I, V>(self, expected: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let expected: Vec<Value> = expected.into_iter().map(Into::into).collect();
        assert_eq!(self.column.to_values(), expected, "unexpected column data");
        self
    }

    pub fn expect_nulls_at(self, positions: &[usize]) -> Self {
        let nulls: Vec<usize> = self
            .column
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_null())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(nulls, positions, "unexpected null positions");
        self
    }
}

/// Approximate comparison for double columns. Reads the column through a bulk copy.
pub struct DoubleColumnAsserts {
    values: Vec<f64>,
    tolerance: f64,
}

impl DoubleColumnAsserts {
    pub fn new(column: &Column) -> Self {
        let mut values = vec![0.0; column.size()];
        if let Err(err) = column.copy_to_double(&mut values, 0, 0, column.size()) {
            panic!("not a double column: {err}");
        }
        Self {
            values,
            tolerance: DOUBLE_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn expect_data(self, expected: &[f64]) -> Self {
        assert_eq!(self.values.len(), expected.len(), "unexpected column size");
        for (i, (actual, expected)) in self.values.iter().zip(expected).enumerate() {
            assert!(
                (actual - expected).abs() <= self.tolerance,
                "value at {i}: expected {expected}, got {actual}"
            );
        }
        self
    }
}

pub struct TableAsserts<'a> {
    table: &'a Table,
}

impl<'a> TableAsserts<'a> {
    /// Checks the table labels up front.
    pub fn new(table: &'a Table, labels: &[&str]) -> Self {
        let actual: Vec<&str> = table.index().labels().iter().map(|l| l.as_ref()).collect();
        assert_eq!(actual, labels, "unexpected table labels");
        Self { table }
    }

    pub fn expect_height(self, height: usize) -> Self {
        assert_eq!(self.table.height(), height, "unexpected table height");
        self
    }

    pub fn expect_row(self, row: usize, expected: &[Value]) -> Self {
        let actual = match self.table.row(row) {
            Ok(proxy) => proxy.values(),
            Err(err) => panic!("row {row} is not readable: {err}"),
        };
        assert_eq!(actual, expected, "unexpected values in row {row}");
        self
    }

    pub fn expect_rows(self, expected: &[Vec<Value>]) -> Self {
        let this = self.expect_height(expected.len());
        for (i, (actual, row)) in this.table.rows().zip(expected).enumerate() {
            assert_eq!(&actual.values(), row, "unexpected values in row {i}");
        }
        this
    }

    pub fn column(&self, label: &str) -> ColumnAsserts<'a> {
        match self.table.column(label) {
            Ok(column) => ColumnAsserts::new(column),
            Err(err) => panic!("{err}"),
        }
    }
}
