use crate::connector::{log_statement, ConnectionProvider};
use crate::error::{SqlError, SqlResult};
use crate::loader::read_table;
use crate::value::SqlValue;
use dframe::{Table, Value};
use rusqlite::{params_from_iter, Connection};

#[derive(Debug, Clone)]
enum Params {
    None,
    Row(Vec<Value>),
    Batch(Table),
}

/// A SQL statement with optional parameters: one row of values, or a table of rows for batch
/// updates. Binding one kind of parameters replaces the other.
pub struct StatementBuilder<'a, P> {
    provider: &'a P,
    sql: String,
    params: Params,
}

impl<'a, P: ConnectionProvider> StatementBuilder<'a, P> {
    pub(crate) fn new(provider: &'a P, sql: String) -> Self {
        Self {
            provider,
            sql,
            params: Params::None,
        }
    }

    pub fn bind<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.params = Params::Row(row.into_iter().map(Into::into).collect());
        self
    }

    /// Binds one parameter row per table row, in column order.
    pub fn bind_batch(mut self, rows: Table) -> Self {
        self.params = Params::Batch(rows);
        self
    }

    pub fn select(&self) -> SqlResult<Table> {
        let params: &[Value] = match &self.params {
            Params::None => &[],
            Params::Row(row) => row,
            Params::Batch(_) => {
                return Err(SqlError::InvalidCombination(
                    "batch parameters can't be used with select".to_string(),
                ))
            }
        };
        self.provider
            .with_connection(|conn| read_table(conn, self.provider, &self.sql, params, None))
    }

    /// Executes the statement and returns the number of affected rows. Batches run atomically.
    pub fn update(&self) -> SqlResult<usize> {
        match &self.params {
            Params::None => self
                .provider
                .with_connection(|conn| self.execute_row(conn, &[])),
            Params::Row(row) => self
                .provider
                .with_connection(|conn| self.execute_row(conn, row)),
            Params::Batch(rows) if self.provider.config().supports_batch_updates => self
                .provider
                .with_transaction(|conn| self.execute_batch(conn, rows)),
            Params::Batch(rows) => self.provider.with_transaction(|conn| {
                let mut updated = 0;
                for row in rows.rows() {
                    updated += self.execute_row(conn, &row.values())?;
                }
                Ok(updated)
            }),
        }
    }

    fn execute_row(&self, conn: &Connection, params: &[Value]) -> SqlResult<usize> {
        log_statement(self.provider.config(), &self.sql, params);
        conn.execute(&self.sql, params_from_iter(params.iter().map(SqlValue)))
            .map_err(SqlError::write)
    }

    fn execute_batch(&self, conn: &Connection, rows: &Table) -> SqlResult<usize> {
        let mut stmt = conn.prepare(&self.sql).map_err(SqlError::write)?;
        let mut updated = 0;
        for row in rows.rows() {
            let values = row.values();
            log_statement(self.provider.config(), &self.sql, &values);
            updated += stmt
                .execute(params_from_iter(values.iter().map(SqlValue)))
                .map_err(SqlError::write)?;
        }
        Ok(updated)
    }
}
