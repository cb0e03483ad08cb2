use crate::connector::{log_statement, ConnectionProvider};
use crate::error::{SqlError, SqlResult};
use crate::value::{quote_identifier, SqlValue};
use dframe::Table;
use rusqlite::params_from_iter;

/// Inserts table rows into an existing database table. Column labels name the target columns.
pub struct TableSaver<'a, P> {
    provider: &'a P,
    table: String,
    delete_table_data: bool,
}

impl<'a, P: ConnectionProvider> TableSaver<'a, P> {
    pub(crate) fn new(provider: &'a P, table: &str) -> Self {
        Self {
            provider,
            table: table.to_string(),
            delete_table_data: false,
        }
    }

    /// Clears the target table before inserting.
    pub fn delete_table_data(mut self) -> Self {
        self.delete_table_data = true;
        self
    }

    /// Returns the number of inserted rows. Either all rows are saved or none are.
    pub fn save(&self, data: &Table) -> SqlResult<usize> {
        let config = self.provider.config();
        let table = quote_identifier(&self.table);

        self.provider.with_transaction(|conn| {
            if self.delete_table_data {
                let sql = format!("DELETE FROM {table}");
                log_statement(config, &sql, &[]);
                conn.execute(&sql, []).map_err(SqlError::write)?;
            }
            if data.width() == 0 {
                return Ok(0);
            }

            let columns: Vec<String> = data
                .index()
                .labels()
                .iter()
                .map(|l| quote_identifier(l))
                .collect();
            let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql).map_err(SqlError::write)?;
            for row in data.rows() {
                let values = row.values();
                log_statement(config, &sql, &values);
                stmt.execute(params_from_iter(values.iter().map(SqlValue)))
                    .map_err(SqlError::write)?;
            }

            log::debug!("saved {} rows into {}", data.height(), self.table);
            Ok(data.height())
        })
    }
}
