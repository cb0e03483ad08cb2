use crate::connector::{log_statement, ConnectionProvider};
use crate::error::{SqlError, SqlResult};
use crate::value::{column_type_for_decl, quote_identifier, read_value, SqlValue};
use dframe::{ColumnSchema, Index, Table, TableBuilder, Value};
use rusqlite::{params_from_iter, Connection};

/// Loads a whole table, optionally restricted to some columns and a row limit.
///
/// Columns declared as integers load into long columns and floating point / numeric columns
/// into double columns, unless they contain nulls. Everything else loads as objects.
pub struct TableLoader<'a, P> {
    provider: &'a P,
    table: String,
    columns: Vec<String>,
    max_rows: Option<usize>,
}

impl<'a, P: ConnectionProvider> TableLoader<'a, P> {
    pub(crate) fn new(provider: &'a P, table: &str) -> Self {
        Self {
            provider,
            table: table.to_string(),
            columns: Vec::new(),
            max_rows: None,
        }
    }

    pub fn include_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn load(&self) -> SqlResult<Table> {
        let sql = self.select_sql();
        self.provider.with_connection(|conn| {
            read_table(conn, self.provider, &sql, &[], self.max_rows)
        })
    }

    fn select_sql(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(&self.table));
        if let Some(max_rows) = self.max_rows {
            sql.push_str(&format!(" LIMIT {max_rows}"));
        }
        sql
    }
}

/// Runs an arbitrary query and collects the result set into a table.
pub struct SqlLoader<'a, P> {
    provider: &'a P,
    sql: String,
    max_rows: Option<usize>,
}

impl<'a, P: ConnectionProvider> SqlLoader<'a, P> {
    pub(crate) fn new(provider: &'a P, sql: String) -> Self {
        Self {
            provider,
            sql,
            max_rows: None,
        }
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn load(&self, params: &[Value]) -> SqlResult<Table> {
        self.provider.with_connection(|conn| {
            read_table(conn, self.provider, &self.sql, params, self.max_rows)
        })
    }
}

pub(crate) fn read_table<P: ConnectionProvider>(
    conn: &Connection,
    provider: &P,
    sql: &str,
    params: &[Value],
    max_rows: Option<usize>,
) -> SqlResult<Table> {
    log_statement(provider.config(), sql, params);

    let mut stmt = conn.prepare(sql).map_err(SqlError::read)?;
    let columns = stmt.columns();
    // Joins commonly repeat column names (`SELECT * FROM a JOIN b ...`).
    let labels = Index::for_labels_renaming_duplicates(columns.iter().map(|c| c.name()));
    let schema: Vec<ColumnSchema> = labels
        .labels()
        .iter()
        .zip(&columns)
        .map(|(label, c)| ColumnSchema::new(label.clone(), column_type_for_decl(c.decl_type())))
        .collect();

    let capacity = max_rows.unwrap_or(0).min(1024);
    let mut builder = TableBuilder::new(&schema, capacity)?;
    let mut rows = stmt
        .query(params_from_iter(params.iter().map(SqlValue)))
        .map_err(SqlError::read)?;

    let mut row_values = Vec::with_capacity(schema.len());
    while let Some(row) = rows.next().map_err(SqlError::read)? {
        if max_rows.is_some_and(|max| builder.len() >= max) {
            break;
        }
        row_values.clear();
        for i in 0..schema.len() {
            row_values.push(read_value(row.get_ref(i).map_err(SqlError::read)?)?);
        }
        builder.append_row(&row_values)?;
    }

    let table = builder.finish()?;
    log::debug!("loaded {} rows x {} columns", table.height(), table.width());
    Ok(table)
}
