use std::path::PathBuf;

/// Where [`SqlConnector::open`](crate::SqlConnector::open) connects to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Private in-memory database, discarded when the connector is dropped.
    #[default]
    InMemory,
    Path(PathBuf),
    /// SQLite URI filename, e.g. `file:db?mode=memory&cache=shared`.
    Uri(String),
}

/// Isolation requested by a [`Tx`](crate::Tx).
///
/// SQLite transactions are serializable. `ReadUncommitted` only relaxes reads of tables
/// shared with other connections through a shared cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxIsolation {
    #[default]
    Serializable,
    ReadUncommitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub data_source: DataSource,
    /// Logs every executed statement at `debug` level under the `dframe_sql::sql` target.
    pub log_sql: bool,
    pub isolation: TxIsolation,
    /// Batch updates reuse one prepared statement for all rows when set; otherwise every row
    /// is executed as its own statement.
    pub supports_batch_updates: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::InMemory,
            log_sql: false,
            isolation: TxIsolation::Serializable,
            supports_batch_updates: true,
        }
    }
}

impl ConnectorConfig {
    pub fn for_source(data_source: DataSource) -> Self {
        Self {
            data_source,
            ..Self::default()
        }
    }
}
