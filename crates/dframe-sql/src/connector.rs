use crate::config::{ConnectorConfig, DataSource};
use crate::error::{SqlError, SqlResult};
use crate::loader::{SqlLoader, TableLoader};
use crate::saver::TableSaver;
use crate::statement::StatementBuilder;
use rusqlite::{Connection, OpenFlags};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub(crate) const SQL_LOG_TARGET: &str = "dframe_sql::sql";

/// Source of a live SQLite connection for loaders, savers and statements.
///
/// Implemented by [`SqlConnector`] (one short unit of work per call) and by
/// [`TxConnector`](crate::TxConnector) (everything runs on the enclosing transaction).
pub trait ConnectionProvider: Sized {
    fn config(&self) -> &ConnectorConfig;

    fn with_connection<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>;

    /// Runs `f` atomically: either everything it wrote is committed or nothing is.
    fn with_transaction<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>;

    fn sql(&self, sql: impl Into<String>) -> StatementBuilder<'_, Self> {
        StatementBuilder::new(self, sql.into())
    }

    fn table_loader(&self, table: &str) -> TableLoader<'_, Self> {
        TableLoader::new(self, table)
    }

    fn sql_loader(&self, sql: impl Into<String>) -> SqlLoader<'_, Self> {
        SqlLoader::new(self, sql.into())
    }

    fn table_saver(&self, table: &str) -> TableSaver<'_, Self> {
        TableSaver::new(self, table)
    }
}

/// Table-level access to a SQLite database.
///
/// Cloning is cheap; clones share the same connection.
#[derive(Debug, Clone)]
pub struct SqlConnector {
    conn: Arc<Mutex<Connection>>,
    config: Arc<ConnectorConfig>,
}

impl SqlConnector {
    pub fn open(config: ConnectorConfig) -> SqlResult<Self> {
        let conn = match &config.data_source {
            DataSource::InMemory => Connection::open_in_memory(),
            DataSource::Path(path) => Connection::open(path),
            DataSource::Uri(uri) => {
                let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI;
                Connection::open_with_flags(uri, flags)
            }
        }
        .map_err(SqlError::open)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(SqlError::open)?;

        log::debug!("opened connector for {:?}", config.data_source);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("connection mutex poisoned; recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl ConnectionProvider for SqlConnector {
    fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn with_connection<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>,
    {
        let conn = self.lock();
        f(&*conn)
    }

    fn with_transaction<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>,
    {
        let mut conn = self.lock();
        let tx = conn.transaction().map_err(SqlError::write)?;
        match f(&*tx) {
            Ok(out) => {
                tx.commit().map_err(SqlError::write)?;
                Ok(out)
            }
            Err(err) => {
                log::warn!("rolling back after error: {err}");
                tx.rollback().map_err(SqlError::write)?;
                Err(err)
            }
        }
    }
}

/// Logs a statement when SQL logging is enabled. Parameters only appear at trace level.
pub(crate) fn log_statement(config: &ConnectorConfig, sql: &str, params: &[dframe::Value]) {
    if !config.log_sql {
        return;
    }
    log::debug!(target: SQL_LOG_TARGET, "{sql}");
    if !params.is_empty() {
        log::trace!(target: SQL_LOG_TARGET, "params: {params:?}");
    }
}
