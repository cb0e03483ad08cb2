use crate::config::{ConnectorConfig, TxIsolation};
use crate::connector::{ConnectionProvider, SqlConnector};
use crate::error::{SqlError, SqlResult};
use rusqlite::Connection;

/// A unit of work on a single transaction.
///
/// ```no_run
/// use dframe_sql::{ConnectionProvider, ConnectorConfig, SqlConnector, Tx};
///
/// # fn main() -> dframe_sql::SqlResult<()> {
/// let connector = SqlConnector::open(ConnectorConfig::default())?;
/// let copied = Tx::new(&connector).run(|tx| {
///     let data = tx.table_loader("src").load()?;
///     tx.table_saver("dst").delete_table_data().save(&data)
/// })?;
/// # Ok(())
/// # }
/// ```
///
/// The unit must do all its work through the [`TxConnector`] it receives; using the outer
/// connector from inside the unit blocks forever.
pub struct Tx<'a> {
    connector: &'a SqlConnector,
    isolation: TxIsolation,
}

impl<'a> Tx<'a> {
    pub fn new(connector: &'a SqlConnector) -> Self {
        Self {
            connector,
            isolation: connector.config().isolation,
        }
    }

    pub fn isolation(mut self, isolation: TxIsolation) -> Self {
        self.isolation = isolation;
        self
    }

    /// Commits when `unit` succeeds. Any error rolls back everything the unit did and is
    /// returned as is.
    pub fn run<R, F>(&self, unit: F) -> SqlResult<R>
    where
        F: FnOnce(&TxConnector<'_>) -> SqlResult<R>,
    {
        let mut conn = self.connector.lock();
        set_isolation(&conn, self.isolation)?;

        let result = (|| {
            let tx = conn.transaction().map_err(SqlError::write)?;
            let tx_connector = TxConnector {
                conn: &tx,
                config: self.connector.config(),
            };
            match unit(&tx_connector) {
                Ok(out) => {
                    tx.commit().map_err(SqlError::write)?;
                    Ok(out)
                }
                Err(err) => {
                    log::warn!("transaction rolled back: {err}");
                    tx.rollback().map_err(SqlError::write)?;
                    Err(err)
                }
            }
        })();

        if self.isolation != TxIsolation::Serializable {
            set_isolation(&conn, TxIsolation::Serializable)?;
        }
        result
    }
}

fn set_isolation(conn: &Connection, isolation: TxIsolation) -> SqlResult<()> {
    let read_uncommitted = isolation == TxIsolation::ReadUncommitted;
    conn.pragma_update(None, "read_uncommitted", read_uncommitted)
        .map_err(SqlError::write)
}

/// Connection bound to a running [`Tx`].
pub struct TxConnector<'t> {
    conn: &'t Connection,
    config: &'t ConnectorConfig,
}

impl ConnectionProvider for TxConnector<'_> {
    fn config(&self) -> &ConnectorConfig {
        self.config
    }

    fn with_connection<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>,
    {
        f(self.conn)
    }

    fn with_transaction<R, F>(&self, f: F) -> SqlResult<R>
    where
        F: FnOnce(&Connection) -> SqlResult<R>,
    {
        f(self.conn)
    }
}
