//! SQLite persistence for `dframe` tables.
//!
//! Exposes:
//! - Whole-table and query loaders producing typed tables
//! - A table saver inserting all rows in one transaction
//! - Parameterized statements with single-row or batch parameters
//! - Transactional units of work with rollback on error

mod config;
mod connector;
mod error;
mod loader;
mod saver;
mod statement;
mod tx;
mod value;

pub use config::{ConnectorConfig, DataSource, TxIsolation};
pub use connector::{ConnectionProvider, SqlConnector};
pub use error::{SqlError, SqlResult};
pub use loader::{SqlLoader, TableLoader};
pub use saver::TableSaver;
pub use statement::StatementBuilder;
pub use tx::{Tx, TxConnector};
pub use value::SqlValue;
