use connectors::{error::AdapterError, sql::base::error::DbError};
use engine_core::error::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to open the store: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Store error: {0}")]
    Database(#[from] DbError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install the log subscriber: {0}")]
    Logging(String),
}
