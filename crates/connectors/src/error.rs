use crate::sql::base::error::ConnectorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The connection URL names a backend this build does not provide.
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Failed to initialize a data connector/adapter.
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}
