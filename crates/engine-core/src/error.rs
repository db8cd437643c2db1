use crate::validator::ValidationError;
use connectors::sql::base::error::DbError;
use serde::Serialize;
use thiserror::Error;

/// Diagnostics returned when a batch is rejected.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// The first few errors, in record order.
    pub validation_errors: Vec<ValidationError>,
    pub total_errors: usize,
    /// The first few input records as received.
    pub sample_data: Vec<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Table {table} is not supported. Supported tables: {supported:?}")]
    UnsupportedTable {
        table: String,
        supported: Vec<String>,
    },

    #[error("{0}")]
    MalformedRequest(String),

    /// Nothing was written.
    #[error("Data validation failed")]
    ValidationFailed(ValidationReport),

    /// The load transaction was rolled back.
    #[error("{0}")]
    Storage(#[from] DbError),

    #[error("{0}")]
    Internal(String),
}
