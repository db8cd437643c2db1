use crate::sql::base::{error::DbError, transaction::Transaction};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgres,
    Memory,
}

/// The store operations the sync pipeline needs.
#[async_trait]
pub trait SqlAdapter: Send + Sync {
    async fn ping(&self) -> Result<(), DbError>;

    /// Opens a transaction. Nothing written through it is visible to other
    /// sessions until `commit`; dropping it without committing discards it.
    async fn begin(&self) -> Result<Transaction, DbError>;

    async fn count_rows(&self, table: &str) -> Result<i64, DbError>;

    fn kind(&self) -> DatabaseKind;
}
