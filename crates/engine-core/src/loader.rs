use crate::registry::TableDescriptor;
use connectors::sql::base::{adapter::SqlAdapter, error::DbError, transaction::Transaction};
use model::records::row::RowData;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// How a table was emptied before a first batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// TRUNCATE succeeded; the number of removed rows is not known.
    Truncated,
    /// TRUNCATE was refused and DELETE removed exactly this many rows.
    Deleted(u64),
}

/// Serialized as `true` for a truncate and as the row count for a delete.
impl Serialize for ClearOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClearOutcome::Truncated => serializer.serialize_bool(true),
            ClearOutcome::Deleted(count) => serializer.serialize_u64(*count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// `None` when the batch was appended without clearing.
    pub cleared: Option<ClearOutcome>,
    pub inserted: u64,
    pub chunks: usize,
}

/// Writes validated batches, one transaction per call.
#[derive(Clone)]
pub struct BatchLoader {
    adapter: Arc<dyn SqlAdapter>,
    chunk_size: usize,
}

impl BatchLoader {
    pub fn new(adapter: Arc<dyn SqlAdapter>, chunk_size: usize) -> Self {
        Self {
            adapter,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Clears the table when `is_first_batch` is set, then inserts `rows` in
    /// chunks. The clear and every chunk commit together or not at all.
    pub async fn load(
        &self,
        descriptor: &TableDescriptor,
        rows: &[RowData],
        is_first_batch: bool,
    ) -> Result<LoadReport, DbError> {
        let mut tx = self.adapter.begin().await?;
        let result = self.write(&mut tx, descriptor, rows, is_first_batch).await;
        finish(tx, descriptor.name, result).await
    }

    /// Empties the table in its own transaction.
    pub async fn clear(&self, descriptor: &TableDescriptor) -> Result<ClearOutcome, DbError> {
        let mut tx = self.adapter.begin().await?;
        let result = clear_table(&mut tx, descriptor.name).await;
        finish(tx, descriptor.name, result).await
    }

    async fn write(
        &self,
        tx: &mut Transaction,
        descriptor: &TableDescriptor,
        rows: &[RowData],
        is_first_batch: bool,
    ) -> Result<LoadReport, DbError> {
        let table = descriptor.name;

        let cleared = if is_first_batch {
            let outcome = clear_table(tx, table).await?;
            info!(table, "Cleared table (first batch)");
            Some(outcome)
        } else {
            info!(table, "Appending to table (subsequent batch)");
            None
        };

        let columns = descriptor.columns();
        let mut inserted = 0u64;
        let mut chunks = 0usize;

        for (index, chunk) in rows.chunks(self.chunk_size).enumerate() {
            inserted += tx.insert_rows(table, &columns, chunk).await?;
            chunks += 1;

            if index % 2 == 0 {
                info!(table, inserted, total = rows.len(), "Inserted chunk");
            }
        }

        Ok(LoadReport {
            cleared,
            inserted,
            chunks,
        })
    }
}

async fn clear_table(tx: &mut Transaction, table: &str) -> Result<ClearOutcome, DbError> {
    match tx.truncate(table).await {
        Ok(()) => {
            info!(table, "Truncated table");
            Ok(ClearOutcome::Truncated)
        }
        Err(error) => {
            warn!(table, %error, "TRUNCATE failed, falling back to DELETE");
            let deleted = tx.delete_all(table).await?;
            info!(table, deleted, "Deleted all rows");
            Ok(ClearOutcome::Deleted(deleted))
        }
    }
}

async fn finish<T>(tx: Transaction, table: &str, result: Result<T, DbError>) -> Result<T, DbError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(table, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
