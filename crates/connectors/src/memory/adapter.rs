use crate::{
    memory::transaction::MemoryTransaction,
    sql::base::{
        adapter::{DatabaseKind, SqlAdapter},
        error::DbError,
        transaction::Transaction,
    },
};
use async_trait::async_trait;
use model::records::row::RowData;
use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) tables: BTreeMap<String, Vec<RowData>>,
    pub(crate) truncate_rejected: HashSet<String>,
    pub(crate) insert_rejected: HashSet<String>,
}

/// A transactional store held in process memory.
///
/// Transactions take the store-wide lock for their whole lifetime and work on
/// a staged copy of the tables, which replaces the live copy on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = MemoryState {
            tables: tables
                .into_iter()
                .map(|name| (name.into(), Vec::new()))
                .collect(),
            ..Default::default()
        };
        MemoryAdapter {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn create_table(&self, table: &str) {
        let mut state = self.state.lock().await;
        state.tables.entry(table.to_string()).or_default();
    }

    /// Committed rows of `table`, in insertion order.
    pub async fn rows(&self, table: &str) -> Option<Vec<RowData>> {
        self.state.lock().await.tables.get(table).cloned()
    }

    /// Makes TRUNCATE fail for `table`, the way a store does when other
    /// tables hold foreign keys into it.
    pub async fn reject_truncate(&self, table: &str) {
        self.state
            .lock()
            .await
            .truncate_rejected
            .insert(table.to_string());
    }

    /// Makes every INSERT into `table` fail.
    pub async fn reject_inserts(&self, table: &str) {
        self.state
            .lock()
            .await
            .insert_rejected
            .insert(table.to_string());
    }
}

#[async_trait]
impl SqlAdapter for MemoryAdapter {
    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction, DbError> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Transaction::MemoryTransaction(MemoryTransaction::new(guard)))
    }

    async fn count_rows(&self, table: &str) -> Result<i64, DbError> {
        let state = self.state.lock().await;
        state
            .tables
            .get(table)
            .map(|rows| rows.len() as i64)
            .ok_or_else(|| DbError::UnknownTable(table.to_string()))
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Memory
    }
}
