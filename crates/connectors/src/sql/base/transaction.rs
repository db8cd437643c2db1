use crate::{
    memory::MemoryTransaction, sql::base::error::DbError,
    sql::postgres::transaction::PgTransaction,
};
use model::records::row::RowData;

pub enum Transaction {
    PgTransaction(PgTransaction),
    MemoryTransaction(MemoryTransaction),
}

impl Transaction {
    pub async fn truncate(&mut self, table: &str) -> Result<(), DbError> {
        match self {
            Transaction::PgTransaction(tx) => tx.truncate(table).await,
            Transaction::MemoryTransaction(tx) => tx.truncate(table),
        }
    }

    /// Deletes every row of `table`, returning how many were removed.
    pub async fn delete_all(&mut self, table: &str) -> Result<u64, DbError> {
        match self {
            Transaction::PgTransaction(tx) => tx.delete_all(table).await,
            Transaction::MemoryTransaction(tx) => tx.delete_all(table),
        }
    }

    /// Writes `rows` as one multi-row insert over `columns`.
    pub async fn insert_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        rows: &[RowData],
    ) -> Result<u64, DbError> {
        match self {
            Transaction::PgTransaction(tx) => tx.insert_rows(table, columns, rows).await,
            Transaction::MemoryTransaction(tx) => tx.insert_rows(table, columns, rows),
        }
    }

    pub async fn commit(self) -> Result<(), DbError> {
        match self {
            Transaction::PgTransaction(tx) => tx.commit().await,
            Transaction::MemoryTransaction(tx) => {
                tx.commit();
                Ok(())
            }
        }
    }

    pub async fn rollback(self) -> Result<(), DbError> {
        match self {
            Transaction::PgTransaction(tx) => tx.rollback().await,
            Transaction::MemoryTransaction(tx) => {
                tx.rollback();
                Ok(())
            }
        }
    }
}
