use crate::sql::base::{dialect, error::DbError, query::generator::QueryGenerator};
use model::records::row::RowData;
use tokio_postgres::Client;
use tracing::debug;

const TRUNCATE_SAVEPOINT: &str = "omega_truncate";

/// An open `BEGIN` on a connection owned by this value.
pub struct PgTransaction {
    client: Client,
    dialect: dialect::Postgres,
}

impl PgTransaction {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            dialect: dialect::Postgres,
        }
    }

    /// A rejected TRUNCATE would abort the whole transaction; the savepoint
    /// keeps it usable so the caller can fall back to DELETE.
    pub async fn truncate(&mut self, table: &str) -> Result<(), DbError> {
        let sql = QueryGenerator::new(&self.dialect).truncate(table);
        self.client
            .batch_execute(&format!("SAVEPOINT {TRUNCATE_SAVEPOINT}"))
            .await?;

        match self.client.batch_execute(&sql).await {
            Ok(()) => {
                self.client
                    .batch_execute(&format!("RELEASE SAVEPOINT {TRUNCATE_SAVEPOINT}"))
                    .await?;
                Ok(())
            }
            Err(err) => {
                self.client
                    .batch_execute(&format!("ROLLBACK TO SAVEPOINT {TRUNCATE_SAVEPOINT}"))
                    .await?;
                Err(err.into())
            }
        }
    }

    pub async fn delete_all(&mut self, table: &str) -> Result<u64, DbError> {
        let sql = QueryGenerator::new(&self.dialect).delete_all(table);
        Ok(self.client.execute(&sql, &[]).await?)
    }

    pub async fn insert_rows(
        &mut self,
        table: &str,
        columns: &[&str],
        rows: &[RowData],
    ) -> Result<u64, DbError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = QueryGenerator::new(&self.dialect).insert_batch(table, columns, rows);
        debug!(table, rows = rows.len(), bytes = sql.len(), "Executing multi-row INSERT");
        Ok(self.client.execute(&sql, &[]).await?)
    }

    pub async fn commit(self) -> Result<(), DbError> {
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), DbError> {
        self.client.batch_execute("ROLLBACK").await?;
        Ok(())
    }
}
