use crate::sql::{
    base::{
        adapter::{DatabaseKind, SqlAdapter},
        dialect,
        error::{ConnectorError, DbError},
        query::generator::QueryGenerator,
        transaction::Transaction,
    },
    postgres::{transaction::PgTransaction, utils::PgConnector},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

/// Postgres store.
///
/// Reads share one long-lived client. Every transaction gets a connection of
/// its own, so concurrent loads into different tables never interleave
/// statements on the same session, and a transaction abandoned mid-way is
/// rolled back by the server when its connection closes.
#[derive(Clone)]
pub struct PgAdapter {
    connector: PgConnector,
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

impl PgAdapter {
    pub async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let connector = PgConnector::from_url(url)?;
        let client = Arc::new(RwLock::new(connector.connect().await?));
        Ok(PgAdapter {
            connector,
            client,
            dialect: dialect::Postgres,
        })
    }
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn ping(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        let row = client.query_one("SELECT 1", &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(DbError::Unknown(format!(
                "Postgres ping returned unexpected result: {val}"
            )));
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction, DbError> {
        let client = self.connector.connect().await?;
        client.batch_execute("BEGIN").await?;
        debug!("Opened Postgres transaction on a dedicated connection");
        Ok(Transaction::PgTransaction(PgTransaction::new(client)))
    }

    async fn count_rows(&self, table: &str) -> Result<i64, DbError> {
        let sql = QueryGenerator::new(&self.dialect).count(table);
        let client = self.client.read().await;
        let row = client.query_one(&sql, &[]).await?;
        Ok(row.try_get(0)?)
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}
