use crate::{
    error::AdapterError,
    memory::MemoryAdapter,
    sql::{base::adapter::SqlAdapter, postgres::adapter::PgAdapter},
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub enum Adapter {
    Postgres(PgAdapter),
    Memory(MemoryAdapter),
}

impl Adapter {
    /// Connects to the store named by `url`, choosing the backend by scheme.
    pub async fn connect(url: &str) -> Result<Self, AdapterError> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme).unwrap_or("");
        match scheme.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => {
                let adapter = PgAdapter::connect(url).await?;
                info!("Connected to Postgres store");
                Ok(Adapter::Postgres(adapter))
            }
            "memory" => {
                info!("Using in-memory store; data is lost on exit");
                Ok(Adapter::Memory(MemoryAdapter::new()))
            }
            other => Err(AdapterError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn get_sql(&self) -> Arc<dyn SqlAdapter> {
        match self {
            Adapter::Postgres(adapter) => Arc::new(adapter.clone()),
            Adapter::Memory(adapter) => Arc::new(adapter.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::base::adapter::DatabaseKind;

    #[tokio::test]
    async fn test_memory_scheme_selects_memory_backend() {
        let adapter = Adapter::connect("memory://").await.unwrap();
        assert_eq!(adapter.get_sql().kind(), DatabaseKind::Memory);
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_rejected() {
        let result = Adapter::connect("mysql://localhost/omega").await;
        assert!(matches!(result, Err(AdapterError::UnsupportedScheme(s)) if s == "mysql"));
    }
}
