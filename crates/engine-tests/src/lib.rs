#![allow(dead_code)]

use connectors::{
    memory::MemoryAdapter,
    sql::{base::adapter::SqlAdapter, postgres::adapter::PgAdapter},
};
use engine_core::{
    orchestrator::{SyncRequest, SyncService},
    registry::registry,
};
use std::sync::Arc;

pub mod integration;
pub mod postgres;
pub mod utils;

/// Live Postgres tests read their URL from here and are skipped without it.
const TEST_PG_URL_VAR: &str = "OMEGA_TEST_DATABASE_URL";

/// A sync service over a fresh in-memory store holding every registered table.
fn memory_service(chunk_size: usize) -> (MemoryAdapter, SyncService) {
    let store = MemoryAdapter::with_tables(registry().supported_tables());
    let service = SyncService::new(Arc::new(store.clone()), chunk_size);
    (store, service)
}

fn batch(table: &str, data: Vec<serde_json::Value>, is_first_batch: bool) -> SyncRequest {
    SyncRequest::new(table, data, is_first_batch)
}

async fn pg_adapter() -> Option<Arc<dyn SqlAdapter>> {
    let url = std::env::var(TEST_PG_URL_VAR).ok()?;
    let adapter = PgAdapter::connect(&url).await.expect("connect postgres");
    Some(Arc::new(adapter))
}
