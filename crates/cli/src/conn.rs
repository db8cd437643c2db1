use crate::error::CliError;
use connectors::{
    adapter::Adapter,
    sql::base::adapter::{DatabaseKind, SqlAdapter},
};
use engine_core::registry::registry;
use std::sync::Arc;
use tracing::{error, info};

/// Opens the store at `url`. An in-memory store gets every registered table
/// created up front.
pub async fn open_store(url: &str) -> Result<Arc<dyn SqlAdapter>, CliError> {
    let adapter = Adapter::connect(url).await.map_err(|e| {
        error!("Connection to the store failed: {e}");
        CliError::Adapter(e)
    })?;

    if let Adapter::Memory(memory) = &adapter {
        for table in registry().supported_tables() {
            memory.create_table(&table).await;
        }
    }

    Ok(adapter.get_sql())
}

/// Opens the store and runs a trivial query against it.
pub async fn ping(url: &str) -> Result<DatabaseKind, CliError> {
    info!("Pinging store");
    let store = open_store(url).await?;

    store.ping().await.map_err(|e| {
        error!("Store ping failed: {e}");
        CliError::Database(e)
    })?;

    let kind = store.kind();
    info!(?kind, "Store ping succeeded");
    Ok(kind)
}
