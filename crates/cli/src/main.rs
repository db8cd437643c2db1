use crate::{
    commands::{Commands, SettingsArgs},
    env::EnvManager,
    error::CliError,
    settings::Settings,
    shutdown::ShutdownCoordinator,
};
use clap::Parser;
use engine_core::{orchestrator::SyncService, registry::registry};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod conn;
mod env;
mod error;
mod settings;
mod shutdown;

#[derive(Parser)]
#[command(name = "omega-sync", version, about = "Bulk table sync service")]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut env = EnvManager::from_process();
    if let Some(path) = &cli.settings.env_file {
        env.load_from_file(path)?;
    } else if std::path::Path::new(".env").is_file() {
        env.load_from_file(".env")?;
    }
    let settings = Settings::resolve(&env, &cli.settings)?;

    init_logging(&settings.log)?;

    match cli.command {
        Commands::Serve => {
            let store = conn::open_store(&settings.database_url).await?;
            let service = SyncService::new(store, settings.chunk_size);

            let shutdown = ShutdownCoordinator::new(CancellationToken::new());
            shutdown.register_handlers();

            api::server::serve(&settings, service, shutdown.clone()).await?;

            if shutdown.is_shutdown_requested() {
                info!("Shutdown complete");
            }
        }
        Commands::Status => {
            let store = conn::open_store(&settings.database_url).await?;
            let service = SyncService::new(store, settings.chunk_size);
            print_json(&service.status().await?)?;
        }
        Commands::Tables => {
            let tables: Vec<_> = registry().iter().collect();
            print_json(&tables)?;
        }
        Commands::TestConn => {
            let kind = conn::ping(&settings.database_url).await?;
            println!("Connection OK ({kind:?})");
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| CliError::Config(format!("Invalid log filter {level:?}: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
