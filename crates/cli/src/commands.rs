use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP sync service
    Serve,
    /// Print row counts, session state and counters as JSON
    Status,
    /// List the registered tables and their field rules as JSON
    Tables,
    /// Check that the configured store is reachable
    TestConn,
}

/// Flags that override the environment and the `.env` file.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    #[arg(long, global = true, help = "Path to a KEY=VALUE env file")]
    pub env_file: Option<String>,

    #[arg(long, global = true, help = "Store URL (postgres://... or memory://)")]
    pub database_url: Option<String>,

    #[arg(long, global = true, help = "Address to bind the HTTP service to")]
    pub host: Option<String>,

    #[arg(long, global = true, help = "Port to bind the HTTP service to")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Records per INSERT statement")]
    pub chunk_size: Option<usize>,

    #[arg(long, global = true, help = "Largest accepted request body, in bytes")]
    pub max_body_bytes: Option<usize>,

    #[arg(long, global = true, help = "Log filter, e.g. info or omega=debug")]
    pub log: Option<String>,
}
