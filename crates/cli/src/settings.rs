use crate::{commands::SettingsArgs, env::EnvManager, error::CliError};
use engine_core::loader::DEFAULT_CHUNK_SIZE;
use std::str::FromStr;

pub const DATABASE_URL: &str = "OMEGA_DATABASE_URL";
pub const HOST: &str = "OMEGA_HOST";
pub const PORT: &str = "OMEGA_PORT";
pub const CHUNK_SIZE: &str = "OMEGA_CHUNK_SIZE";
pub const LOG: &str = "OMEGA_LOG";
pub const MAX_BODY_BYTES: &str = "OMEGA_MAX_BODY_BYTES";

/// Large enough for several default-sized chunks of the widest table.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub chunk_size: usize,
    pub log: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "memory://".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            chunk_size: DEFAULT_CHUNK_SIZE,
            log: "info".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Settings {
    /// Defaults, then `env` (process variables with the env file already
    /// applied), then command-line flags.
    pub fn resolve(env: &EnvManager, args: &SettingsArgs) -> Result<Self, CliError> {
        let mut settings = Settings::default();

        if let Some(url) = env.get(DATABASE_URL) {
            settings.database_url = url.to_string();
        }
        if let Some(host) = env.get(HOST) {
            settings.host = host.to_string();
        }
        if let Some(port) = env.get(PORT) {
            settings.port = parse(PORT, port)?;
        }
        if let Some(chunk_size) = env.get(CHUNK_SIZE) {
            settings.chunk_size = parse(CHUNK_SIZE, chunk_size)?;
        }
        if let Some(log) = env.get(LOG) {
            settings.log = log.to_string();
        }
        if let Some(max_body_bytes) = env.get(MAX_BODY_BYTES) {
            settings.max_body_bytes = parse(MAX_BODY_BYTES, max_body_bytes)?;
        }

        if let Some(url) = &args.database_url {
            settings.database_url = url.clone();
        }
        if let Some(host) = &args.host {
            settings.host = host.clone();
        }
        if let Some(port) = args.port {
            settings.port = port;
        }
        if let Some(chunk_size) = args.chunk_size {
            settings.chunk_size = chunk_size;
        }
        if let Some(log) = &args.log {
            settings.log = log.clone();
        }
        if let Some(max_body_bytes) = args.max_body_bytes {
            settings.max_body_bytes = max_body_bytes;
        }

        if settings.chunk_size == 0 {
            return Err(CliError::Config(format!("{CHUNK_SIZE} must be greater than 0")));
        }
        if settings.max_body_bytes == 0 {
            return Err(CliError::Config(format!(
                "{MAX_BODY_BYTES} must be greater than 0"
            )));
        }

        Ok(settings)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, CliError> {
    raw.parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {key}: {raw:?}")))
}
