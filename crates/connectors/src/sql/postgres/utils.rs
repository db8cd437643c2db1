use crate::sql::base::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{debug, error, warn};

/// Reported in `pg_stat_activity` unless the URL names its own.
pub(crate) const APPLICATION_NAME: &str = "omega-sync";

/// Parsed connection settings plus a TLS connector, built once per store and
/// reused for every connection a transaction opens.
#[derive(Clone)]
pub(crate) struct PgConnector {
    config: Config,
    tls: Option<MakeTlsConnector>,
}

impl PgConnector {
    pub(crate) fn from_url(url: &str) -> Result<Self, ConnectorError> {
        let mut config = url
            .parse::<Config>()
            .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
        if config.get_application_name().is_none() {
            config.application_name(APPLICATION_NAME);
        }

        let tls = match config.get_ssl_mode() {
            SslMode::Disable => None,
            _ => Some(MakeTlsConnector::new(TlsConnector::builder().build()?)),
        };

        Ok(Self { config, tls })
    }

    /// Opens a new session. With `sslmode=prefer` a failed handshake is
    /// retried in plain text.
    pub(crate) async fn connect(&self) -> Result<Client, ConnectorError> {
        let Some(tls) = &self.tls else {
            return self.connect_plain().await;
        };

        match self.config.connect(tls.clone()).await {
            Ok((client, connection)) => {
                tokio::spawn(async move {
                    if let Err(err) = connection.await {
                        error!(%err, "Postgres connection error");
                    }
                });
                debug!("Opened Postgres session over TLS");
                Ok(client)
            }
            Err(err) if self.config.get_ssl_mode() == SslMode::Prefer => {
                warn!(%err, "Postgres TLS handshake failed, retrying without TLS");
                self.connect_plain().await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn connect_plain(&self) -> Result<Client, ConnectorError> {
        let (client, connection) = self.config.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(%err, "Postgres connection error");
            }
        });
        debug!("Opened Postgres session without TLS");
        Ok(client)
    }
}
