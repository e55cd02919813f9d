//! [`PostgresSource`] — the PostgreSQL implementation of [`SnapshotSource`].

use cardpulse_core::{
  config::DatabaseConfig,
  record::{Engagement, Visit},
  source::SnapshotSource,
};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use crate::{Error, Result, decode};

/// A single read-only connection to the snapshot database.
pub struct PostgresSource {
  client:          Client,
  connection:      JoinHandle<()>,
  visits_sql:      String,
  engagements_sql: String,
}

impl PostgresSource {
  /// Connect using `config`. Table names are validated before connecting.
  ///
  /// No retries: a refused connection or failed authentication is returned
  /// to the caller, which is expected to abort startup.
  pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
    let visits_sql = config.visits_query()?;
    let engagements_sql = config.engagements_query()?;

    tracing::info!(database = %config.redacted(), "connecting to postgres");

    let mut pg_config = tokio_postgres::Config::new();
    pg_config
      .host(&config.host)
      .port(config.port)
      .user(&config.user)
      .password(&config.password)
      .dbname(&config.name)
      .application_name("cardpulse");

    let (client, connection) = pg_config.connect(NoTls).await?;
    let connection = tokio::spawn(async move {
      if let Err(e) = connection.await {
        tracing::error!("postgres connection error: {e}");
      }
    });

    Ok(Self { client, connection, visits_sql, engagements_sql })
  }
}

impl Drop for PostgresSource {
  fn drop(&mut self) {
    self.connection.abort();
  }
}

// ─── SnapshotSource impl ─────────────────────────────────────────────────────

impl SnapshotSource for PostgresSource {
  type Error = Error;

  async fn load_visits(&self) -> Result<Vec<Visit>> {
    let rows = self.client.query(self.visits_sql.as_str(), &[]).await?;
    tracing::debug!(rows = rows.len(), "read visits from postgres");
    rows.iter().map(decode::visit).collect()
  }

  async fn load_engagements(&self) -> Result<Vec<Engagement>> {
    let rows = self.client.query(self.engagements_sql.as_str(), &[]).await?;
    tracing::debug!(rows = rows.len(), "read engagements from postgres");
    rows.iter().map(decode::engagement).collect()
  }
}
