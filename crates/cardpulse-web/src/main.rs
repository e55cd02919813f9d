//! cardpulse dashboard server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus
//! `CARDPULSE_*` environment overrides, loads the snapshot tables once, and
//! serves the dashboard over HTTP. A failed load aborts startup.
//!
//! ```
//! CARDPULSE_DATABASE__PASSWORD=secret cargo run -p cardpulse-web --bin server -- --debug
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use cardpulse_core::{Dataset, config::DatabaseConfig};
use cardpulse_store_postgres::PostgresSource;
use cardpulse_store_sqlite::SqliteSource;
use cardpulse_web::{AppState, Backend, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "cardpulse dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Debug mode: verbose logging and client-side round-trip logging.
  #[arg(long)]
  debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration.
  let mut server_cfg = ServerConfig::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {}", cli.config.display())
  })?;
  server_cfg.debug |= cli.debug;

  // Initialise tracing.
  let default_level = if server_cfg.debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let dataset = load_dataset(&server_cfg.database).await?;
  tracing::info!(
    visits = dataset.visits().len(),
    engagements = dataset.engagements().len(),
    "snapshot loaded"
  );

  let state = AppState::new(&server_cfg, dataset).context("failed to build dashboard")?;
  let app = cardpulse_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read both snapshot tables from the configured database.
async fn load_dataset(db: &DatabaseConfig) -> anyhow::Result<Dataset> {
  match Backend::from_scheme(&db.scheme)? {
    Backend::Postgres => {
      let source = PostgresSource::connect(db)
        .await
        .with_context(|| format!("failed to connect to {}", db.redacted()))?;
      Dataset::load(&source)
        .await
        .context("failed to load snapshot tables")
    }
    Backend::Sqlite => {
      let source = SqliteSource::from_config(db)
        .await
        .with_context(|| format!("failed to open sqlite database {:?}", db.name))?;
      Dataset::load(&source)
        .await
        .context("failed to load snapshot tables")
    }
  }
}
