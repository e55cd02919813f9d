//! [`SqliteSource`] — the SQLite implementation of [`SnapshotSource`].

use std::path::Path;

use cardpulse_core::{
  config::{DatabaseConfig, select_all},
  record::{Engagement, Visit},
  source::SnapshotSource,
};
use rusqlite::OpenFlags;

use crate::{
  Error,
  Result,
  decode::{RawEngagement, RawVisit},
};

/// A snapshot source backed by a single SQLite file, opened read-only.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSource {
  conn:            tokio_rusqlite::Connection,
  visits_sql:      String,
  engagements_sql: String,
}

impl SqliteSource {
  /// Open an existing database at `path` with the default table names.
  ///
  /// A missing file is an error; the source never creates one.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .await?;
    Self::with_connection(conn, "dash_visits", "dash_engagements")
  }

  /// Open the database named by `config` (`name` is the file path) and read
  /// the configured tables.
  pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
    let source = Self::open(&config.name).await?;
    source.with_tables(&config.visits_table, &config.engagements_table)
  }

  /// Open a writable in-memory database; the caller creates the tables.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::with_connection(conn, "dash_visits", "dash_engagements")
  }

  /// Read from differently named tables.
  pub fn with_tables(self, visits: &str, engagements: &str) -> Result<Self> {
    Self::with_connection(self.conn, visits, engagements)
  }

  fn with_connection(
    conn: tokio_rusqlite::Connection,
    visits: &str,
    engagements: &str,
  ) -> Result<Self> {
    Ok(Self {
      conn,
      visits_sql: select_all(visits)?,
      engagements_sql: select_all(engagements)?,
    })
  }

  /// Run raw SQL against the connection; used to seed in-memory databases.
  pub async fn execute_batch(&self, sql: &str) -> Result<()> {
    let sql = sql.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SnapshotSource impl ─────────────────────────────────────────────────────

impl SnapshotSource for SqliteSource {
  type Error = Error;

  async fn load_visits(&self) -> Result<Vec<Visit>> {
    let sql = self.visits_sql.clone();
    let raw: Vec<RawVisit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawVisit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(rows = raw.len(), "read visits from sqlite");
    raw.into_iter().map(RawVisit::decode).collect()
  }

  async fn load_engagements(&self) -> Result<Vec<Engagement>> {
    let sql = self.engagements_sql.clone();
    let raw: Vec<RawEngagement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawEngagement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(rows = raw.len(), "read engagements from sqlite");
    raw.into_iter().map(RawEngagement::decode).collect()
  }
}
