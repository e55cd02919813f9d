//! Error types for `cardpulse-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid table name: {0:?}")]
  InvalidTableName(String),

  #[error("negative count in column {column}: {value}")]
  NegativeCount { column: &'static str, value: i64 },

  #[error("invalid timestamp: {0:?}")]
  InvalidTimestamp(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
