//! Error type for `cardpulse-store-postgres`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cardpulse_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_postgres::Error),

  #[error("column {0:?} not found")]
  MissingColumn(&'static str),

  #[error("column {column:?} has unsupported type {ty}")]
  UnsupportedType { column: &'static str, ty: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
