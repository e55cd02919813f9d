//! SQLite snapshot source for cardpulse.
//!
//! Wraps [`tokio_rusqlite`] so the one-off table reads run on a dedicated
//! thread without blocking the async runtime. Intended for local development
//! and tests; production dashboards read from Postgres.

mod decode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteSource;

#[cfg(test)]
mod tests;
