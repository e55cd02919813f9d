//! PostgreSQL snapshot source for cardpulse.
//!
//! Opens a single `tokio-postgres` connection, reads both tables once, and
//! lets the connection close when the source is dropped. There is no pool:
//! the dashboard never queries the database after startup.

mod decode;
mod source;

pub mod error;

pub use error::{Error, Result};
pub use source::PostgresSource;
