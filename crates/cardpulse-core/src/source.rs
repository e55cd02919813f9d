//! The [`SnapshotSource`] trait.
//!
//! Implemented by database backends (`cardpulse-store-postgres`,
//! `cardpulse-store-sqlite`). The dashboard depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::record::{Engagement, Visit};

/// A read-only source of the two snapshot tables.
///
/// Each method returns every row of its table exactly as stored; timestamp
/// normalisation is applied by [`Dataset`](crate::Dataset). All methods return
/// `Send` futures so sources can be driven from a multi-threaded runtime.
pub trait SnapshotSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read all rows of the visits table.
  fn load_visits(
    &self,
  ) -> impl Future<Output = Result<Vec<Visit>, Self::Error>> + Send + '_;

  /// Read all rows of the engagements table.
  fn load_engagements(
    &self,
  ) -> impl Future<Output = Result<Vec<Engagement>, Self::Error>> + Send + '_;
}
