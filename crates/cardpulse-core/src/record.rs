//! Row types for the two snapshot tables.
//!
//! Both tables are pre-aggregated upstream: one row per combination of their
//! category columns and a timestamp minute, carrying a single count.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One row of the visits table (`dash_visits`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
  pub item_topic:   String,
  pub source_topic: String,
  pub age_segment:  String,
  pub dt:           NaiveDateTime,
  pub visits:       u64,
}

/// One row of the engagements table (`dash_engagements`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
  /// The kind of interaction (view, like, share, ...).
  pub event:        String,
  pub age_segment:  String,
  pub item_topic:   String,
  pub dt:           NaiveDateTime,
  pub unique_users: u64,
}

/// Convert a signed database integer into a count.
///
/// Backends read counts as `i64` whatever the column width; a negative value
/// means the snapshot is corrupt and the load must fail.
pub fn count_from_i64(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::NegativeCount { column, value })
}
