//! [`Dataset`] — the immutable, process-lifetime snapshot of both tables.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
  engine::Selection,
  record::{Engagement, Visit},
  source::SnapshotSource,
  time::round_to_minute,
};

/// Both snapshot tables, with every `dt` rounded to the minute.
///
/// Built once at startup and shared read-only (typically behind an `Arc`);
/// nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
  visits:      Vec<Visit>,
  engagements: Vec<Engagement>,
}

/// Distinct values used to populate the filter controls.
///
/// Values keep the order of their first appearance in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
  /// Distinct `item_topic` values of the visits table.
  pub topics:       Vec<String>,
  /// Distinct `age_segment` values of the engagements table.
  pub age_segments: Vec<String>,
  /// Earliest visit timestamp; `None` when there are no visits.
  pub start:        Option<NaiveDateTime>,
  /// Latest visit timestamp; `None` when there are no visits.
  pub end:          Option<NaiveDateTime>,
}

impl Dataset {
  /// Build a dataset from rows already in memory, normalising `dt`.
  pub fn new(mut visits: Vec<Visit>, mut engagements: Vec<Engagement>) -> Self {
    for v in &mut visits {
      v.dt = round_to_minute(v.dt);
    }
    for e in &mut engagements {
      e.dt = round_to_minute(e.dt);
    }
    Self { visits, engagements }
  }

  /// Read both tables from `source`. Any failure aborts the whole load.
  pub async fn load<S: SnapshotSource>(source: &S) -> Result<Self, S::Error> {
    let engagements = source.load_engagements().await?;
    let visits = source.load_visits().await?;
    Ok(Self::new(visits, engagements))
  }

  pub fn visits(&self) -> &[Visit] { &self.visits }

  pub fn engagements(&self) -> &[Engagement] { &self.engagements }

  /// Enumerate distinct values for the topic/age filters and the observed
  /// date range.
  pub fn filter_options(&self) -> FilterOptions {
    FilterOptions {
      topics:       distinct(self.visits.iter().map(|v| v.item_topic.as_str())),
      age_segments: distinct(self.engagements.iter().map(|e| e.age_segment.as_str())),
      start:        self.visits.iter().map(|v| v.dt).min(),
      end:          self.visits.iter().map(|v| v.dt).max(),
    }
  }
}

impl FilterOptions {
  /// The default filter state: everything selected over the full range.
  ///
  /// `None` when the visits table is empty and there is no range to select.
  pub fn default_selection(&self) -> Option<Selection> {
    Some(Selection {
      ages:   self.age_segments.iter().cloned().collect(),
      topics: self.topics.iter().cloned().collect(),
      start:  self.start?,
      end:    self.end?,
    })
  }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  let mut seen = HashSet::new();
  values
    .filter(|v| seen.insert(*v))
    .map(str::to_owned)
    .collect()
}
