//! The filter/aggregate engine.
//!
//! Runs on every filter change: row-filters both tables with the same
//! predicate, then produces three grouped tables. Groups come out ordered by
//! key, as a sorted group-by would produce them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dataset::Dataset;

/// The four filter values driving one recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub ages:   BTreeSet<String>,
  pub topics: BTreeSet<String>,
  /// Inclusive lower bound on `dt`.
  pub start:  NaiveDateTime,
  /// Inclusive upper bound on `dt`.
  pub end:    NaiveDateTime,
}

impl Selection {
  /// The row predicate shared by both tables.
  ///
  /// A `start` after `end` matches nothing.
  pub fn matches(&self, item_topic: &str, age_segment: &str, dt: NaiveDateTime) -> bool {
    self.start <= dt
      && dt <= self.end
      && self.topics.contains(item_topic)
      && self.ages.contains(age_segment)
  }
}

/// Visits summed per (topic, minute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicPoint {
  pub item_topic: String,
  pub dt:         NaiveDateTime,
  pub visits:     u64,
}

/// Visits summed per source topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTotal {
  pub source_topic: String,
  pub visits:       u64,
}

/// Mean unique users per event type ("engagement depth").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMean {
  pub event:        String,
  pub unique_users: f64,
}

/// The three derived tables of one recomputation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
  pub topic_series:  Vec<TopicPoint>,
  pub source_totals: Vec<SourceTotal>,
  /// Ordered by `unique_users`, descending.
  pub event_means:   Vec<EventMean>,
}

impl Dataset {
  /// Filter both tables by `selection` and aggregate.
  ///
  /// An empty selection (no topics or no ages) or an inverted date range
  /// yields empty tables rather than an error.
  pub fn compute(&self, selection: &Selection) -> Aggregates {
    let visits = self
      .visits()
      .iter()
      .filter(|v| selection.matches(&v.item_topic, &v.age_segment, v.dt));

    let mut by_topic_dt: BTreeMap<(&str, NaiveDateTime), u64> = BTreeMap::new();
    let mut by_source: BTreeMap<&str, u64> = BTreeMap::new();
    for v in visits {
      *by_topic_dt.entry((v.item_topic.as_str(), v.dt)).or_default() += v.visits;
      *by_source.entry(v.source_topic.as_str()).or_default() += v.visits;
    }

    let mut by_event: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for e in self
      .engagements()
      .iter()
      .filter(|e| selection.matches(&e.item_topic, &e.age_segment, e.dt))
    {
      let (sum, n) = by_event.entry(e.event.as_str()).or_default();
      *sum += e.unique_users;
      *n += 1;
    }

    let topic_series = by_topic_dt
      .into_iter()
      .map(|((topic, dt), visits)| TopicPoint {
        item_topic: topic.to_owned(),
        dt,
        visits,
      })
      .collect();

    let source_totals = by_source
      .into_iter()
      .map(|(source, visits)| SourceTotal {
        source_topic: source.to_owned(),
        visits,
      })
      .collect();

    let mut event_means: Vec<EventMean> = by_event
      .into_iter()
      .map(|(event, (sum, n))| EventMean {
        event:        event.to_owned(),
        unique_users: sum as f64 / n as f64,
      })
      .collect();
    // Stable: equal means keep key order.
    event_means.sort_by(|a, b| b.unique_users.total_cmp(&a.unique_users));

    Aggregates { topic_series, source_totals, event_means }
  }
}
