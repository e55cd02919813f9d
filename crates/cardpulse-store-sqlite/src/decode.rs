//! Raw rows as read from SQLite, and their conversion into core records.
//!
//! Rows are read into plain strings and integers inside the connection
//! thread; parsing happens afterwards so failures surface as
//! [`cardpulse_core::Error`] rather than as driver errors.

use cardpulse_core::{
  record::{Engagement, Visit, count_from_i64},
  time::parse_timestamp,
};

use crate::Result;

pub struct RawVisit {
  pub item_topic:   String,
  pub source_topic: String,
  pub age_segment:  String,
  pub dt:           String,
  pub visits:       i64,
}

pub struct RawEngagement {
  pub event:        String,
  pub age_segment:  String,
  pub item_topic:   String,
  pub dt:           String,
  pub unique_users: i64,
}

impl RawVisit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_topic:   row.get("item_topic")?,
      source_topic: row.get("source_topic")?,
      age_segment:  row.get("age_segment")?,
      dt:           row.get("dt")?,
      visits:       row.get("visits")?,
    })
  }

  pub fn decode(self) -> Result<Visit> {
    Ok(Visit {
      item_topic:   self.item_topic,
      source_topic: self.source_topic,
      age_segment:  self.age_segment,
      dt:           parse_timestamp(&self.dt)?,
      visits:       count_from_i64("visits", self.visits)?,
    })
  }
}

impl RawEngagement {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event:        row.get("event")?,
      age_segment:  row.get("age_segment")?,
      item_topic:   row.get("item_topic")?,
      dt:           row.get("dt")?,
      unique_users: row.get("unique_users")?,
    })
  }

  pub fn decode(self) -> Result<Engagement> {
    Ok(Engagement {
      event:        self.event,
      age_segment:  self.age_segment,
      item_topic:   self.item_topic,
      dt:           parse_timestamp(&self.dt)?,
      unique_users: count_from_i64("unique_users", self.unique_users)?,
    })
  }
}
