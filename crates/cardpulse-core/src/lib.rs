//! Core types for the cardpulse dashboard.
//!
//! Holds the two snapshot tables, the filter/aggregate engine that runs on
//! every filter change, and the [`SnapshotSource`](source::SnapshotSource)
//! seam that database backends implement. This crate is deliberately free of
//! HTTP and database dependencies.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod record;
pub mod source;
pub mod time;

pub use dataset::{Dataset, FilterOptions};
pub use engine::{Aggregates, EventMean, Selection, SourceTotal, TopicPoint};
pub use error::{Error, Result};
pub use record::{Engagement, Visit};
