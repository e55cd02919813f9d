//! Chart mapping for cardpulse.
//!
//! Converts the derived tables of [`cardpulse_core::engine`] into plotly
//! figure descriptions. Pure and synchronous; no HTTP or database
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use cardpulse_core::{Dataset, Selection};
//!
//! # fn demo(dataset: &Dataset, selection: &Selection) {
//! let figures = cardpulse_charts::figures(&dataset.compute(selection));
//! println!("{}", serde_json::to_string(&figures.history).unwrap());
//! # }
//! ```

pub mod figure;
mod stack;

use cardpulse_core::{Aggregates, EventMean, SourceTotal, TopicPoint, time::format_timestamp};
use serde::Serialize;

pub use figure::{Axis, BarTrace, Figure, FigureLayout, PieTrace, ScatterTrace, Trace};
pub use stack::{Stack, StackSeries};

/// The three dashboard charts for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figures {
  pub history:    Figure,
  pub pie:        Figure,
  pub engagement: Figure,
}

/// Map all three derived tables at once.
pub fn figures(aggregates: &Aggregates) -> Figures {
  Figures {
    history:    stacked_area(&aggregates.topic_series),
    pie:        pie(&aggregates.source_totals),
    engagement: bar(&aggregates.event_means),
  }
}

/// Visits over time, one stacked line per topic.
pub fn stacked_area(points: &[TopicPoint]) -> Figure {
  let stack = Stack::from_points(points);
  let data = stack
    .series()
    .iter()
    .map(|s| {
      Trace::Scatter(ScatterTrace {
        name:       s.name.clone(),
        x:          s.points.iter().map(|(dt, _)| format_timestamp(*dt)).collect(),
        y:          s.points.iter().map(|(_, v)| *v).collect(),
        mode:       "lines".to_string(),
        stackgroup: "one".to_string(),
      })
    })
    .collect();

  Figure {
    data,
    layout: FigureLayout::with_axes("date", "number of events"),
  }
}

/// Share of visits per source topic.
pub fn pie(totals: &[SourceTotal]) -> Figure {
  Figure {
    data:   vec![Trace::Pie(PieTrace {
      name:   "source_topics".to_string(),
      labels: totals.iter().map(|t| t.source_topic.clone()).collect(),
      values: totals.iter().map(|t| t.visits).collect(),
    })],
    layout: FigureLayout::default(),
  }
}

/// Engagement depth per event, in the order given (already descending).
pub fn bar(means: &[EventMean]) -> Figure {
  Figure {
    data:   vec![Trace::Bar(BarTrace {
      x: means.iter().map(|m| m.event.clone()).collect(),
      y: means.iter().map(|m| m.unique_users).collect(),
    })],
    layout: FigureLayout::with_axes("event", "number of interactions"),
  }
}
