//! The static page description.
//!
//! Built once at startup from the dataset's distinct values and served as
//! JSON; the page script turns it into controls and empty chart slots.

use cardpulse_core::{FilterOptions, time::format_timestamp};
use serde::Serialize;

use crate::ServerConfig;

// ─── Component ids ────────────────────────────────────────────────────────────

pub const TOPIC_DROPDOWN: &str = "item_topic_dropdown";
pub const AGE_DROPDOWN: &str = "age_dropdown";
pub const DATE_RANGE: &str = "dt_selector";

pub const HISTORY_GRAPH: &str = "history_absolute_visits";
pub const PIE_GRAPH: &str = "pie_visits";
pub const ENGAGEMENT_GRAPH: &str = "engagement_graph";

/// The only property a graph exposes.
pub const FIGURE: &str = "figure";

// ─── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
  pub title:       String,
  pub description: String,
  /// Echoes the server's debug mode; the page logs round-trips when set.
  pub debug:       bool,
  pub controls:    Vec<Control>,
  pub graphs:      Vec<Graph>,
}

/// A filter control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
  pub id:         String,
  pub label:      String,
  pub class_name: String,
  #[serde(flatten)]
  pub kind:       ControlKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
  Dropdown {
    options: Vec<String>,
    /// Initially selected options.
    value:   Vec<String>,
    multi:   bool,
  },
  DateRange {
    start_date:     Option<String>,
    end_date:       Option<String>,
    display_format: String,
  },
}

/// A chart slot, filled by the update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
  pub id:         String,
  pub label:      String,
  pub class_name: String,
  /// CSS height of the plot area.
  pub height:     String,
}

// ─── Construction ─────────────────────────────────────────────────────────────

impl ControlKind {
  /// Properties a callback may read from this kind of control.
  pub fn properties(&self) -> &'static [&'static str] {
    match self {
      ControlKind::Dropdown { .. } => &["value"],
      ControlKind::DateRange { .. } => &["start_date", "end_date"],
    }
  }
}

impl Layout {
  /// Build the page description. Every option starts selected and the date
  /// range spans the whole snapshot.
  pub fn build(config: &ServerConfig, options: &FilterOptions) -> Self {
    let dropdown = |id: &str, label: &str, class_name: &str, values: &[String]| Control {
      id:         id.to_string(),
      label:      label.to_string(),
      class_name: class_name.to_string(),
      kind:       ControlKind::Dropdown {
        options: values.to_vec(),
        value:   values.to_vec(),
        multi:   true,
      },
    };
    let graph = |id: &str, label: &str, height: &str| Graph {
      id:         id.to_string(),
      label:      label.to_string(),
      class_name: "six columns".to_string(),
      height:     height.to_string(),
    };

    Self {
      title:       config.title.clone(),
      description: config.description.clone(),
      debug:       config.debug,
      controls:    vec![
        dropdown(TOPIC_DROPDOWN, "Card topics", "seven columns", options.topics.as_slice()),
        dropdown(AGE_DROPDOWN, "Age segments", "four columns", options.age_segments.as_slice()),
        Control {
          id:         DATE_RANGE.to_string(),
          label:      "Date and time".to_string(),
          class_name: "four columns".to_string(),
          kind:       ControlKind::DateRange {
            start_date:     options.start.map(format_timestamp),
            end_date:       options.end.map(format_timestamp),
            display_format: "YYYY-MM-DD".to_string(),
          },
        },
      ],
      graphs:      vec![
        graph(HISTORY_GRAPH, "Event history by card topic", "50vw"),
        graph(PIE_GRAPH, "Events by source topic", "25vw"),
        graph(ENGAGEMENT_GRAPH, "Engagement depth", "25vw"),
      ],
    }
  }

  pub fn control(&self, id: &str) -> Option<&Control> {
    self.controls.iter().find(|c| c.id == id)
  }

  pub fn graph(&self, id: &str) -> Option<&Graph> {
    self.graphs.iter().find(|g| g.id == id)
  }
}
