//! Plotly figure descriptions.
//!
//! Only the subset of the plotly.js schema the dashboard emits is modelled.
//! Serialised field names match plotly's, so the browser can pass a
//! [`Figure`] straight to `Plotly.react`.

use serde::Serialize;

/// A complete chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
  pub data:   Vec<Trace>,
  pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
  Scatter(ScatterTrace),
  Pie(PieTrace),
  Bar(BarTrace),
}

/// A line trace; traces sharing a `stackgroup` are stacked by plotly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
  pub name:       String,
  pub x:          Vec<String>,
  pub y:          Vec<u64>,
  pub mode:       String,
  pub stackgroup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
  pub name:   String,
  pub labels: Vec<String>,
  pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
  pub x: Vec<String>,
  pub y: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FigureLayout {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub xaxis: Option<Axis>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub yaxis: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
  pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
  pub text: String,
}

impl Axis {
  pub fn titled(text: &str) -> Self {
    Self { title: AxisTitle { text: text.to_owned() } }
  }
}

impl FigureLayout {
  pub fn with_axes(x: &str, y: &str) -> Self {
    Self {
      xaxis: Some(Axis::titled(x)),
      yaxis: Some(Axis::titled(y)),
    }
  }
}
