//! Explicit callback registration.
//!
//! The dashboard has a single update function. [`CallbackRegistry`] names the
//! control properties it reads and the graph figures it writes; the binding
//! is checked against the [`Layout`] at startup and drives request decoding at
//! runtime.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use cardpulse_charts::Figure;
use cardpulse_core::{Dataset, Selection, time::parse_timestamp};
use serde::Deserialize;
use serde_json::Value;

use crate::{
  error::Error,
  layout::{
    AGE_DROPDOWN, DATE_RANGE, ENGAGEMENT_GRAPH, FIGURE, HISTORY_GRAPH, Layout,
    PIE_GRAPH, TOPIC_DROPDOWN,
  },
};

/// A `(component id, property)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
  pub id:       &'static str,
  pub property: &'static str,
}

const AGES: Binding = Binding { id: AGE_DROPDOWN, property: "value" };
const TOPICS: Binding = Binding { id: TOPIC_DROPDOWN, property: "value" };
const START: Binding = Binding { id: DATE_RANGE, property: "start_date" };
const END: Binding = Binding { id: DATE_RANGE, property: "end_date" };

/// Computes the figures for `selection`, one per registered output, in order.
pub type UpdateFn = fn(&Dataset, &Selection) -> Vec<Figure>;

/// One input value posted by the page.
#[derive(Debug, Clone, Deserialize)]
pub struct InputValue {
  pub id:       String,
  pub property: String,
  #[serde(default)]
  pub value:    Value,
}

/// Body of `POST /api/update`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
  /// The `id.property` that changed, if the page knows it. Logged only.
  #[serde(default)]
  pub triggered: Option<String>,
  pub inputs:    Vec<InputValue>,
}

/// Input and output bindings of the update function.
#[derive(Debug, Clone)]
pub struct CallbackRegistry {
  inputs:  Vec<Binding>,
  outputs: Vec<Binding>,
  handler: UpdateFn,
}

impl CallbackRegistry {
  pub fn new(inputs: Vec<Binding>, outputs: Vec<Binding>, handler: UpdateFn) -> Self {
    Self { inputs, outputs, handler }
  }

  /// The dashboard's wiring: the four filter values in, the three charts out.
  pub fn dashboard() -> Self {
    let figure = |id| Binding { id, property: FIGURE };
    Self::new(
      vec![AGES, TOPICS, START, END],
      vec![figure(HISTORY_GRAPH), figure(PIE_GRAPH), figure(ENGAGEMENT_GRAPH)],
      update_figures,
    )
  }

  pub fn inputs(&self) -> &[Binding] { &self.inputs }

  pub fn outputs(&self) -> &[Binding] { &self.outputs }

  /// Check every binding against `layout`.
  ///
  /// Inputs must name a control exposing the property, outputs a graph's
  /// `figure`; no binding may appear twice, and the selection inputs must all
  /// be present.
  pub fn validate(&self, layout: &Layout) -> Result<(), Error> {
    let mut seen = HashSet::new();

    for b in &self.inputs {
      if !seen.insert(*b) {
        return Err(Error::Registration(format!("duplicate input {}.{}", b.id, b.property)));
      }
      let control = layout
        .control(b.id)
        .ok_or_else(|| Error::Registration(format!("input {:?} is not a control", b.id)))?;
      if !control.kind.properties().contains(&b.property) {
        return Err(Error::Registration(format!(
          "control {:?} has no property {:?}",
          b.id, b.property
        )));
      }
    }

    for required in [AGES, TOPICS, START, END] {
      if !self.inputs.contains(&required) {
        return Err(Error::Registration(format!(
          "input {}.{} is not registered",
          required.id, required.property
        )));
      }
    }

    for b in &self.outputs {
      if !seen.insert(*b) {
        return Err(Error::Registration(format!("duplicate output {}.{}", b.id, b.property)));
      }
      if layout.graph(b.id).is_none() || b.property != FIGURE {
        return Err(Error::Registration(format!(
          "output {}.{} is not a graph figure",
          b.id, b.property
        )));
      }
    }

    Ok(())
  }

  /// Decode `request` into a [`Selection`].
  ///
  /// Every registered input must be supplied exactly once; anything else is a
  /// bad request.
  pub fn resolve(&self, request: &UpdateRequest) -> Result<Selection, Error> {
    let mut values: BTreeMap<Binding, &Value> = BTreeMap::new();

    for input in &request.inputs {
      let binding = self
        .inputs
        .iter()
        .find(|b| b.id == input.id && b.property == input.property)
        .ok_or_else(|| {
          Error::BadRequest(format!("unknown input {}.{}", input.id, input.property))
        })?;
      if values.insert(*binding, &input.value).is_some() {
        return Err(Error::BadRequest(format!(
          "input {}.{} supplied twice",
          input.id, input.property
        )));
      }
    }

    let get = |b: Binding| {
      values
        .get(&b)
        .copied()
        .ok_or_else(|| Error::BadRequest(format!("missing input {}.{}", b.id, b.property)))
    };

    Ok(Selection {
      ages:   categories(AGES, get(AGES)?)?,
      topics: categories(TOPICS, get(TOPICS)?)?,
      start:  timestamp(START, get(START)?)?,
      end:    timestamp(END, get(END)?)?,
    })
  }

  /// Resolve `request`, run the update function, and key the figures by
  /// output id.
  pub fn dispatch(
    &self,
    dataset: &Dataset,
    request: &UpdateRequest,
  ) -> Result<BTreeMap<&'static str, Figure>, Error> {
    let selection = self.resolve(request)?;
    tracing::debug!(
      triggered = request.triggered.as_deref().unwrap_or("initial"),
      ages = selection.ages.len(),
      topics = selection.topics.len(),
      start = %selection.start,
      end = %selection.end,
      "recomputing figures"
    );

    let figures = (self.handler)(dataset, &selection);
    if figures.len() != self.outputs.len() {
      return Err(Error::Registration(format!(
        "update produced {} figures for {} outputs",
        figures.len(),
        self.outputs.len()
      )));
    }

    Ok(self.outputs.iter().map(|b| b.id).zip(figures).collect())
  }
}

/// The dashboard's update function.
fn update_figures(dataset: &Dataset, selection: &Selection) -> Vec<Figure> {
  let aggregates = dataset.compute(selection);
  tracing::debug!(
    topic_points = aggregates.topic_series.len(),
    sources = aggregates.source_totals.len(),
    events = aggregates.event_means.len(),
    "aggregated"
  );

  let figures = cardpulse_charts::figures(&aggregates);
  vec![figures.history, figures.pie, figures.engagement]
}

/// A multi-select value: a list of strings, a single string, or `null` (a
/// cleared dropdown, meaning nothing selected).
fn categories(binding: Binding, value: &Value) -> Result<BTreeSet<String>, Error> {
  match value {
    Value::Null => Ok(BTreeSet::new()),
    Value::String(s) => Ok(BTreeSet::from([s.clone()])),
    Value::Array(items) => items
      .iter()
      .map(|item| match item {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_error(binding, "a list of strings", other)),
      })
      .collect(),
    other => Err(type_error(binding, "a list of strings", other)),
  }
}

fn timestamp(binding: Binding, value: &Value) -> Result<chrono::NaiveDateTime, Error> {
  match value {
    Value::String(s) => parse_timestamp(s).map_err(|e| {
      Error::BadRequest(format!("{}.{}: {e}", binding.id, binding.property))
    }),
    other => Err(type_error(binding, "a date string", other)),
  }
}

fn type_error(binding: Binding, expected: &str, got: &Value) -> Error {
  Error::BadRequest(format!(
    "{}.{}: expected {expected}, got {got}",
    binding.id, binding.property
  ))
}
