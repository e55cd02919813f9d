//! The shared stacking baseline of the topic history chart.

use std::collections::{BTreeSet, HashMap};

use cardpulse_core::TopicPoint;
use chrono::NaiveDateTime;

/// One topic's points, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSeries {
  pub name:   String,
  pub points: Vec<(NaiveDateTime, u64)>,
}

impl StackSeries {
  /// This series' own contribution at `dt`; zero where it has no point.
  pub fn height(&self, dt: NaiveDateTime) -> u64 {
    self.points.iter().filter(|(at, _)| *at == dt).map(|(_, v)| v).sum()
  }
}

/// Topic series stacked on a common x axis.
///
/// The x axis is the sorted union of every series' timestamps. A series with
/// no point at some x contributes zero there, which is how plotly fills stack
/// gaps by default. Cumulative heights are computed on request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
  series: Vec<StackSeries>,
}

impl Stack {
  /// Split `points` into one series per topic, in order of first appearance.
  pub fn from_points(points: &[TopicPoint]) -> Self {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<StackSeries> = Vec::new();

    for p in points {
      let i = *index.entry(&p.item_topic).or_insert_with(|| {
        series.push(StackSeries { name: p.item_topic.clone(), points: Vec::new() });
        series.len() - 1
      });
      series[i].points.push((p.dt, p.visits));
    }

    Self { series }
  }

  pub fn series(&self) -> &[StackSeries] { &self.series }

  /// The shared x axis.
  pub fn x(&self) -> Vec<NaiveDateTime> {
    self
      .series
      .iter()
      .flat_map(|s| s.points.iter().map(|(dt, _)| *dt))
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  /// Upper edge of series `i` (series `0..=i` summed) at every x.
  pub fn tops(&self, i: usize) -> Option<Vec<u64>> {
    let below = self.series.get(..=i)?;
    Some(
      self
        .x()
        .into_iter()
        .map(|dt| below.iter().map(|s| s.height(dt)).sum())
        .collect(),
    )
  }

  /// Height of the whole stack at `dt`; zero where nothing is plotted.
  pub fn top(&self, dt: NaiveDateTime) -> u64 {
    self.series.iter().map(|s| s.height(dt)).sum()
  }
}
