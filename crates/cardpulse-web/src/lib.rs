//! HTTP layer for the cardpulse dashboard.
//!
//! Exposes an axum [`Router`] serving the dashboard page, its static layout,
//! and the update endpoint that recomputes the three charts for a filter
//! state. The snapshot itself is loaded by the binary before the router is
//! built.

pub mod callback;
pub mod error;
pub mod handlers;
pub mod layout;
pub mod page;

pub use error::Error;

use std::{path::Path, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use cardpulse_core::{Dataset, config::DatabaseConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use callback::CallbackRegistry;
use layout::Layout;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CARDPULSE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  #[serde(default)]
  pub debug:       bool,
  #[serde(default = "default_title")]
  pub title:       String,
  #[serde(default = "default_description")]
  pub description: String,
  pub database:    DatabaseConfig,
}

impl ServerConfig {
  /// Read `path` (optional) and overlay `CARDPULSE_*` environment variables.
  ///
  /// Nested keys use `__`, so `CARDPULSE_PORT` sets `port` and
  /// `CARDPULSE_DATABASE__PASSWORD` sets `database.password`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path.as_ref(), None)
  }

  fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CARDPULSE")
          .prefix_separator("_")
          .separator("__")
          .source(env),
      )
      .build()?
      .try_deserialize()
  }
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8050 }

fn default_title() -> String {
  "User interaction with content cards".to_string()
}

fn default_description() -> String {
  "Dashboard for analysing how users interact with content cards. Use the \
   card topic, age segment and date filters to control the charts."
    .to_string()
}

/// Which [`SnapshotSource`](cardpulse_core::source::SnapshotSource)
/// implementation a database scheme selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
  Postgres,
  Sqlite,
}

impl Backend {
  pub fn from_scheme(scheme: &str) -> Result<Self, Error> {
    match scheme {
      "postgres" | "postgresql" => Ok(Backend::Postgres),
      "sqlite" => Ok(Backend::Sqlite),
      other => Err(Error::UnsupportedScheme(other.to_string())),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Everything is read-only.
#[derive(Clone)]
pub struct AppState {
  pub dataset:   Arc<Dataset>,
  pub layout:    Arc<Layout>,
  pub callbacks: Arc<CallbackRegistry>,
}

impl AppState {
  /// Build the layout from `dataset` and validate the callback wiring
  /// against it.
  pub fn new(config: &ServerConfig, dataset: Dataset) -> Result<Self, Error> {
    let layout = Layout::build(config, &dataset.filter_options());
    let callbacks = CallbackRegistry::dashboard();
    callbacks.validate(&layout)?;

    Ok(Self {
      dataset:   Arc::new(dataset),
      layout:    Arc::new(layout),
      callbacks: Arc::new(callbacks),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the dashboard.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/",            get(handlers::index))
    .route("/healthz",     get(handlers::healthz))
    .route("/api/layout",  get(handlers::layout))
    .route("/api/update",  post(handlers::update))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cardpulse_core::{Engagement, Visit};
  use chrono::{NaiveDate, NaiveDateTime};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  pub(crate) fn test_config() -> ServerConfig {
    serde_json::from_value(json!({
      "database": { "name": "zen" },
    }))
    .unwrap()
  }

  fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, d)
      .unwrap()
      .and_hms_opt(h, m, s)
      .unwrap()
  }

  fn visit(topic: &str, source: &str, age: &str, dt: NaiveDateTime, n: u64) -> Visit {
    Visit {
      item_topic:   topic.into(),
      source_topic: source.into(),
      age_segment:  age.into(),
      dt,
      visits:       n,
    }
  }

  fn engagement(event: &str, topic: &str, age: &str, dt: NaiveDateTime, n: u64) -> Engagement {
    Engagement {
      event:        event.into(),
      age_segment:  age.into(),
      item_topic:   topic.into(),
      dt,
      unique_users: n,
    }
  }

  pub(crate) fn sample_dataset() -> Dataset {
    Dataset::new(
      vec![
        visit("A", "X", "18-25", at(1, 0, 0, 0), 5),
        visit("A", "Y", "18-25", at(1, 0, 0, 10), 3),
        visit("B", "X", "26-30", at(2, 9, 30, 0), 4),
      ],
      vec![
        engagement("like", "A", "18-25", at(1, 0, 0, 0), 10),
        engagement("like", "A", "18-25", at(1, 0, 0, 0), 20),
        engagement("share", "A", "18-25", at(1, 0, 0, 0), 5),
        engagement("view", "B", "26-30", at(2, 9, 30, 0), 99),
      ],
    )
  }

  fn state() -> AppState {
    AppState::new(&test_config(), sample_dataset()).unwrap()
  }

  async fn send(state: AppState, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
  }

  async fn post_update(body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
      .method("POST")
      .uri("/api/update")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let (status, bytes) = send(state(), req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  fn inputs(ages: Value, topics: Value, start: &str, end: &str) -> Value {
    json!({
      "triggered": "age_dropdown.value",
      "inputs": [
        { "id": "age_dropdown",        "property": "value",      "value": ages },
        { "id": "item_topic_dropdown", "property": "value",      "value": topics },
        { "id": "dt_selector",         "property": "start_date", "value": start },
        { "id": "dt_selector",         "property": "end_date",   "value": end },
      ]
    })
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  #[test]
  fn config_defaults() {
    let cfg = test_config();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8050);
    assert!(!cfg.debug);
    assert_eq!(cfg.database.scheme, "postgresql");
  }

  fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
  }

  #[test]
  fn env_overrides_reach_config() {
    let cfg = ServerConfig::load_with_env(
      Path::new("does-not-exist.toml"),
      env(&[
        ("CARDPULSE_PORT", "9999"),
        ("CARDPULSE_DATABASE__NAME", "single"),
        ("CARDPULSE_DATABASE__PASSWORD", "secret"),
        ("OTHER_PORT", "1"),
      ]),
    )
    .unwrap();
    assert_eq!(cfg.port, 9999);
    assert_eq!(cfg.database.name, "single");
    assert_eq!(cfg.database.password, "secret");
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn env_overrides_file_values() {
    let path = std::env::temp_dir().join(format!("cardpulse-config-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "port = 8080\ntitle = \"From file\"\n\n[database]\nname = \"from_file\"\nhost = \"db.local\"\n",
    )
    .unwrap();

    let cfg =
      ServerConfig::load_with_env(&path, env(&[("CARDPULSE_DATABASE__NAME", "from_env")]));
    std::fs::remove_file(&path).unwrap();
    let cfg = cfg.unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.title, "From file");
    assert_eq!(cfg.database.host, "db.local");
    assert_eq!(cfg.database.name, "from_env");
  }

  #[test]
  fn backend_follows_scheme() {
    assert_eq!(Backend::from_scheme("postgresql").unwrap(), Backend::Postgres);
    assert_eq!(Backend::from_scheme("postgres").unwrap(), Backend::Postgres);
    assert_eq!(Backend::from_scheme("sqlite").unwrap(), Backend::Sqlite);
    assert!(matches!(Backend::from_scheme("mysql"), Err(Error::UnsupportedScheme(_))));
  }

  // ── Page and layout ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_serves_html_page() {
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, bytes) = send(state(), req).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("/api/layout"));
    assert!(html.contains(page::PLOTLY_JS));
    assert!(!html.contains("{{"));
  }

  #[tokio::test]
  async fn layout_lists_distinct_values_and_full_range() {
    let req = Request::builder().uri("/api/layout").body(Body::empty()).unwrap();
    let (status, bytes) = send(state(), req).await;
    assert_eq!(status, StatusCode::OK);

    let layout: Value = serde_json::from_slice(&bytes).unwrap();
    let controls = layout["controls"].as_array().unwrap();
    assert_eq!(controls[0]["id"], "item_topic_dropdown");
    assert_eq!(controls[0]["value"], json!(["A", "B"]));
    assert_eq!(controls[1]["options"], json!(["18-25", "26-30"]));
    assert_eq!(controls[2]["start_date"], "2020-01-01 00:00:00");
    assert_eq!(controls[2]["end_date"], "2020-01-02 09:30:00");
    assert_eq!(layout["graphs"].as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn healthz_is_ok() {
    let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, bytes) = send(state(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"ok");
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_returns_three_figures() {
    let (status, body) =
      post_update(inputs(json!(["18-25"]), json!(["A"]), "2020-01-01", "2020-01-01")).await;
    assert_eq!(status, StatusCode::OK);

    let history = &body["history_absolute_visits"]["data"];
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["name"], "A");
    assert_eq!(history[0]["y"], json!([8]));
    assert_eq!(history[0]["stackgroup"], "one");

    let pie = &body["pie_visits"]["data"][0];
    assert_eq!(pie["labels"], json!(["X", "Y"]));
    assert_eq!(pie["values"], json!([5, 3]));

    let bar = &body["engagement_graph"]["data"][0];
    assert_eq!(bar["x"], json!(["like", "share"]));
    assert_eq!(bar["y"], json!([15.0, 5.0]));
    assert_eq!(
      body["engagement_graph"]["layout"]["yaxis"]["title"]["text"],
      "number of interactions"
    );
  }

  #[tokio::test]
  async fn empty_selection_returns_empty_figures() {
    let (status, body) =
      post_update(inputs(json!([]), json!(["A", "B"]), "2020-01-01", "2020-01-03")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_absolute_visits"]["data"], json!([]));
    assert_eq!(body["pie_visits"]["data"][0]["values"], json!([]));
    assert_eq!(body["engagement_graph"]["data"][0]["x"], json!([]));
  }

  #[tokio::test]
  async fn inverted_range_is_not_an_error() {
    let (status, body) = post_update(inputs(
      json!(["18-25", "26-30"]),
      json!(["A", "B"]),
      "2020-01-03",
      "2020-01-01",
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_absolute_visits"]["data"], json!([]));
  }

  #[tokio::test]
  async fn malformed_update_is_a_bad_request() {
    let (status, body) =
      post_update(inputs(json!(["18-25"]), json!(["A"]), "not a date", "2020-01-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dt_selector.start_date"));

    let (status, _) = post_update(json!({ "inputs": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
