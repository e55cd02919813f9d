//! Error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The update request could not be resolved into a filter selection.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The callback wiring does not match the layout. Only raised at startup.
  #[error("invalid callback registration: {0}")]
  Registration(String),

  #[error("unsupported database scheme: {0:?}")]
  UnsupportedScheme(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Registration(_) | Error::UnsupportedScheme(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
