//! Route handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | The dashboard page |
//! | `GET`  | `/api/layout` | Static [`Layout`](crate::layout::Layout) |
//! | `POST` | `/api/update` | Body: [`UpdateRequest`]; returns figures by graph id |
//! | `GET`  | `/healthz` | Liveness |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::State,
  response::{Html, IntoResponse},
};
use cardpulse_charts::Figure;

use crate::{AppState, callback::UpdateRequest, error::Error, layout::Layout, page};

/// `GET /`
pub async fn index() -> Html<String> { Html(page::render()) }

/// `GET /api/layout`
pub async fn layout(State(state): State<AppState>) -> Json<Layout> {
  Json(state.layout.as_ref().clone())
}

/// `POST /api/update`
pub async fn update(
  State(state): State<AppState>,
  Json(request): Json<UpdateRequest>,
) -> Result<Json<BTreeMap<&'static str, Figure>>, Error> {
  let figures = state.callbacks.dispatch(&state.dataset, &request)?;
  Ok(Json(figures))
}

/// `GET /healthz`
pub async fn healthz() -> impl IntoResponse { "ok" }
