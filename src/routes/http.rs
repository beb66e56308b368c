//! HTTP endpoint handlers. These are thin wrappers that forward to the catalog and gateway.
//! Each handler is instrumented and logs basic request and result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, State},
  response::IntoResponse,
  Json,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::BuildingRecord;
use crate::error::AnalyzeError;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, model_configured: state.gateway.is_configured() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_buildings(State(state): State<Arc<AppState>>) -> Json<Vec<BuildingRecord>> {
  info!(target: "catalog", count = state.catalog.len(), "HTTP catalog served");
  Json(state.catalog.buildings().to_vec())
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_analyze(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<AnalyzeIn>, JsonRejection>,
) -> Result<Json<AnalyzeOut>, AnalyzeError> {
  let Json(body) = payload.map_err(|rejection| {
    warn!(target: "gracitecture", status = %rejection.status(), error = %rejection.body_text(), "Analyze body rejected");
    AnalyzeError::from(rejection)
  })?;
  debug!(
    target: "gracitecture",
    is_initial = body.is_initial.unwrap_or(false),
    image_len = body.image.as_ref().map(|s| s.len()).unwrap_or(0),
    messages = body.messages.as_ref().map(|m| m.len()).unwrap_or(0),
    "HTTP analyze request"
  );
  let analysis = state.gateway.analyze(body.image.as_deref(), body.analysis_request()).await?;
  info!(target: "gracitecture", analysis_len = analysis.len(), "HTTP analysis served");
  Ok(Json(AnalyzeOut { analysis }))
}
