//! Error types shared by the catalog loader, quiz engine and analysis gateway.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

use crate::quiz::{QuizEvent, Stage};

/// Failures talking to the model provider. Carried as text because callers only log and relay them.
#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("model provider not configured (ANTHROPIC_API_KEY unset)")]
  NotConfigured,
  #[error("transport error: {0}")]
  Transport(String),
  #[error("provider HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("undecodable provider response: {0}")]
  Decode(String),
}

/// Everything `/api/analyze` can answer with instead of an analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
  #[error("No image provided")]
  MissingImage,
  #[error("Invalid image format")]
  InvalidImage,
  #[error("Follow-up requires {0}")]
  MissingHistory(&'static str),
  #[error("Analysis failed")]
  Upstream(#[from] ProviderError),
  /// The body never reached the gateway: not JSON, wrong field types, wrong
  /// content type, or over the size limit. Keeps the extractor's status code.
  #[error("Invalid request body: {message}")]
  InvalidBody { status: StatusCode, message: String },
}

impl From<JsonRejection> for AnalyzeError {
  fn from(rejection: JsonRejection) -> Self {
    AnalyzeError::InvalidBody { status: rejection.status(), message: rejection.body_text() }
  }
}

impl AnalyzeError {
  pub fn status(&self) -> StatusCode {
    match self {
      AnalyzeError::MissingImage | AnalyzeError::InvalidImage | AnalyzeError::MissingHistory(_) => {
        StatusCode::BAD_REQUEST
      }
      AnalyzeError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AnalyzeError::InvalidBody { status, .. } => *status,
    }
  }
}

impl IntoResponse for AnalyzeError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      AnalyzeError::Upstream(inner) => json!({ "error": self.to_string(), "details": inner.to_string() }),
      _ => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
  #[error("event {event:?} is not valid in stage {stage:?}")]
  InvalidEvent { stage: Stage, event: QuizEvent },
  #[error("'{0}' is not one of the offered options")]
  UnknownOption(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to read catalog {path}: {source}")]
  Io { path: String, source: std::io::Error },
  #[error("failed to parse catalog JSON: {0}")]
  Parse(#[from] serde_json::Error),
}
