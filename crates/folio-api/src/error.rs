//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client errors carry a message (`{"msg": ...}`) or a violation list
//! (`{"errors": [...]}`). Server errors are logged and reported opaquely.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::store::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

use crate::validate::Violation;

const SERVER_ERROR: &str = "Server Error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed ({} violations)", .0.len())]
  Validation(Vec<Violation>),

  /// Missing entity or malformed reference.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a store failure onto a response category by its [`ErrorKind`].
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.kind() {
      ErrorKind::NotFound | ErrorKind::Invalid => ApiError::BadRequest(e.to_string()),
      ErrorKind::Conflict => ApiError::Conflict(e.to_string()),
      ErrorKind::Transient => ApiError::Unavailable(Box::new(e)),
      ErrorKind::Fatal => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => {
        tracing::debug!(count = errors.len(), "request failed validation");
        (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
      }
      ApiError::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
      }
      ApiError::Unauthorized(msg) => {
        (StatusCode::UNAUTHORIZED, Json(json!({ "msg": msg }))).into_response()
      }
      ApiError::Conflict(msg) => {
        (StatusCode::CONFLICT, Json(json!({ "msg": msg }))).into_response()
      }
      ApiError::Unavailable(e) => {
        tracing::error!(error = %e, "store unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "msg": SERVER_ERROR }))).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "msg": SERVER_ERROR })))
          .into_response()
      }
    }
  }
}
