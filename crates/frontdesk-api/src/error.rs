//! API error envelope and [`axum::response::IntoResponse`] implementation.
//!
//! Every error serialises as `{"error": {"kind": "...", "message": "..."}}`
//! so clients can branch on the machine-readable kind without parsing the
//! human-facing text.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use frontdesk_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler, wrapping the core taxonomy.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

impl ApiError {
  /// The machine-readable kind and HTTP status for each error class.
  pub fn kind_and_status(&self) -> (&'static str, StatusCode) {
    match &self.0 {
      CoreError::Validation(_) => ("validation", StatusCode::BAD_REQUEST),
      CoreError::Unauthorized => ("auth", StatusCode::UNAUTHORIZED),
      CoreError::VisitorNotFound(_) => ("not_found", StatusCode::NOT_FOUND),
      CoreError::RoomFull { .. } => ("capacity", StatusCode::CONFLICT),
      CoreError::AlreadyActive { .. } => {
        ("already_active", StatusCode::CONFLICT)
      }
      CoreError::AlreadyCheckedOut(_) => {
        ("already_checked_out", StatusCode::CONFLICT)
      }
      CoreError::StillActive(_) => ("active_visitor", StatusCode::CONFLICT),
      CoreError::EmailTaken(_) => ("email_taken", StatusCode::CONFLICT),
      CoreError::Store(_) => {
        ("internal", StatusCode::INTERNAL_SERVER_ERROR)
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (kind, status) = self.kind_and_status();

    // Store failures are logged with full detail but surfaced generically.
    let message = if let CoreError::Store(inner) = &self.0 {
      tracing::error!(error = %inner, "internal error");
      "internal server error".to_owned()
    } else {
      self.0.to_string()
    };

    (status, Json(json!({ "error": { "kind": kind, "message": message } })))
      .into_response()
  }
}
