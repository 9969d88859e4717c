//! Handler for the `/audit` endpoint.

use axum::{
  Json,
  extract::{Query, State},
  http::HeaderMap,
};
use frontdesk_core::audit::{AuditPage, AuditQuery};

use crate::{
  ApiError, AppState, ReceptionStore,
  auth::{Identity, request_origin},
};

/// `GET /audit[?action=...][&actor_id=...][&limit=...][&offset=...]`
pub async fn list<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Query(query): Query<AuditQuery>,
) -> Result<Json<AuditPage>, ApiError> {
  let page = state
    .reception
    .audit_log(&identity.actor(), &request_origin(&headers), &query)
    .await?;
  Ok(Json(page))
}
