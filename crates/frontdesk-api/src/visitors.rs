//! Handlers for `/visitors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/visitors` | Register a visitor; 201 + record |
//! | `GET`    | `/visitors` | Optional `?active=true` |
//! | `GET`    | `/visitors/search` | `?cpf=<fragment>` |
//! | `GET`    | `/visitors/history` | Annotated history + counts |
//! | `DELETE` | `/visitors/:id` | Returns the deleted snapshot |
//! | `POST`   | `/visitors/:id/checkin` | Re-visit by existing record |
//! | `POST`   | `/visitors/:id/checkout` | Close the visit |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use frontdesk_core::visitor::{HistoryReport, Visitor, VisitorDraft};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiError, AppState, ReceptionStore,
  auth::{Identity, request_origin},
};

// ─── Register ────────────────────────────────────────────────────────────────

/// `POST /visitors`
pub async fn register<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Json(draft): Json<VisitorDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let visitor = state
    .reception
    .register(&identity.actor(), &request_origin(&headers), draft)
    .await?;
  Ok((StatusCode::CREATED, Json(visitor)))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If `true`, only visits with no check-out yet.
  #[serde(default)]
  pub active: bool,
}

/// `GET /visitors[?active=true]`
pub async fn list<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Visitor>>, ApiError> {
  let visitors = state
    .reception
    .list(&identity.actor(), &request_origin(&headers), params.active)
    .await?;
  Ok(Json(visitors))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub cpf: Option<String>,
}

/// `GET /visitors/search?cpf=<fragment>`
pub async fn search<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Visitor>>, ApiError> {
  let matches = state
    .reception
    .search(
      &identity.actor(),
      &request_origin(&headers),
      params.cpf.as_deref().unwrap_or(""),
    )
    .await?;
  Ok(Json(matches))
}

// ─── History ─────────────────────────────────────────────────────────────────

/// `GET /visitors/history`
pub async fn history<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
) -> Result<Json<HistoryReport>, ApiError> {
  let report = state
    .reception
    .history(&identity.actor(), &request_origin(&headers))
    .await?;
  Ok(Json(report))
}

// ─── Lifecycle by id ─────────────────────────────────────────────────────────

/// `POST /visitors/:id/checkin`
pub async fn check_in<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
  let visitor = state
    .reception
    .check_in(&identity.actor(), &request_origin(&headers), id)
    .await?;
  Ok(Json(visitor))
}

/// `POST /visitors/:id/checkout`
pub async fn check_out<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
  let visitor = state
    .reception
    .check_out(&identity.actor(), &request_origin(&headers), id)
    .await?;
  Ok(Json(visitor))
}

/// `DELETE /visitors/:id` — returns the deleted snapshot.
pub async fn delete_one<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
  Path(id): Path<Uuid>,
) -> Result<Json<Visitor>, ApiError> {
  let visitor = state
    .reception
    .delete(&identity.actor(), &request_origin(&headers), id)
    .await?;
  Ok(Json(visitor))
}
