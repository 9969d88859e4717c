//! JSON REST API for the Frontdesk reception service.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits. Identity is resolved per request from a bearer token and passed
//! explicitly into the [`Reception`] controller — handlers hold no ambient
//! session state.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", frontdesk_api::router(AppState::new(store)))
//! ```

pub mod accounts;
pub mod audit_log;
pub mod auth;
pub mod error;
pub mod visitors;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use frontdesk_core::{
  Reception,
  audit::NewAuditEntry,
  store::{AccountStore, AuditStore, VisitorStore},
};
use serde::Deserialize;

// ─── Store bound ─────────────────────────────────────────────────────────────

/// Everything the router needs from a backend.
pub trait ReceptionStore:
  VisitorStore + AuditStore + AccountStore + Clone + Send + Sync + 'static
{
}

impl<S> ReceptionStore for S where
  S: VisitorStore + AuditStore + AccountStore + Clone + Send + Sync + 'static
{
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub reception: Arc<Reception<S>>,
  pub store:     Arc<S>,
}

impl<S: ReceptionStore> AppState<S> {
  pub fn new(store: S) -> Self {
    Self {
      reception: Arc::new(Reception::new(store.clone())),
      store:     Arc::new(store),
    }
  }
}

/// Best-effort audit write for the auth handlers, which operate outside the
/// lifecycle controller. Failures are logged, never surfaced.
pub(crate) async fn record_audit<S: ReceptionStore>(
  store: &S,
  entry: NewAuditEntry,
) {
  if let Err(err) = store.record(entry).await {
    tracing::warn!(error = %err, "audit write failed");
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn router<S: ReceptionStore>(state: AppState<S>) -> Router<()> {
  Router::new()
    // Accounts
    .route("/auth/register", post(accounts::register::<S>))
    .route("/auth/login", post(accounts::login::<S>))
    .route("/auth/logout", post(accounts::logout::<S>))
    // Visitors
    .route(
      "/visitors",
      get(visitors::list::<S>).post(visitors::register::<S>),
    )
    .route("/visitors/search", get(visitors::search::<S>))
    .route("/visitors/history", get(visitors::history::<S>))
    .route("/visitors/{id}", delete(visitors::delete_one::<S>))
    .route("/visitors/{id}/checkin", post(visitors::check_in::<S>))
    .route("/visitors/{id}/checkout", post(visitors::check_out::<S>))
    // Audit trail
    .route("/audit", get(audit_log::list::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
