//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Create an operator account, returns a token |
//! | `POST` | `/auth/login`    | Verify credentials, returns a token |
//! | `POST` | `/auth/logout`   | Revoke the presented token |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use frontdesk_core::{
  Error as CoreError,
  account::NewAccount,
  audit::{AuditAction, NewAuditEntry},
  store::AccountStore,
  visitor::well_formed_email,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
  ApiError, AppState, ReceptionStore,
  auth::{self, Identity},
  record_audit,
};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     Option<String>,
  pub email:    String,
  pub password: String,
  pub cpf:      Option<String>,
}

/// `POST /auth/register`
pub async fn register<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
  let email = body.email.trim().to_owned();
  if !well_formed_email(&email) {
    return Err(ApiError(CoreError::Validation(format!(
      "malformed email: {email}"
    ))));
  }
  if body.password.len() < 6 {
    return Err(ApiError(CoreError::Validation(
      "password must be at least 6 characters".into(),
    )));
  }

  let name = body
    .name
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty())
    .unwrap_or_else(|| email.clone());

  let password_hash = auth::hash_password(&body.password)?;
  let account = state
    .store
    .create_account(NewAccount { name, email, cpf: body.cpf, password_hash })
    .await
    .map_err(|e| ApiError(e.into()))?;

  let issued = auth::issue_token(state.store.as_ref(), &account).await?;

  record_audit(
    state.store.as_ref(),
    NewAuditEntry::new(
      &account.actor(),
      &auth::request_origin(&headers),
      AuditAction::RegisterAccount,
    )
    .details("account created"),
  )
  .await;

  Ok((
    StatusCode::CREATED,
    Json(json!({
      "account":    account,
      "token":      issued.token,
      "expires_at": issued.expires_at,
    })),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login` — an unknown email and a wrong password are
/// indistinguishable from the outside.
pub async fn login<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
  let account = state
    .store
    .find_account_by_email(body.email.trim())
    .await
    .map_err(|e| ApiError(e.into()))?
    .ok_or(ApiError(CoreError::Unauthorized))?;

  auth::verify_password(&body.password, &account.password_hash)?;

  let issued = auth::issue_token(state.store.as_ref(), &account).await?;

  record_audit(
    state.store.as_ref(),
    NewAuditEntry::new(
      &account.actor(),
      &auth::request_origin(&headers),
      AuditAction::Login,
    )
    .details("signed in"),
  )
  .await;

  Ok(Json(json!({
    "account":    account,
    "token":      issued.token,
    "expires_at": issued.expires_at,
  })))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `POST /auth/logout`
pub async fn logout<S: ReceptionStore>(
  State(state): State<AppState<S>>,
  identity: Identity,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
  let token = auth::bearer_token(&headers)?;
  state
    .store
    .delete_session(&auth::token_digest(token))
    .await
    .map_err(|e| ApiError(e.into()))?;

  record_audit(
    state.store.as_ref(),
    NewAuditEntry::new(
      &identity.actor(),
      &auth::request_origin(&headers),
      AuditAction::Logout,
    )
    .details("signed out"),
  )
  .await;

  Ok(StatusCode::NO_CONTENT)
}
