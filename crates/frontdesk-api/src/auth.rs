//! Bearer-token authentication: password hashing, token issue/verify, and
//! the [`Identity`] extractor.
//!
//! Tokens are opaque — 32 random bytes, base64-encoded. Only the sha-256
//! digest of a token is stored server-side, so a leaked sessions table
//! cannot be replayed as live credentials. Sessions expire after
//! [`SESSION_TTL_DAYS`] days.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use frontdesk_core::{
  Error as CoreError,
  account::{Account, SESSION_TTL_DAYS, Session},
  audit::{Actor, RequestOrigin},
  store::AccountStore,
};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{ApiError, AppState, ReceptionStore};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError(CoreError::Store(format!("argon2: {e}").into())))
}

/// Verify a password against a stored PHC string. Any failure — malformed
/// hash or wrong password — collapses to the auth error kind.
pub fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed =
    PasswordHash::new(phc).map_err(|_| ApiError(CoreError::Unauthorized))?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError(CoreError::Unauthorized))
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// A freshly-minted bearer token and its expiry.
pub struct IssuedToken {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

/// The digest under which a token's session is stored.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Mint an opaque token and persist its session row.
pub async fn issue_token<S: ReceptionStore>(
  store: &S,
  account: &Account,
) -> Result<IssuedToken, ApiError> {
  let mut raw = [0u8; 32];
  OsRng.fill_bytes(&mut raw);
  let token = B64.encode(raw);

  let now = Utc::now();
  let expires_at = now + Duration::days(SESSION_TTL_DAYS);
  store
    .create_session(Session {
      token_hash: token_digest(&token),
      account_id: account.account_id,
      issued_at: now,
      expires_at,
    })
    .await
    .map_err(|e| ApiError(e.into()))?;

  Ok(IssuedToken { token, expires_at })
}

/// Resolve a bearer token into the account it belongs to.
pub async fn verify_identity<S: ReceptionStore>(
  store: &S,
  token: &str,
) -> Result<Account, ApiError> {
  let session = store
    .find_session(&token_digest(token))
    .await
    .map_err(|e| ApiError(e.into()))?
    .ok_or(ApiError(CoreError::Unauthorized))?;

  if session.is_expired(Utc::now()) {
    return Err(ApiError(CoreError::Unauthorized));
  }

  store
    .get_account(session.account_id)
    .await
    .map_err(|e| ApiError(e.into()))?
    .ok_or(ApiError(CoreError::Unauthorized))
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .ok_or(ApiError(CoreError::Unauthorized))
}

// ─── Request origin ──────────────────────────────────────────────────────────

/// Best-effort request origin from proxy headers. Never authoritative.
pub fn request_origin(headers: &HeaderMap) -> RequestOrigin {
  let ip_address = headers
    .get("x-forwarded-for")
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.split(',').next())
    .map(|value| value.trim().to_owned())
    .or_else(|| {
      headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    });

  let user_agent = headers
    .get(header::USER_AGENT)
    .and_then(|value| value.to_str().ok())
    .map(str::to_owned);

  RequestOrigin { ip_address, user_agent }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid,
/// unexpired token.
pub struct Identity(pub Account);

impl Identity {
  pub fn actor(&self) -> Actor { self.0.actor() }
}

impl<S: ReceptionStore> FromRequestParts<AppState<S>> for Identity {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let account = verify_identity(state.store.as_ref(), token).await?;
    Ok(Identity(account))
  }
}
