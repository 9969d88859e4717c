//! Operator accounts and bearer-token sessions.
//!
//! Accounts belong to the people operating the front desk, not to visitors.
//! Sessions are server-side rows keyed by the sha-256 digest of an opaque
//! bearer token; the token itself never touches the database.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::audit::Actor;

/// Fixed validity of an issued token.
pub const SESSION_TTL_DAYS: i64 = 7;

/// An operator account.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
  pub account_id:    Uuid,
  pub name:          String,
  pub email:         String,
  pub cpf:           Option<String>,
  /// Argon2 PHC string; never serialised to clients.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl Account {
  /// The audit-facing identity of this account.
  pub fn actor(&self) -> Actor {
    Actor {
      actor_id: self.account_id,
      name:     self.name.clone(),
      cpf:      self.cpf.clone(),
    }
  }
}

/// Input to [`crate::store::AccountStore::create_account`].
/// `account_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub name:          String,
  pub email:         String,
  pub cpf:           Option<String>,
  pub password_hash: String,
}

/// A server-side session row.
#[derive(Debug, Clone)]
pub struct Session {
  /// Sha-256 hex digest of the bearer token.
  pub token_hash: String,
  pub account_id: Uuid,
  pub issued_at:  DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }
}
