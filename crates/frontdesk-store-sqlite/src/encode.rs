//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601,
//! UUIDs as hyphenated lowercase strings, rooms as their display label, and
//! audit actions as their snake_case discriminant.

use chrono::{DateTime, NaiveDate, Utc};
use frontdesk_core::{
  account::{Account, Session},
  audit::{AuditAction, AuditEntry},
  visitor::{Cpf, Room, Visitor},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

pub fn encode_action(a: AuditAction) -> &'static str { a.as_str() }

pub fn decode_action(s: &str) -> Result<AuditAction> {
  AuditAction::parse(s)
    .ok_or_else(|| Error::DateParse(format!("unknown audit action: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `visitors` row.
pub struct RawVisitor {
  pub visitor_id: String,
  pub name:       String,
  pub cpf:        String,
  pub room:       String,
  pub birth_date: Option<String>,
  pub email:      Option<String>,
  pub check_in:   String,
  pub check_out:  Option<String>,
  pub created_at: String,
}

impl RawVisitor {
  /// Map a row selected with [`crate::store::VISITOR_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      visitor_id: row.get(0)?,
      name:       row.get(1)?,
      cpf:        row.get(2)?,
      room:       row.get(3)?,
      birth_date: row.get(4)?,
      email:      row.get(5)?,
      check_in:   row.get(6)?,
      check_out:  row.get(7)?,
      created_at: row.get(8)?,
    })
  }

  pub fn into_visitor(self) -> Result<Visitor> {
    Ok(Visitor {
      visitor_id: decode_uuid(&self.visitor_id)?,
      name:       self.name,
      cpf:        Cpf::parse(&self.cpf)?,
      room:       Room::parse(&self.room)?,
      birth_date: self.birth_date.as_deref().map(decode_date).transpose()?,
      email:      self.email,
      check_in:   decode_dt(&self.check_in)?,
      check_out:  self.check_out.as_deref().map(decode_dt).transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `audit_log` row.
pub struct RawAuditEntry {
  pub entry_id:    String,
  pub actor_id:    String,
  pub actor_name:  String,
  pub actor_cpf:   Option<String>,
  pub action:      String,
  pub details:     Option<String>,
  pub target_id:   Option<String>,
  pub target_name: Option<String>,
  pub ip_address:  Option<String>,
  pub user_agent:  Option<String>,
  pub created_at:  String,
}

impl RawAuditEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:    row.get(0)?,
      actor_id:    row.get(1)?,
      actor_name:  row.get(2)?,
      actor_cpf:   row.get(3)?,
      action:      row.get(4)?,
      details:     row.get(5)?,
      target_id:   row.get(6)?,
      target_name: row.get(7)?,
      ip_address:  row.get(8)?,
      user_agent:  row.get(9)?,
      created_at:  row.get(10)?,
    })
  }

  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      actor_id:    decode_uuid(&self.actor_id)?,
      actor_name:  self.actor_name,
      actor_cpf:   self.actor_cpf,
      action:      decode_action(&self.action)?,
      details:     self.details,
      target_id:   self
        .target_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      target_name: self.target_name,
      ip_address:  self.ip_address,
      user_agent:  self.user_agent,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:    String,
  pub name:          String,
  pub email:         String,
  pub cpf:           Option<String>,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:    row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      cpf:           row.get(3)?,
      password_hash: row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id:    decode_uuid(&self.account_id)?,
      name:          self.name,
      email:         self.email,
      cpf:           self.cpf,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub token_hash: String,
  pub account_id: String,
  pub issued_at:  String,
  pub expires_at: String,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      token_hash: row.get(0)?,
      account_id: row.get(1)?,
      issued_at:  row.get(2)?,
      expires_at: row.get(3)?,
    })
  }

  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      account_id: decode_uuid(&self.account_id)?,
      issued_at:  decode_dt(&self.issued_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
