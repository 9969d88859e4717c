//! Audit trail types.
//!
//! Every lifecycle operation — attempted or completed — leaves one entry.
//! Entries are append-only; nothing in the system updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size for [`crate::store::AuditStore::list`].
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Hard cap on the page size, whatever the caller asks for.
pub const MAX_PAGE_LIMIT: usize = 1000;

// ─── Actor & origin ──────────────────────────────────────────────────────────

/// The identity on whose behalf an operation runs. Always passed explicitly
/// into the controller; there is no ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
  pub actor_id: Uuid,
  pub name:     String,
  pub cpf:      Option<String>,
}

/// Where a request came from. Best-effort, never authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestOrigin {
  pub ip_address: Option<String>,
  pub user_agent: Option<String>,
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// What kind of operation an audit entry describes. The discriminant string
/// doubles as the `action` column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
  Login,
  Logout,
  RegisterAccount,
  CreateVisitor,
  CheckInVisitor,
  CheckOutVisitor,
  DeleteVisitor,
  SearchVisitors,
  ListVisitors,
  ViewHistory,
  ViewAuditLog,
}

impl AuditAction {
  /// The discriminant string stored in the `action` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Login => "login",
      Self::Logout => "logout",
      Self::RegisterAccount => "register_account",
      Self::CreateVisitor => "create_visitor",
      Self::CheckInVisitor => "check_in_visitor",
      Self::CheckOutVisitor => "check_out_visitor",
      Self::DeleteVisitor => "delete_visitor",
      Self::SearchVisitors => "search_visitors",
      Self::ListVisitors => "list_visitors",
      Self::ViewHistory => "view_history",
      Self::ViewAuditLog => "view_audit_log",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "login" => Some(Self::Login),
      "logout" => Some(Self::Logout),
      "register_account" => Some(Self::RegisterAccount),
      "create_visitor" => Some(Self::CreateVisitor),
      "check_in_visitor" => Some(Self::CheckInVisitor),
      "check_out_visitor" => Some(Self::CheckOutVisitor),
      "delete_visitor" => Some(Self::DeleteVisitor),
      "search_visitors" => Some(Self::SearchVisitors),
      "list_visitors" => Some(Self::ListVisitors),
      "view_history" => Some(Self::ViewHistory),
      "view_audit_log" => Some(Self::ViewAuditLog),
      _ => None,
    }
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// One persisted audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
  pub entry_id:    Uuid,
  pub actor_id:    Uuid,
  pub actor_name:  String,
  pub actor_cpf:   Option<String>,
  pub action:      AuditAction,
  pub details:     Option<String>,
  pub target_id:   Option<Uuid>,
  pub target_name: Option<String>,
  pub ip_address:  Option<String>,
  pub user_agent:  Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::AuditStore::record`].
/// `entry_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
  pub actor:       Actor,
  pub action:      AuditAction,
  pub details:     Option<String>,
  pub target_id:   Option<Uuid>,
  pub target_name: Option<String>,
  pub origin:      RequestOrigin,
}

impl NewAuditEntry {
  pub fn new(actor: &Actor, origin: &RequestOrigin, action: AuditAction) -> Self {
    Self {
      actor: actor.clone(),
      action,
      details: None,
      target_id: None,
      target_name: None,
      origin: origin.clone(),
    }
  }

  pub fn details(mut self, details: impl Into<String>) -> Self {
    self.details = Some(details.into());
    self
  }

  pub fn target_id(mut self, id: Uuid) -> Self {
    self.target_id = Some(id);
    self
  }

  pub fn target_name(mut self, name: impl Into<String>) -> Self {
    self.target_name = Some(name.into());
    self
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::AuditStore::list`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
  pub action:   Option<AuditAction>,
  pub actor_id: Option<Uuid>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

impl AuditQuery {
  /// Requested limit clamped to [`MAX_PAGE_LIMIT`], defaulting to
  /// [`DEFAULT_PAGE_LIMIT`].
  pub fn effective_limit(&self) -> usize {
    self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT)
  }

  pub fn effective_offset(&self) -> usize { self.offset.unwrap_or(0) }
}

/// One page of the audit trail, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
  pub entries:  Vec<AuditEntry>,
  pub total:    usize,
  pub limit:    usize,
  pub offset:   usize,
  pub has_more: bool,
}
