//! Store traits implemented by persistence backends.
//!
//! Higher layers (the [`crate::Reception`] controller, the HTTP API) depend
//! on these abstractions, not on any concrete backend. The composite
//! lifecycle operations are deliberately part of the store surface: the
//! occupancy check and the row write they guard must run as one atomic
//! unit, which only the backend can guarantee.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, NewAccount, Session},
  audit::{AuditEntry, AuditPage, AuditQuery, NewAuditEntry},
  visitor::{NewVisitor, Room, Visitor},
};

// ─── Visitors ────────────────────────────────────────────────────────────────

/// Abstraction over the visitor-record backend.
pub trait VisitorStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create a record for a brand-new visit, with server-assigned
  /// timestamps and a `None` check-out.
  ///
  /// The duplicate-active check, the capacity check, and the insert run as
  /// one atomic unit; two concurrent calls against the same room cannot
  /// both observe a free slot.
  fn create_visitor(
    &self,
    input: NewVisitor,
  ) -> impl Future<Output = Result<Visitor, Self::Error>> + Send + '_;

  /// Re-visit by an existing profile: clone name, cpf, room, birth date,
  /// and email from the referenced record into a brand-new record with a
  /// fresh check-in. The source record is left untouched.
  ///
  /// Fails if the record is unknown, if any record with the same cpf is
  /// still active, or if the room is at capacity — all checked atomically
  /// with the insert.
  fn check_in(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Visitor, Self::Error>> + Send + '_;

  /// Close the visit by setting the check-out timestamp, exactly once.
  /// A second call on the same record fails rather than silently
  /// succeeding.
  fn check_out(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Visitor, Self::Error>> + Send + '_;

  /// Permanently remove a completed visit and return the deleted snapshot.
  /// Records with no check-out timestamp are refused.
  fn delete_visitor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Visitor, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_visitor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Visitor>, Self::Error>> + Send + '_;

  /// All records ordered by check-in descending, optionally restricted to
  /// active visits.
  fn list_visitors(
    &self,
    active_only: bool,
  ) -> impl Future<Output = Result<Vec<Visitor>, Self::Error>> + Send + '_;

  /// The most recent record per distinct cpf containing `fragment`,
  /// ordered by recency. Drives the check-in-by-existing-profile flow.
  fn search_by_cpf<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<Visitor>, Self::Error>> + Send + 'a;

  /// Number of records in `room` with no check-out timestamp.
  fn active_count(
    &self,
    room: Room,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;
}

// ─── Audit trail ─────────────────────────────────────────────────────────────

/// Abstraction over the append-only audit log.
pub trait AuditStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Persist one audit row. `entry_id` and `created_at` are assigned by
  /// the store.
  fn record(
    &self,
    entry: NewAuditEntry,
  ) -> impl Future<Output = Result<AuditEntry, Self::Error>> + Send + '_;

  /// Page through the audit trail, newest first.
  fn list<'a>(
    &'a self,
    query: &'a AuditQuery,
  ) -> impl Future<Output = Result<AuditPage, Self::Error>> + Send + 'a;
}

// ─── Accounts & sessions ─────────────────────────────────────────────────────

/// Abstraction over operator accounts and their sessions. Consumed by the
/// API auth layer, not by the lifecycle controller.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Create an account. Fails if the email is already taken.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  fn create_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn find_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Returns whether a session row was actually removed.
  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
