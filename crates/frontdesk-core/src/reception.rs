//! The visit lifecycle controller.
//!
//! [`Reception`] orchestrates registration, check-in, check-out, and
//! deletion against a storage backend, and records every state-changing
//! attempt — rejected or completed — in the audit trail. Identity and
//! request origin are passed explicitly into every call; there is no
//! ambient session state.

use uuid::Uuid;

use crate::{
  Error, Result,
  audit::{
    Actor, AuditAction, AuditPage, AuditQuery, NewAuditEntry, RequestOrigin,
  },
  store::{AuditStore, VisitorStore},
  visitor::{HistoryReport, ROOM_CAPACITY, Room, Visitor, VisitorDraft},
};

/// Orchestrates the visit lifecycle over a storage backend.
///
/// Cloning is as cheap as cloning the backend itself.
#[derive(Clone)]
pub struct Reception<S> {
  store: S,
}

impl<S> Reception<S>
where
  S: VisitorStore + AuditStore,
{
  pub fn new(store: S) -> Self { Self { store } }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Register a visitor and open their visit.
  ///
  /// Validation failures are returned without touching the store; business
  /// rejections and successes are both audited.
  pub async fn register(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    draft: VisitorDraft,
  ) -> Result<Visitor> {
    let input = draft.validate()?;
    let name = input.name.clone();
    let room = input.room;

    match self.store.create_visitor(input).await.map_err(Into::into) {
      Ok(visitor) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::CreateVisitor)
              .target_id(visitor.visitor_id)
              .target_name(&visitor.name)
              .details(format!("visitor registered in {}", visitor.room)),
          )
          .await;
        Ok(visitor)
      }
      Err(err @ Error::RoomFull { .. }) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::CreateVisitor)
              .target_name(&name)
              .details(format!("registration attempt for {room}: room full")),
          )
          .await;
        Err(err)
      }
      Err(err @ Error::AlreadyActive { .. }) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::CreateVisitor)
              .target_name(&name)
              .details(
                "registration attempt while an earlier visit is still active",
              ),
          )
          .await;
        Err(err)
      }
      Err(err) => Err(err),
    }
  }

  /// Check in by an existing record id. Creates a brand-new record cloned
  /// from the referenced one; the old record is left untouched.
  pub async fn check_in(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    id: Uuid,
  ) -> Result<Visitor> {
    match self.store.check_in(id).await.map_err(Into::into) {
      Ok(visitor) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::CheckInVisitor)
              .target_id(visitor.visitor_id)
              .target_name(&visitor.name)
              .details(format!("check-in completed for {}", visitor.room)),
          )
          .await;
        Ok(visitor)
      }
      Err(err) => {
        let rejection = match &err {
          Error::VisitorNotFound(_) => {
            Some("check-in attempt for an unknown visitor".to_owned())
          }
          Error::AlreadyActive { name } => {
            Some(format!("check-in attempt while {name} is already active"))
          }
          Error::RoomFull { room } => {
            Some(format!("check-in attempt for {room}: room full"))
          }
          _ => None,
        };
        if let Some(details) = rejection {
          self
            .audit(
              NewAuditEntry::new(actor, origin, AuditAction::CheckInVisitor)
                .target_id(id)
                .details(details),
            )
            .await;
        }
        Err(err)
      }
    }
  }

  /// Close a visit. The check-out timestamp is set exactly once; a second
  /// call fails with [`Error::AlreadyCheckedOut`].
  pub async fn check_out(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    id: Uuid,
  ) -> Result<Visitor> {
    match self.store.check_out(id).await.map_err(Into::into) {
      Ok(visitor) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::CheckOutVisitor)
              .target_id(visitor.visitor_id)
              .target_name(&visitor.name)
              .details(format!("checkout completed for {}", visitor.room)),
          )
          .await;
        Ok(visitor)
      }
      Err(err) => {
        let rejection = match &err {
          Error::VisitorNotFound(_) => {
            Some("checkout attempt for an unknown visitor".to_owned())
          }
          Error::AlreadyCheckedOut(_) => {
            Some("checkout attempt for a visitor already checked out".to_owned())
          }
          _ => None,
        };
        if let Some(details) = rejection {
          self
            .audit(
              NewAuditEntry::new(actor, origin, AuditAction::CheckOutVisitor)
                .target_id(id)
                .details(details),
            )
            .await;
        }
        Err(err)
      }
    }
  }

  /// Permanently remove a completed visit and return the deleted snapshot.
  pub async fn delete(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    id: Uuid,
  ) -> Result<Visitor> {
    match self.store.delete_visitor(id).await.map_err(Into::into) {
      Ok(visitor) => {
        self
          .audit(
            NewAuditEntry::new(actor, origin, AuditAction::DeleteVisitor)
              .target_id(visitor.visitor_id)
              .target_name(&visitor.name)
              .details("visitor record deleted"),
          )
          .await;
        Ok(visitor)
      }
      Err(err) => {
        let rejection = match &err {
          Error::VisitorNotFound(_) => {
            Some("deletion attempt for an unknown visitor".to_owned())
          }
          Error::StillActive(_) => {
            Some("deletion attempt for an active visitor".to_owned())
          }
          _ => None,
        };
        if let Some(details) = rejection {
          self
            .audit(
              NewAuditEntry::new(actor, origin, AuditAction::DeleteVisitor)
                .target_id(id)
                .details(details),
            )
            .await;
        }
        Err(err)
      }
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Find the most recent record per distinct cpf containing `fragment`.
  /// The fragment is normalised to digits, like stored cpfs.
  pub async fn search(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    fragment: &str,
  ) -> Result<Vec<Visitor>> {
    let digits: String =
      fragment.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
      return Err(Error::Validation(
        "cpf fragment must contain at least one digit".into(),
      ));
    }

    let matches =
      self.store.search_by_cpf(&digits).await.map_err(Into::into)?;
    self
      .audit(
        NewAuditEntry::new(actor, origin, AuditAction::SearchVisitors)
          .details(format!(
            "cpf search {:?}: {} result(s)",
            digits,
            matches.len()
          )),
      )
      .await;
    Ok(matches)
  }

  /// All records ordered by check-in descending, optionally restricted to
  /// active visits.
  pub async fn list(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    active_only: bool,
  ) -> Result<Vec<Visitor>> {
    let visitors =
      self.store.list_visitors(active_only).await.map_err(Into::into)?;
    self
      .audit(
        NewAuditEntry::new(actor, origin, AuditAction::ListVisitors).details(
          format!("visitor list accessed: {} record(s)", visitors.len()),
        ),
      )
      .await;
    Ok(visitors)
  }

  /// The full visit history, newest first, with derived status, duration,
  /// and summary counts.
  pub async fn history(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
  ) -> Result<HistoryReport> {
    let visitors =
      self.store.list_visitors(false).await.map_err(Into::into)?;
    let report = HistoryReport::from_visitors(visitors);
    self
      .audit(
        NewAuditEntry::new(actor, origin, AuditAction::ViewHistory).details(
          format!(
            "history accessed: {} record(s) ({} active, {} completed)",
            report.total, report.active, report.completed
          ),
        ),
      )
      .await;
    Ok(report)
  }

  /// Page through the audit trail.
  pub async fn audit_log(
    &self,
    actor: &Actor,
    origin: &RequestOrigin,
    query: &AuditQuery,
  ) -> Result<AuditPage> {
    let page = self.store.list(query).await.map_err(Into::into)?;
    self
      .audit(
        NewAuditEntry::new(actor, origin, AuditAction::ViewAuditLog).details(
          format!(
            "audit log accessed: {} of {} entries",
            page.entries.len(),
            page.total
          ),
        ),
      )
      .await;
    Ok(page)
  }

  // ── Occupancy ─────────────────────────────────────────────────────────

  /// Number of active visits in `room`.
  pub async fn active_count(&self, room: Room) -> Result<u32> {
    self.store.active_count(room).await.map_err(Into::into)
  }

  /// Whether `room` is at the [`ROOM_CAPACITY`] cap.
  pub async fn is_full(&self, room: Room) -> Result<bool> {
    Ok(self.active_count(room).await? >= ROOM_CAPACITY)
  }

  // ── Audit plumbing ────────────────────────────────────────────────────

  /// Best-effort audit write. A failed write is logged and swallowed so it
  /// can never mask the outcome of the operation it accompanies.
  async fn audit(&self, entry: NewAuditEntry) {
    if let Err(err) = self.store.record(entry).await {
      tracing::warn!(error = %err, "audit write failed");
    }
  }
}
