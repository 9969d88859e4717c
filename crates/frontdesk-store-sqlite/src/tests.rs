//! Integration tests for `SqliteStore` — and the [`Reception`] controller
//! running over it — against an in-memory database.

use frontdesk_core::{
  Reception,
  account::NewAccount,
  audit::{Actor, AuditAction, AuditQuery, NewAuditEntry, RequestOrigin},
  store::{AccountStore, AuditStore, VisitorStore},
  visitor::{Cpf, NewVisitor, ROOM_CAPACITY, Room, VisitStatus, VisitorDraft},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn actor() -> Actor {
  Actor {
    actor_id: Uuid::new_v4(),
    name:     "Front Desk".into(),
    cpf:      Some("99988877766".into()),
  }
}

fn origin() -> RequestOrigin {
  RequestOrigin {
    ip_address: Some("10.0.0.7".into()),
    user_agent: Some("tests".into()),
  }
}

fn new_visitor(name: &str, cpf: &str, room: u8) -> NewVisitor {
  NewVisitor {
    name:       name.into(),
    cpf:        Cpf::parse(cpf).unwrap(),
    room:       Room::new(room).unwrap(),
    birth_date: None,
    email:      None,
  }
}

fn draft(name: &str, cpf: &str, room: &str) -> VisitorDraft {
  VisitorDraft {
    name:       name.into(),
    cpf:        cpf.into(),
    room:       room.into(),
    birth_date: None,
    email:      None,
  }
}

// ─── Visitor CRUD ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_visitor() {
  let s = store().await;

  let created = s
    .create_visitor(new_visitor("Ana Souza", "12345678901", 1))
    .await
    .unwrap();
  assert!(created.is_active());
  assert_eq!(created.status(), VisitStatus::Active);

  let fetched = s.get_visitor(created.visitor_id).await.unwrap().unwrap();
  assert_eq!(fetched.visitor_id, created.visitor_id);
  assert_eq!(fetched.name, "Ana Souza");
  assert_eq!(fetched.cpf.as_str(), "12345678901");
  assert_eq!(fetched.room.number(), 1);
  assert!(fetched.check_out.is_none());
}

#[tokio::test]
async fn get_visitor_missing_returns_none() {
  let s = store().await;
  assert!(s.get_visitor(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_visitors_orders_and_filters() {
  let s = store().await;

  let first = s
    .create_visitor(new_visitor("Ana", "11111111111", 1))
    .await
    .unwrap();
  let second = s
    .create_visitor(new_visitor("Bruno", "22222222222", 2))
    .await
    .unwrap();
  s.check_out(first.visitor_id).await.unwrap();

  let all = s.list_visitors(false).await.unwrap();
  assert_eq!(all.len(), 2);
  // Newest check-in first.
  assert_eq!(all[0].visitor_id, second.visitor_id);
  assert_eq!(all[1].visitor_id, first.visitor_id);

  let active = s.list_visitors(true).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].visitor_id, second.visitor_id);
}

// ─── Occupancy ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn room_capacity_is_enforced_and_no_record_is_created() {
  let s = store().await;

  for (i, cpf) in ["11111111111", "22222222222", "33333333333"]
    .iter()
    .enumerate()
  {
    s.create_visitor(new_visitor(&format!("Visitor {i}"), cpf, 2))
      .await
      .unwrap();
  }
  assert_eq!(s.active_count(Room::new(2).unwrap()).await.unwrap(), 3);

  let err = s
    .create_visitor(new_visitor("Fourth", "44444444444", 2))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RoomFull { .. }));

  // The rejected registration must not have left a row behind.
  assert_eq!(s.active_count(Room::new(2).unwrap()).await.unwrap(), 3);
  assert_eq!(s.list_visitors(false).await.unwrap().len(), 3);
}

#[tokio::test]
async fn capacity_only_counts_active_visits() {
  let s = store().await;

  let done = s
    .create_visitor(new_visitor("Ana", "11111111111", 1))
    .await
    .unwrap();
  s.check_out(done.visitor_id).await.unwrap();

  for cpf in ["22222222222", "33333333333", "44444444444"] {
    s.create_visitor(new_visitor("V", cpf, 1)).await.unwrap();
  }
  assert_eq!(s.active_count(Room::new(1).unwrap()).await.unwrap(), 3);
}

#[tokio::test]
async fn create_rejects_duplicate_active_cpf() {
  let s = store().await;

  s.create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();

  let err = s
    .create_visitor(new_visitor("Ana", "12345678901", 2))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::AlreadyActive { ref name } if name == "Ana"));
}

// ─── Check-out ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn check_out_sets_timestamp_exactly_once() {
  let s = store().await;

  let v = s
    .create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();

  let closed = s.check_out(v.visitor_id).await.unwrap();
  assert!(closed.check_out.is_some());
  assert_eq!(closed.status(), VisitStatus::CheckedOut);

  let err = s.check_out(v.visitor_id).await.unwrap_err();
  assert!(matches!(err, crate::Error::AlreadyCheckedOut(id) if id == v.visitor_id));

  // The original timestamp is untouched.
  let fetched = s.get_visitor(v.visitor_id).await.unwrap().unwrap();
  assert_eq!(fetched.check_out, closed.check_out);
}

#[tokio::test]
async fn check_out_missing_errors() {
  let s = store().await;
  let err = s.check_out(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::VisitorNotFound(_)));
}

// ─── Check-in (re-visit) ─────────────────────────────────────────────────────

#[tokio::test]
async fn check_in_clones_into_a_fresh_record() {
  let s = store().await;

  let original = s
    .create_visitor(NewVisitor {
      email: Some("ana@example.com".into()),
      ..new_visitor("Ana", "12345678901", 1)
    })
    .await
    .unwrap();
  s.check_out(original.visitor_id).await.unwrap();

  let revisit = s.check_in(original.visitor_id).await.unwrap();
  assert_ne!(revisit.visitor_id, original.visitor_id);
  assert_eq!(revisit.name, original.name);
  assert_eq!(revisit.cpf, original.cpf);
  assert_eq!(revisit.room, original.room);
  assert_eq!(revisit.email, original.email);
  assert!(revisit.check_out.is_none());
  assert!(revisit.check_in > original.check_in);

  // The source record is unchanged.
  let old = s.get_visitor(original.visitor_id).await.unwrap().unwrap();
  assert!(old.check_out.is_some());
  assert_eq!(old.check_in, original.check_in);
}

#[tokio::test]
async fn check_in_missing_errors() {
  let s = store().await;
  let err = s.check_in(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::VisitorNotFound(_)));
}

#[tokio::test]
async fn check_in_rejects_duplicate_active_cpf() {
  let s = store().await;

  // A completed visit and a later active one for the same person.
  let first = s
    .create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();
  s.check_out(first.visitor_id).await.unwrap();
  s.create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();

  let err = s.check_in(first.visitor_id).await.unwrap_err();
  assert!(matches!(err, crate::Error::AlreadyActive { ref name } if name == "Ana"));
}

#[tokio::test]
async fn check_in_rejects_full_room() {
  let s = store().await;

  // A completed visit in room 3, then fill the room with other people.
  let done = s
    .create_visitor(new_visitor("Ana", "12345678901", 3))
    .await
    .unwrap();
  s.check_out(done.visitor_id).await.unwrap();

  for cpf in ["22222222222", "33333333333", "44444444444"] {
    s.create_visitor(new_visitor("V", cpf, 3)).await.unwrap();
  }

  let err = s.check_in(done.visitor_id).await.unwrap_err();
  assert!(
    matches!(err, crate::Error::RoomFull { room } if room.number() == 3)
  );
  assert_eq!(s.active_count(Room::new(3).unwrap()).await.unwrap(), 3);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_active_visitor_is_refused() {
  let s = store().await;

  let v = s
    .create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();
  let err = s.delete_visitor(v.visitor_id).await.unwrap_err();
  assert!(matches!(err, crate::Error::StillActive(id) if id == v.visitor_id));

  // Still there.
  assert!(s.get_visitor(v.visitor_id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_after_check_out_removes_the_record() {
  let s = store().await;

  let v = s
    .create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();
  s.check_out(v.visitor_id).await.unwrap();

  let snapshot = s.delete_visitor(v.visitor_id).await.unwrap();
  assert_eq!(snapshot.visitor_id, v.visitor_id);
  assert_eq!(snapshot.name, "Ana");
  assert!(snapshot.check_out.is_some());

  assert!(s.get_visitor(v.visitor_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_errors() {
  let s = store().await;
  let err = s.delete_visitor(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::VisitorNotFound(_)));
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_returns_most_recent_record_per_cpf() {
  let s = store().await;

  let first = s
    .create_visitor(new_visitor("Ana", "12345678901", 1))
    .await
    .unwrap();
  s.check_out(first.visitor_id).await.unwrap();
  let second = s
    .create_visitor(new_visitor("Ana", "12345678901", 2))
    .await
    .unwrap();
  s.create_visitor(new_visitor("Bruno", "12345678902", 1))
    .await
    .unwrap();

  let results = s.search_by_cpf("1234567890").await.unwrap();
  assert_eq!(results.len(), 2);
  // One entry per cpf, and for Ana it is the newest record.
  let ana = results
    .iter()
    .find(|v| v.cpf.as_str() == "12345678901")
    .unwrap();
  assert_eq!(ana.visitor_id, second.visitor_id);

  let narrowed = s.search_by_cpf("78902").await.unwrap();
  assert_eq!(narrowed.len(), 1);
  assert_eq!(narrowed[0].name, "Bruno");

  assert!(s.search_by_cpf("00000").await.unwrap().is_empty());
}

// ─── Audit log ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_list_audit_entries() {
  let s = store().await;
  let actor = actor();

  let entry = s
    .record(
      NewAuditEntry::new(&actor, &origin(), AuditAction::CreateVisitor)
        .target_id(Uuid::new_v4())
        .target_name("Ana")
        .details("visitor registered in Room 1"),
    )
    .await
    .unwrap();
  assert_eq!(entry.actor_name, "Front Desk");
  assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.7"));

  let page = s.list(&AuditQuery::default()).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.entries.len(), 1);
  assert!(!page.has_more);

  let fetched = &page.entries[0];
  assert_eq!(fetched.entry_id, entry.entry_id);
  assert_eq!(fetched.action, AuditAction::CreateVisitor);
  assert_eq!(fetched.details.as_deref(), Some("visitor registered in Room 1"));
}

#[tokio::test]
async fn audit_list_filters_and_paginates() {
  let s = store().await;
  let first_actor = actor();
  let second_actor = actor();

  for i in 0..5 {
    s.record(
      NewAuditEntry::new(&first_actor, &origin(), AuditAction::CreateVisitor)
        .details(format!("entry {i}")),
    )
    .await
    .unwrap();
  }
  s.record(NewAuditEntry::new(
    &second_actor,
    &origin(),
    AuditAction::ViewHistory,
  ))
  .await
  .unwrap();

  // Filter by action.
  let page = s
    .list(&AuditQuery {
      action: Some(AuditAction::CreateVisitor),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 5);
  assert!(
    page
      .entries
      .iter()
      .all(|e| e.action == AuditAction::CreateVisitor)
  );

  // Filter by actor.
  let page = s
    .list(&AuditQuery {
      actor_id: Some(second_actor.actor_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.entries[0].action, AuditAction::ViewHistory);

  // Pagination.
  let page = s
    .list(&AuditQuery { limit: Some(4), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.total, 6);
  assert_eq!(page.entries.len(), 4);
  assert!(page.has_more);

  let rest = s
    .list(&AuditQuery {
      limit: Some(4),
      offset: Some(4),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(rest.entries.len(), 2);
  assert!(!rest.has_more);
}

// ─── Accounts & sessions ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_account_and_find_by_email() {
  let s = store().await;

  let account = s
    .create_account(NewAccount {
      name:          "Clara Lima".into(),
      email:         "clara@example.com".into(),
      cpf:           Some("55544433322".into()),
      password_hash: "$argon2id$stub".into(),
    })
    .await
    .unwrap();

  let found = s
    .find_account_by_email("clara@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.account_id, account.account_id);
  assert_eq!(found.password_hash, "$argon2id$stub");

  assert!(
    s.find_account_by_email("nobody@example.com")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;

  let input = NewAccount {
    name:          "Clara".into(),
    email:         "clara@example.com".into(),
    cpf:           None,
    password_hash: "$argon2id$stub".into(),
  };
  s.create_account(input.clone()).await.unwrap();

  let err = s.create_account(input).await.unwrap_err();
  assert!(matches!(err, crate::Error::EmailTaken(ref e) if e == "clara@example.com"));
}

#[tokio::test]
async fn session_round_trip_and_revocation() {
  let s = store().await;

  let account = s
    .create_account(NewAccount {
      name:          "Clara".into(),
      email:         "clara@example.com".into(),
      cpf:           None,
      password_hash: "$argon2id$stub".into(),
    })
    .await
    .unwrap();

  let now = chrono::Utc::now();
  s.create_session(frontdesk_core::account::Session {
    token_hash: "deadbeef".into(),
    account_id: account.account_id,
    issued_at:  now,
    expires_at: now + chrono::Duration::days(7),
  })
  .await
  .unwrap();

  let session = s.find_session("deadbeef").await.unwrap().unwrap();
  assert_eq!(session.account_id, account.account_id);
  assert!(!session.is_expired(now));

  assert!(s.delete_session("deadbeef").await.unwrap());
  assert!(s.find_session("deadbeef").await.unwrap().is_none());
  assert!(!s.delete_session("deadbeef").await.unwrap());
}

// ─── Reception over the store ────────────────────────────────────────────────

#[tokio::test]
async fn reception_register_validates_before_touching_the_store() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  for bad in [
    draft("", "12345678901", "Room 1"),
    draft("Ana", "123", "Room 1"),
    draft("Ana", "12345678901", "Room 9"),
  ] {
    let err = reception.register(&actor, &origin, bad).await.unwrap_err();
    assert!(matches!(err, frontdesk_core::Error::Validation(_)));
  }

  let mut bad_email = draft("Ana", "12345678901", "Room 1");
  bad_email.email = Some("not-an-email".into());
  let err = reception
    .register(&actor, &origin, bad_email)
    .await
    .unwrap_err();
  assert!(matches!(err, frontdesk_core::Error::Validation(_)));

  // No rows, no audit entries.
  assert!(s.list_visitors(false).await.unwrap().is_empty());
  assert_eq!(s.list(&AuditQuery::default()).await.unwrap().total, 0);
}

#[tokio::test]
async fn reception_register_audits_success() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();

  let visitor = reception
    .register(&actor, &origin(), draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();

  let page = s
    .list(&AuditQuery {
      action: Some(AuditAction::CreateVisitor),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  let entry = &page.entries[0];
  assert_eq!(entry.actor_id, actor.actor_id);
  assert_eq!(entry.target_id, Some(visitor.visitor_id));
  assert_eq!(entry.target_name.as_deref(), Some("Ana"));
  assert_eq!(entry.details.as_deref(), Some("visitor registered in Room 1"));
}

#[tokio::test]
async fn reception_audits_capacity_rejection() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  for (name, cpf) in
    [("A", "11111111111"), ("B", "22222222222"), ("C", "33333333333")]
  {
    reception
      .register(&actor, &origin, draft(name, cpf, "Room 2"))
      .await
      .unwrap();
  }

  let err = reception
    .register(&actor, &origin, draft("D", "44444444444", "Room 2"))
    .await
    .unwrap_err();
  assert!(matches!(err, frontdesk_core::Error::RoomFull { room } if room.number() == 2));

  let page = s
    .list(&AuditQuery {
      action: Some(AuditAction::CreateVisitor),
      ..Default::default()
    })
    .await
    .unwrap();
  // Three successes plus one rejected attempt.
  assert_eq!(page.total, 4);
  let rejection = page
    .entries
    .iter()
    .find(|e| e.target_id.is_none())
    .unwrap();
  assert_eq!(rejection.target_name.as_deref(), Some("D"));
  assert_eq!(
    rejection.details.as_deref(),
    Some("registration attempt for Room 2: room full")
  );
}

#[tokio::test]
async fn reception_revisit_scenario() {
  // register -> check out -> check in by the old record id.
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  let ana = reception
    .register(&actor, &origin, draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();
  reception
    .check_out(&actor, &origin, ana.visitor_id)
    .await
    .unwrap();

  let revisit = reception
    .check_in(&actor, &origin, ana.visitor_id)
    .await
    .unwrap();
  assert_ne!(revisit.visitor_id, ana.visitor_id);
  assert_eq!(revisit.cpf.as_str(), "12345678901");
  assert_eq!(revisit.room.number(), 1);
  assert!(revisit.is_active());

  // One audit entry per operation.
  let page = s.list(&AuditQuery::default()).await.unwrap();
  assert_eq!(page.total, 3);
}

#[tokio::test]
async fn reception_audits_failed_attempts() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  let ghost = Uuid::new_v4();
  assert!(reception.check_in(&actor, &origin, ghost).await.is_err());
  assert!(reception.check_out(&actor, &origin, ghost).await.is_err());
  assert!(reception.delete(&actor, &origin, ghost).await.is_err());

  let active = reception
    .register(&actor, &origin, draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();
  assert!(
    reception
      .delete(&actor, &origin, active.visitor_id)
      .await
      .is_err()
  );

  // 3 not-found attempts + 1 registration + 1 delete-while-active attempt.
  let page = s.list(&AuditQuery::default()).await.unwrap();
  assert_eq!(page.total, 5);
  let delete_attempts = page
    .entries
    .iter()
    .filter(|e| e.action == AuditAction::DeleteVisitor)
    .count();
  assert_eq!(delete_attempts, 2);
}

#[tokio::test]
async fn concurrent_registers_never_exceed_capacity() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  // Room 2 currently holds 2 active visitors.
  for (name, cpf) in [("A", "11111111111"), ("B", "22222222222")] {
    reception
      .register(&actor, &origin, draft(name, cpf, "Room 2"))
      .await
      .unwrap();
  }

  let (left, right) = tokio::join!(
    reception.register(&actor, &origin, draft("C", "33333333333", "Room 2")),
    reception.register(&actor, &origin, draft("D", "44444444444", "Room 2")),
  );

  let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
  assert_eq!(successes, 1, "exactly one concurrent register may win");

  let loser = if left.is_err() { left } else { right };
  assert!(matches!(
    loser.unwrap_err(),
    frontdesk_core::Error::RoomFull { .. }
  ));

  assert_eq!(s.active_count(Room::new(2).unwrap()).await.unwrap(), ROOM_CAPACITY);
}

#[tokio::test]
async fn reception_history_and_search() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  let ana = reception
    .register(&actor, &origin, draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();
  reception
    .check_out(&actor, &origin, ana.visitor_id)
    .await
    .unwrap();
  reception
    .register(&actor, &origin, draft("Bruno", "12345678902", "Room 2"))
    .await
    .unwrap();

  let report = reception.history(&actor, &origin).await.unwrap();
  assert_eq!(report.total, 2);
  assert_eq!(report.active, 1);
  assert_eq!(report.completed, 1);
  let done = report
    .history
    .iter()
    .find(|h| h.status == VisitStatus::CheckedOut)
    .unwrap();
  assert!(done.duration.is_some());

  // Formatted input is normalised to digits before matching.
  let found = reception
    .search(&actor, &origin, "123.456.789-01")
    .await
    .unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].name, "Ana");

  let err = reception.search(&actor, &origin, "  ").await.unwrap_err();
  assert!(matches!(err, frontdesk_core::Error::Validation(_)));
}

#[tokio::test]
async fn reception_audit_log_passthrough_is_itself_audited() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  reception
    .register(&actor, &origin, draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();

  let page = reception
    .audit_log(&actor, &origin, &AuditQuery::default())
    .await
    .unwrap();
  assert_eq!(page.total, 1);

  // The view itself appended an entry.
  let after = s.list(&AuditQuery::default()).await.unwrap();
  assert_eq!(after.total, 2);
  assert_eq!(after.entries[0].action, AuditAction::ViewAuditLog);
}

#[tokio::test]
async fn reception_occupancy_passthrough() {
  let s = store().await;
  let reception = Reception::new(s.clone());
  let actor = actor();
  let origin = origin();

  let room = Room::new(4).unwrap();
  assert_eq!(reception.active_count(room).await.unwrap(), 0);
  assert!(!reception.is_full(room).await.unwrap());

  for cpf in ["11111111111", "22222222222", "33333333333"] {
    reception
      .register(&actor, &origin, draft("V", cpf, "Room 4"))
      .await
      .unwrap();
  }
  assert_eq!(reception.active_count(room).await.unwrap(), 3);
  assert!(reception.is_full(room).await.unwrap());
}

// ─── Audit failures must not surface ─────────────────────────────────────────

/// Delegates visitor operations to a real store but fails every audit
/// write, to prove the primary operation is unaffected.
#[derive(Clone)]
struct FlakyAuditStore {
  inner: SqliteStore,
}

impl VisitorStore for FlakyAuditStore {
  type Error = crate::Error;

  async fn create_visitor(
    &self,
    input: NewVisitor,
  ) -> Result<frontdesk_core::visitor::Visitor, Self::Error> {
    self.inner.create_visitor(input).await
  }

  async fn check_in(
    &self,
    id: Uuid,
  ) -> Result<frontdesk_core::visitor::Visitor, Self::Error> {
    self.inner.check_in(id).await
  }

  async fn check_out(
    &self,
    id: Uuid,
  ) -> Result<frontdesk_core::visitor::Visitor, Self::Error> {
    self.inner.check_out(id).await
  }

  async fn delete_visitor(
    &self,
    id: Uuid,
  ) -> Result<frontdesk_core::visitor::Visitor, Self::Error> {
    self.inner.delete_visitor(id).await
  }

  async fn get_visitor(
    &self,
    id: Uuid,
  ) -> Result<Option<frontdesk_core::visitor::Visitor>, Self::Error> {
    self.inner.get_visitor(id).await
  }

  async fn list_visitors(
    &self,
    active_only: bool,
  ) -> Result<Vec<frontdesk_core::visitor::Visitor>, Self::Error> {
    self.inner.list_visitors(active_only).await
  }

  async fn search_by_cpf(
    &self,
    fragment: &str,
  ) -> Result<Vec<frontdesk_core::visitor::Visitor>, Self::Error> {
    self.inner.search_by_cpf(fragment).await
  }

  async fn active_count(&self, room: Room) -> Result<u32, Self::Error> {
    self.inner.active_count(room).await
  }
}

impl AuditStore for FlakyAuditStore {
  type Error = crate::Error;

  async fn record(
    &self,
    _entry: NewAuditEntry,
  ) -> Result<frontdesk_core::audit::AuditEntry, Self::Error> {
    Err(crate::Error::DateParse("audit sink down".into()))
  }

  async fn list(
    &self,
    query: &AuditQuery,
  ) -> Result<frontdesk_core::audit::AuditPage, Self::Error> {
    self.inner.list(query).await
  }
}

#[tokio::test]
async fn audit_write_failure_never_fails_the_operation() {
  let inner = store().await;
  let reception = Reception::new(FlakyAuditStore { inner: inner.clone() });
  let actor = actor();
  let origin = origin();

  let visitor = reception
    .register(&actor, &origin, draft("Ana", "12345678901", "Room 1"))
    .await
    .unwrap();
  reception
    .check_out(&actor, &origin, visitor.visitor_id)
    .await
    .unwrap();
  reception
    .delete(&actor, &origin, visitor.visitor_id)
    .await
    .unwrap();

  // Nothing was audited, and nothing failed.
  assert_eq!(inner.list(&AuditQuery::default()).await.unwrap().total, 0);
}
