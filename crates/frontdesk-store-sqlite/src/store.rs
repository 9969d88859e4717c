//! [`SqliteStore`] — the SQLite implementation of the Frontdesk store
//! traits.

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use frontdesk_core::{
  account::{Account, NewAccount, Session},
  audit::{AuditEntry, AuditPage, AuditQuery, NewAuditEntry},
  store::{AccountStore, AuditStore, VisitorStore},
  visitor::{NewVisitor, ROOM_CAPACITY, Room, Visitor},
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawAuditEntry, RawSession, RawVisitor, encode_action,
    encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

/// Column list matching [`RawVisitor::from_row`].
pub(crate) const VISITOR_COLUMNS: &str = "visitor_id, name, cpf, room, \
   birth_date, email, check_in, check_out, created_at";

const AUDIT_COLUMNS: &str = "entry_id, actor_id, actor_name, actor_cpf, \
   action, details, target_id, target_name, ip_address, user_agent, \
   created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Frontdesk store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// funnels through one connection on a dedicated thread, and the composite
/// lifecycle operations additionally run inside `BEGIN IMMEDIATE`
/// transactions, so an occupancy check and the write it guards can never
/// interleave with another writer.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── In-transaction helpers ──────────────────────────────────────────────────

fn active_in_room(
  conn: &rusqlite::Connection,
  room: &str,
) -> rusqlite::Result<u32> {
  conn.query_row(
    "SELECT COUNT(*) FROM visitors WHERE room = ?1 AND check_out IS NULL",
    rusqlite::params![room],
    |row| row.get(0),
  )
}

fn active_name_for_cpf(
  conn: &rusqlite::Connection,
  cpf: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT name FROM visitors WHERE cpf = ?1 AND check_out IS NULL \
       LIMIT 1",
      rusqlite::params![cpf],
      |row| row.get(0),
    )
    .optional()
}

fn visitor_by_id(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawVisitor>> {
  conn
    .query_row(
      &format!("SELECT {VISITOR_COLUMNS} FROM visitors WHERE visitor_id = ?1"),
      rusqlite::params![id_str],
      RawVisitor::from_row,
    )
    .optional()
}

// ─── VisitorStore impl ───────────────────────────────────────────────────────

impl VisitorStore for SqliteStore {
  type Error = Error;

  async fn create_visitor(&self, input: NewVisitor) -> Result<Visitor> {
    let now = Utc::now();
    let visitor = Visitor {
      visitor_id: Uuid::new_v4(),
      name:       input.name,
      cpf:        input.cpf,
      room:       input.room,
      birth_date: input.birth_date,
      email:      input.email,
      check_in:   now,
      check_out:  None,
      created_at: now,
    };

    let id_str    = encode_uuid(visitor.visitor_id);
    let name      = visitor.name.clone();
    let cpf_str   = visitor.cpf.to_string();
    let room      = visitor.room;
    let room_str  = visitor.room.to_string();
    let birth_str = visitor.birth_date.map(encode_date);
    let email     = visitor.email.clone();
    let now_str   = encode_dt(now);

    let outcome: Result<(), Error> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(active) = active_name_for_cpf(&tx, &cpf_str)? {
          return Ok(Err(Error::AlreadyActive { name: active }));
        }
        if active_in_room(&tx, &room_str)? >= ROOM_CAPACITY {
          return Ok(Err(Error::RoomFull { room }));
        }

        tx.execute(
          "INSERT INTO visitors (
             visitor_id, name, cpf, room, birth_date, email,
             check_in, check_out, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)",
          rusqlite::params![
            id_str, name, cpf_str, room_str, birth_str, email, now_str,
            now_str,
          ],
        )?;
        tx.commit()?;

        Ok(Ok(()))
      })
      .await?;

    outcome?;
    Ok(visitor)
  }

  async fn check_in(&self, id: Uuid) -> Result<Visitor> {
    let id_str     = encode_uuid(id);
    let new_id_str = encode_uuid(Uuid::new_v4());
    let now_str    = encode_dt(Utc::now());

    let outcome: Result<RawVisitor, Error> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(source) = visitor_by_id(&tx, &id_str)? else {
          return Ok(Err(Error::VisitorNotFound(id)));
        };

        if let Some(name) = active_name_for_cpf(&tx, &source.cpf)? {
          return Ok(Err(Error::AlreadyActive { name }));
        }

        if active_in_room(&tx, &source.room)? >= ROOM_CAPACITY {
          // The label was validated when the row was written; a parse
          // failure here means a corrupted row.
          return Ok(Err(match Room::parse(&source.room) {
            Ok(room) => Error::RoomFull { room },
            Err(e) => Error::Core(e),
          }));
        }

        tx.execute(
          "INSERT INTO visitors (
             visitor_id, name, cpf, room, birth_date, email,
             check_in, check_out, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)",
          rusqlite::params![
            new_id_str,
            source.name,
            source.cpf,
            source.room,
            source.birth_date,
            source.email,
            now_str,
            now_str,
          ],
        )?;
        tx.commit()?;

        Ok(Ok(RawVisitor {
          visitor_id: new_id_str,
          name:       source.name,
          cpf:        source.cpf,
          room:       source.room,
          birth_date: source.birth_date,
          email:      source.email,
          check_in:   now_str.clone(),
          check_out:  None,
          created_at: now_str,
        }))
      })
      .await?;

    outcome?.into_visitor()
  }

  async fn check_out(&self, id: Uuid) -> Result<Visitor> {
    let id_str  = encode_uuid(id);
    let out_str = encode_dt(Utc::now());

    let outcome: Result<RawVisitor, Error> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut existing) = visitor_by_id(&tx, &id_str)? else {
          return Ok(Err(Error::VisitorNotFound(id)));
        };
        if existing.check_out.is_some() {
          return Ok(Err(Error::AlreadyCheckedOut(id)));
        }

        tx.execute(
          "UPDATE visitors SET check_out = ?2 WHERE visitor_id = ?1",
          rusqlite::params![id_str, out_str],
        )?;
        tx.commit()?;

        existing.check_out = Some(out_str);
        Ok(Ok(existing))
      })
      .await?;

    outcome?.into_visitor()
  }

  async fn delete_visitor(&self, id: Uuid) -> Result<Visitor> {
    let id_str = encode_uuid(id);

    let outcome: Result<RawVisitor, Error> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(existing) = visitor_by_id(&tx, &id_str)? else {
          return Ok(Err(Error::VisitorNotFound(id)));
        };
        if existing.check_out.is_none() {
          return Ok(Err(Error::StillActive(id)));
        }

        tx.execute(
          "DELETE FROM visitors WHERE visitor_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;

        Ok(Ok(existing))
      })
      .await?;

    outcome?.into_visitor()
  }

  async fn get_visitor(&self, id: Uuid) -> Result<Option<Visitor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawVisitor> = self
      .conn
      .call(move |conn| Ok(visitor_by_id(conn, &id_str)?))
      .await?;

    raw.map(RawVisitor::into_visitor).transpose()
  }

  async fn list_visitors(&self, active_only: bool) -> Result<Vec<Visitor>> {
    let raws: Vec<RawVisitor> = self
      .conn
      .call(move |conn| {
        let sql = if active_only {
          format!(
            "SELECT {VISITOR_COLUMNS} FROM visitors \
             WHERE check_out IS NULL ORDER BY check_in DESC"
          )
        } else {
          format!(
            "SELECT {VISITOR_COLUMNS} FROM visitors ORDER BY check_in DESC"
          )
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawVisitor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVisitor::into_visitor).collect()
  }

  async fn search_by_cpf(&self, fragment: &str) -> Result<Vec<Visitor>> {
    let pattern = format!("%{fragment}%");

    let raws: Vec<RawVisitor> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {VISITOR_COLUMNS} FROM visitors \
           WHERE cpf LIKE ?1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], RawVisitor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Keep only the most recent record per cpf; rows arrive newest-first.
    let mut seen = HashSet::new();
    let mut visitors = Vec::new();
    for raw in raws {
      if seen.insert(raw.cpf.clone()) {
        visitors.push(raw.into_visitor()?);
      }
    }
    Ok(visitors)
  }

  async fn active_count(&self, room: Room) -> Result<u32> {
    let room_str = room.to_string();
    Ok(
      self
        .conn
        .call(move |conn| Ok(active_in_room(conn, &room_str)?))
        .await?,
    )
  }
}

// ─── AuditStore impl ─────────────────────────────────────────────────────────

impl AuditStore for SqliteStore {
  type Error = Error;

  async fn record(&self, input: NewAuditEntry) -> Result<AuditEntry> {
    let entry = AuditEntry {
      entry_id:    Uuid::new_v4(),
      actor_id:    input.actor.actor_id,
      actor_name:  input.actor.name,
      actor_cpf:   input.actor.cpf,
      action:      input.action,
      details:     input.details,
      target_id:   input.target_id,
      target_name: input.target_name,
      ip_address:  input.origin.ip_address,
      user_agent:  input.origin.user_agent,
      created_at:  Utc::now(),
    };

    let entry_id_str  = encode_uuid(entry.entry_id);
    let actor_id_str  = encode_uuid(entry.actor_id);
    let actor_name    = entry.actor_name.clone();
    let actor_cpf     = entry.actor_cpf.clone();
    let action_str    = encode_action(entry.action).to_owned();
    let details       = entry.details.clone();
    let target_id_str = entry.target_id.map(encode_uuid);
    let target_name   = entry.target_name.clone();
    let ip_address    = entry.ip_address.clone();
    let user_agent    = entry.user_agent.clone();
    let at_str        = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO audit_log (
             entry_id, actor_id, actor_name, actor_cpf, action, details,
             target_id, target_name, ip_address, user_agent, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            entry_id_str,
            actor_id_str,
            actor_name,
            actor_cpf,
            action_str,
            details,
            target_id_str,
            target_name,
            ip_address,
            user_agent,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn list(&self, query: &AuditQuery) -> Result<AuditPage> {
    let limit  = query.effective_limit();
    let offset = query.effective_offset();
    let action_str = query.action.map(encode_action).map(str::to_owned);
    let actor_str  = query.actor_id.map(encode_uuid);

    let (raws, total): (Vec<RawAuditEntry>, usize) = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; ?1/?2 slots always exist in the
        // page query thanks to the LIMIT/OFFSET placeholders.
        let mut conds: Vec<&'static str> = vec![];
        if action_str.is_some() {
          conds.push("action = ?1");
        }
        if actor_str.is_some() {
          conds.push("actor_id = ?2");
        }
        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {AUDIT_COLUMNS} FROM audit_log {where_clause} \
           ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              action_str.as_deref(),
              actor_str.as_deref(),
              limit as i64,
              offset as i64,
            ],
            RawAuditEntry::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // The COUNT query has no LIMIT placeholders, so it binds only the
        // filters that are actually present.
        let total: i64 = match (action_str.as_deref(), actor_str.as_deref())
        {
          (Some(a), Some(u)) => conn.query_row(
            "SELECT COUNT(*) FROM audit_log \
             WHERE action = ?1 AND actor_id = ?2",
            rusqlite::params![a, u],
            |row| row.get(0),
          )?,
          (Some(a), None) => conn.query_row(
            "SELECT COUNT(*) FROM audit_log WHERE action = ?1",
            rusqlite::params![a],
            |row| row.get(0),
          )?,
          (None, Some(u)) => conn.query_row(
            "SELECT COUNT(*) FROM audit_log WHERE actor_id = ?1",
            rusqlite::params![u],
            |row| row.get(0),
          )?,
          (None, None) => conn.query_row(
            "SELECT COUNT(*) FROM audit_log",
            [],
            |row| row.get(0),
          )?,
        };

        Ok((rows, total as usize))
      })
      .await?;

    let entries = raws
      .into_iter()
      .map(RawAuditEntry::into_entry)
      .collect::<Result<Vec<_>>>()?;
    let has_more = offset + entries.len() < total;

    Ok(AuditPage { entries, total, limit, offset, has_more })
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

const ACCOUNT_COLUMNS: &str =
  "account_id, name, email, cpf, password_hash, created_at";

impl AccountStore for SqliteStore {
  type Error = Error;

  async fn create_account(&self, input: NewAccount) -> Result<Account> {
    let account = Account {
      account_id:    Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      cpf:           input.cpf,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(account.account_id);
    let name   = account.name.clone();
    let email  = account.email.clone();
    let cpf    = account.cpf.clone();
    let hash   = account.password_hash.clone();
    let at_str = encode_dt(account.created_at);

    let outcome: Result<(), Error> = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM accounts WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(Error::EmailTaken(email)));
        }

        tx.execute(
          "INSERT INTO accounts (
             account_id, name, email, cpf, password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, cpf, hash, at_str],
        )?;
        tx.commit()?;

        Ok(Ok(()))
      })
      .await?;

    outcome?;
    Ok(account)
  }

  async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
    let email = email.to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"
              ),
              rusqlite::params![email],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"
              ),
              rusqlite::params![id_str],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn create_session(&self, session: Session) -> Result<()> {
    let token_hash = session.token_hash;
    let id_str     = encode_uuid(session.account_id);
    let issued_str = encode_dt(session.issued_at);
    let expiry_str = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, account_id, issued_at, \
           expires_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, id_str, issued_str, expiry_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
    let token_hash = token_hash.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token_hash, account_id, issued_at, expires_at \
               FROM sessions WHERE token_hash = ?1",
              rusqlite::params![token_hash],
              RawSession::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<bool> {
    let token_hash = token_hash.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
