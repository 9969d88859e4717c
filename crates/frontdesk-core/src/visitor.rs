//! Visitor records — the fundamental unit of the reception store.
//!
//! A record represents one visit instance, created at check-in. A repeat
//! visit by the same person creates a *new* record cloned from the previous
//! one; records are never reactivated. The check-out timestamp is set
//! exactly once, and a `None` check-out marks the visit as active.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum number of simultaneously active visits per room.
pub const ROOM_CAPACITY: u32 = 3;

/// Number of rooms in the building. Rooms are addressed 1 through
/// [`ROOM_COUNT`].
pub const ROOM_COUNT: u8 = 5;

// ─── Room ────────────────────────────────────────────────────────────────────

/// One of the fixed set of destination rooms. Displayed (and stored) as its
/// label, e.g. `"Room 3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Room(u8);

impl Room {
  pub fn new(number: u8) -> Result<Self> {
    if (1..=ROOM_COUNT).contains(&number) {
      Ok(Self(number))
    } else {
      Err(Error::Validation(format!("no such room: Room {number}")))
    }
  }

  /// Parse a room label of the form `"Room 3"`.
  pub fn parse(label: &str) -> Result<Self> {
    label
      .trim()
      .strip_prefix("Room ")
      .and_then(|n| n.parse::<u8>().ok())
      .ok_or_else(|| Error::Validation(format!("unrecognised room: {label:?}")))
      .and_then(Self::new)
  }

  pub fn number(self) -> u8 { self.0 }

  pub fn all() -> impl Iterator<Item = Room> { (1..=ROOM_COUNT).map(Room) }
}

impl fmt::Display for Room {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Room {}", self.0)
  }
}

impl TryFrom<String> for Room {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<Room> for String {
  fn from(room: Room) -> Self { room.to_string() }
}

// ─── Cpf ─────────────────────────────────────────────────────────────────────

/// A per-person identifier, normalised to its bare digits. Punctuation in
/// the input (`123.456.789-01`) is stripped; anything outside 10 to 14
/// digits is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
  pub fn parse(raw: &str) -> Result<Self> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
      10..=14 => Ok(Self(digits)),
      n => Err(Error::Validation(format!(
        "cpf must contain 10 to 14 digits, got {n}"
      ))),
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Cpf {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for Cpf {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { Self::parse(&s) }
}

impl From<Cpf> for String {
  fn from(cpf: Cpf) -> Self { cpf.0 }
}

// ─── Visitor ─────────────────────────────────────────────────────────────────

/// The lifecycle state of a visit, derived from its check-out timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
  Active,
  CheckedOut,
}

/// One visit instance. `check_in` and `created_at` are server-assigned at
/// creation; `check_out` is set exactly once, by the check-out operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visitor {
  pub visitor_id: Uuid,
  pub name:       String,
  pub cpf:        Cpf,
  pub room:       Room,
  pub birth_date: Option<NaiveDate>,
  pub email:      Option<String>,
  pub check_in:   DateTime<Utc>,
  pub check_out:  Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
}

impl Visitor {
  pub fn is_active(&self) -> bool { self.check_out.is_none() }

  pub fn status(&self) -> VisitStatus {
    if self.is_active() {
      VisitStatus::Active
    } else {
      VisitStatus::CheckedOut
    }
  }

  /// Visit length in hours, rounded to two decimals. `None` while active.
  pub fn duration_hours(&self) -> Option<f64> {
    let out = self.check_out?;
    let seconds = (out - self.check_in).num_seconds() as f64;
    Some((seconds / 3600.0 * 100.0).round() / 100.0)
  }
}

// ─── Registration input ──────────────────────────────────────────────────────

/// Raw registration input as received from the outside. Turned into a
/// [`NewVisitor`] by [`VisitorDraft::validate`]; nothing reaches the store
/// unvalidated.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorDraft {
  pub name:       String,
  pub cpf:        String,
  pub room:       String,
  pub birth_date: Option<NaiveDate>,
  pub email:      Option<String>,
}

impl VisitorDraft {
  pub fn validate(self) -> Result<NewVisitor> {
    let name = self.name.trim().to_owned();
    if name.is_empty() {
      return Err(Error::Validation("name must not be empty".into()));
    }

    let cpf = Cpf::parse(&self.cpf)?;
    let room = Room::parse(&self.room)?;

    let email = match self.email.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(raw) => {
        if !well_formed_email(raw) {
          return Err(Error::Validation(format!("malformed email: {raw}")));
        }
        Some(raw.to_owned())
      }
    };

    Ok(NewVisitor { name, cpf, room, birth_date: self.birth_date, email })
  }
}

/// Validated input to [`crate::store::VisitorStore::create_visitor`].
/// Timestamps are always assigned by the store; they are not accepted from
/// callers.
#[derive(Debug, Clone)]
pub struct NewVisitor {
  pub name:       String,
  pub cpf:        Cpf,
  pub room:       Room,
  pub birth_date: Option<NaiveDate>,
  pub email:      Option<String>,
}

/// Mirrors the usual `local@domain.tld` shape; no attempt at full RFC 5322.
pub fn well_formed_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.is_empty()
    && !domain.contains('@')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && domain.contains('.')
}

// ─── History ─────────────────────────────────────────────────────────────────

/// A visit annotated with its derived status and duration.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
  #[serde(flatten)]
  pub visitor:  Visitor,
  pub status:   VisitStatus,
  /// Hours between check-in and check-out, two decimals; `None` while
  /// active.
  pub duration: Option<f64>,
}

impl From<Visitor> for HistoryEntry {
  fn from(visitor: Visitor) -> Self {
    Self {
      status: visitor.status(),
      duration: visitor.duration_hours(),
      visitor,
    }
  }
}

/// The full visit history with summary counts.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
  pub history:   Vec<HistoryEntry>,
  pub total:     usize,
  pub active:    usize,
  pub completed: usize,
}

impl HistoryReport {
  /// Annotate `visitors` (expected newest-first) and tally the counts.
  pub fn from_visitors(visitors: Vec<Visitor>) -> Self {
    let history: Vec<HistoryEntry> =
      visitors.into_iter().map(Into::into).collect();
    let total = history.len();
    let active = history
      .iter()
      .filter(|h| h.status == VisitStatus::Active)
      .count();
    Self { history, total, active, completed: total - active }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn visitor(check_in: DateTime<Utc>, check_out: Option<DateTime<Utc>>) -> Visitor {
    Visitor {
      visitor_id: Uuid::new_v4(),
      name:       "Ana Souza".into(),
      cpf:        Cpf::parse("12345678901").unwrap(),
      room:       Room::new(1).unwrap(),
      birth_date: None,
      email:      None,
      check_in,
      check_out,
      created_at: check_in,
    }
  }

  #[test]
  fn cpf_normalises_punctuation() {
    let cpf = Cpf::parse("123.456.789-01").unwrap();
    assert_eq!(cpf.as_str(), "12345678901");
  }

  #[test]
  fn cpf_rejects_out_of_range_lengths() {
    assert!(Cpf::parse("123456789").is_err());
    assert!(Cpf::parse("123456789012345").is_err());
    assert!(Cpf::parse("1234567890").is_ok());
    assert!(Cpf::parse("12345678901234").is_ok());
  }

  #[test]
  fn room_parses_label() {
    assert_eq!(Room::parse("Room 3").unwrap().number(), 3);
    assert!(Room::parse("Room 0").is_err());
    assert!(Room::parse("Room 6").is_err());
    assert!(Room::parse("Lobby").is_err());
  }

  #[test]
  fn room_label_round_trips() {
    for room in Room::all() {
      assert_eq!(Room::parse(&room.to_string()).unwrap(), room);
    }
  }

  #[test]
  fn email_shapes() {
    assert!(well_formed_email("ana@example.com"));
    assert!(well_formed_email("a.b+c@sub.example.com"));
    assert!(!well_formed_email("ana"));
    assert!(!well_formed_email("ana@"));
    assert!(!well_formed_email("@example.com"));
    assert!(!well_formed_email("ana@example"));
    assert!(!well_formed_email("ana @example.com"));
    assert!(!well_formed_email("ana@ex@ample.com"));
  }

  #[test]
  fn draft_validation() {
    let draft = VisitorDraft {
      name:       "  Ana Souza  ".into(),
      cpf:        "123.456.789-01".into(),
      room:       "Room 2".into(),
      birth_date: None,
      email:      Some("  ana@example.com ".into()),
    };
    let input = draft.validate().unwrap();
    assert_eq!(input.name, "Ana Souza");
    assert_eq!(input.cpf.as_str(), "12345678901");
    assert_eq!(input.room.number(), 2);
    assert_eq!(input.email.as_deref(), Some("ana@example.com"));
  }

  #[test]
  fn draft_rejects_empty_name_and_blank_email_is_none() {
    let draft = VisitorDraft {
      name:       "   ".into(),
      cpf:        "1234567890".into(),
      room:       "Room 1".into(),
      birth_date: None,
      email:      None,
    };
    assert!(matches!(draft.validate(), Err(Error::Validation(_))));

    let draft = VisitorDraft {
      name:       "Ana".into(),
      cpf:        "1234567890".into(),
      room:       "Room 1".into(),
      birth_date: None,
      email:      Some("   ".into()),
    };
    assert_eq!(draft.validate().unwrap().email, None);
  }

  #[test]
  fn duration_of_ninety_minutes_is_one_and_a_half_hours() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let v = visitor(start, Some(start + Duration::minutes(90)));
    assert_eq!(v.duration_hours(), Some(1.5));
  }

  #[test]
  fn duration_rounds_to_two_decimals() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let v = visitor(start, Some(start + Duration::minutes(100)));
    assert_eq!(v.duration_hours(), Some(1.67));
  }

  #[test]
  fn active_visit_has_no_duration() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let v = visitor(start, None);
    assert_eq!(v.status(), VisitStatus::Active);
    assert_eq!(v.duration_hours(), None);
  }

  #[test]
  fn history_report_counts() {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let report = HistoryReport::from_visitors(vec![
      visitor(start, None),
      visitor(start, Some(start + Duration::hours(2))),
      visitor(start, Some(start + Duration::hours(1))),
    ]);
    assert_eq!(report.total, 3);
    assert_eq!(report.active, 1);
    assert_eq!(report.completed, 2);
    assert_eq!(report.history[1].duration, Some(2.0));
  }
}
