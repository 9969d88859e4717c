//! Error type for `frontdesk-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

use frontdesk_core::visitor::Room;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] frontdesk_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("visitor not found: {0}")]
  VisitorNotFound(Uuid),

  #[error("{room} already holds the maximum of 3 active visitors")]
  RoomFull { room: Room },

  #[error("visitor {name} already has an active check-in")]
  AlreadyActive { name: String },

  #[error("visitor {0} has already checked out")]
  AlreadyCheckedOut(Uuid),

  #[error("visitor {0} is still checked in")]
  StillActive(Uuid),

  #[error("email {0} is already in use")]
  EmailTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for frontdesk_core::Error {
  fn from(err: Error) -> Self {
    use frontdesk_core::Error as Core;
    match err {
      Error::Core(e) => e,
      Error::VisitorNotFound(id) => Core::VisitorNotFound(id),
      Error::RoomFull { room } => Core::RoomFull { room },
      Error::AlreadyActive { name } => Core::AlreadyActive { name },
      Error::AlreadyCheckedOut(id) => Core::AlreadyCheckedOut(id),
      Error::StillActive(id) => Core::StillActive(id),
      Error::EmailTaken(email) => Core::EmailTaken(email),
      other => Core::Store(Box::new(other)),
    }
  }
}
