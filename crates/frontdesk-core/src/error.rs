//! Error taxonomy for the reception domain.

use thiserror::Error;
use uuid::Uuid;

use crate::visitor::Room;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(String),

  #[error("visitor not found: {0}")]
  VisitorNotFound(Uuid),

  #[error("{room} already holds the maximum of 3 active visitors")]
  RoomFull { room: Room },

  #[error("visitor {name} already has an active check-in")]
  AlreadyActive { name: String },

  #[error("visitor {0} has already checked out")]
  AlreadyCheckedOut(Uuid),

  #[error("visitor {0} is still checked in; check out before deleting")]
  StillActive(Uuid),

  #[error("email {0} is already in use")]
  EmailTaken(String),

  #[error("invalid or missing credentials")]
  Unauthorized,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
