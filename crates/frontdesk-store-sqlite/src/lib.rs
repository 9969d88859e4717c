//! SQLite backend for the Frontdesk store traits.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The composite lifecycle
//! operations (capacity check + insert, duplicate-active check + insert,
//! check + update, check + delete) each execute inside a single
//! `BEGIN IMMEDIATE` transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
