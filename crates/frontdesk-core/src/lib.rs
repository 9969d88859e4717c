//! Core types and trait definitions for the Frontdesk reception service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than
//! `chrono`, `serde`, and `uuid`.

pub mod account;
pub mod audit;
pub mod error;
pub mod reception;
pub mod store;
pub mod visitor;

pub use error::{Error, Result};
pub use reception::Reception;
