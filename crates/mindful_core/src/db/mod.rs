//! SQLite bootstrap for the local key-value store.
//!
//! # Responsibility
//! - Open connections with migrations applied.
//! - Provide row-level access to `kv_entries` for the state store.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - No entry is read or written before migrations succeed.

pub mod kv;
pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
