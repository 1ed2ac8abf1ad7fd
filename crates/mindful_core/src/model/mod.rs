//! Domain model for tasks, goals and the persisted snapshot.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the wire format compatible with existing backups.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Goal-only data lives on the goal variant, never on tasks.

pub mod item;
pub mod state;
