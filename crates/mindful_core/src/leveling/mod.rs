//! Leveling engine.
//!
//! # Responsibility
//! - Map accumulated XP to levels through a monotonic cost curve.
//! - Provide cosmetic badge metadata for display layers.
//!
//! # Invariants
//! - Level is always derived from XP; nothing here owns state.

pub mod badge;
pub mod details;
pub mod engine;
