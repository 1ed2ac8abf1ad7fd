//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate state transitions and persistence into use-case APIs.
//! - Keep UI layers decoupled from storage details.

pub mod lifecycle;
pub mod stress;
