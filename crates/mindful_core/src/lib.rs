//! Core domain logic for Mindful Tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod leveling;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use leveling::badge::{badge_for_level, LevelBadge};
pub use leveling::details::XpDetails;
pub use leveling::engine::{level_cost, level_threshold, resolve_level, LevelProgress};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{
    Difficulty, DraftKind, Goal, Item, ItemDraft, ItemEdit, ItemId, ItemKind, ItemValidationError,
};
pub use model::state::{AppState, StateValidationError, User, DEFAULT_APP_TITLE};
pub use repo::state_repo::{load_or_initial, SqliteStateStore, StateStore, STATE_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::lifecycle::{ArchiveReceipt, LifecycleManager, Outcome, Placement};
pub use service::stress::{Mood, StressReading, STRESS_RELIEF_TIPS};
pub use transfer::{export_file_name, export_json, parse_import, read_import, write_export};
pub use transfer::{ExportError, ImportError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
