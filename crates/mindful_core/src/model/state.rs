//! Whole-application state snapshot.
//!
//! # Responsibility
//! - Hold the ordered item collection, the app title and the user score.
//! - Provide the derived views consumed by display layers.
//!
//! # Invariants
//! - Item ids are unique within `items`.
//! - Active items come first, in the user's display order; archived items
//!   trail the sequence.
//! - `User::level` is a cache recomputed from `xp` on every change and on
//!   every decode.

use crate::leveling::engine::{resolve_level, LevelProgress};
use crate::model::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Title used when none is stored or the stored one is blank.
pub const DEFAULT_APP_TITLE: &str = "Mindful Tracker";
/// Longest accepted app title, in grapheme clusters.
pub const MAX_APP_TITLE_CHARS: usize = 50;

/// User score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord")]
pub struct User {
    xp: u64,
    level: u32,
}

impl User {
    pub fn new(xp: u64) -> Self {
        Self {
            xp,
            level: resolve_level(xp).level,
        }
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Cached level, always equal to `resolve_level(xp).level`.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progress(&self) -> LevelProgress {
        resolve_level(self.xp)
    }

    /// Adds XP and refreshes the cached level.
    pub fn award(&mut self, points: u32) {
        *self = Self::new(self.xp.saturating_add(u64::from(points)));
    }

    /// Resets the score to level 1 with no XP.
    pub fn reset(&mut self) {
        *self = Self::new(0);
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new(0)
    }
}

// Stored `level` is ignored; it is only a display cache.
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    xp: u64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self::new(record.xp)
    }
}

/// Complete persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default = "default_app_title")]
    pub app_title: String,
    pub items: Vec<Item>,
    pub user: User,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            app_title: default_app_title(),
            items: Vec::new(),
            user: User::default(),
        }
    }
}

impl AppState {
    /// The state used on first launch and after a wipe.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Items of the main list, in display order.
    pub fn active_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| item.is_active())
    }

    /// Archived tasks.
    pub fn archived_tasks(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(|item| item.is_task() && item.is_archived)
    }

    /// Archived goals (milestones).
    pub fn milestones(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(|item| item.is_goal() && item.is_archived)
    }

    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn find_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Checks structural invariants that decoding alone cannot enforce.
    ///
    /// # Errors
    /// - `EmptyId` when an item id is blank.
    /// - `DuplicateId` when two items share an id.
    pub fn validate(&self) -> Result<(), StateValidationError> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.id.as_str().trim().is_empty() {
                return Err(StateValidationError::EmptyId);
            }
            if !seen.insert(&item.id) {
                return Err(StateValidationError::DuplicateId(item.id.clone()));
            }
        }
        Ok(())
    }

    /// Restores ordering and title invariants on externally sourced state.
    ///
    /// Archived items are moved behind the active region; relative order
    /// inside each region is preserved. A blank title becomes the default.
    pub fn normalize(&mut self) {
        if self.app_title.trim().is_empty() {
            self.app_title = default_app_title();
        }
        // Stable sort: `false` (active) orders before `true` (archived).
        self.items.sort_by_key(|item| item.is_archived);
    }

    /// Sets the app title, trimming and capping its length.
    ///
    /// Returns the title actually stored.
    pub fn rename(&mut self, title: &str) -> &str {
        let trimmed = title.trim();
        self.app_title = if trimmed.is_empty() {
            default_app_title()
        } else {
            trimmed.graphemes(true).take(MAX_APP_TITLE_CHARS).collect()
        };
        &self.app_title
    }
}

fn default_app_title() -> String {
    DEFAULT_APP_TITLE.to_string()
}

/// Structural state invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    EmptyId,
    DuplicateId(ItemId),
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id must not be blank"),
            Self::DuplicateId(id) => write!(f, "duplicate item id: {id}"),
        }
    }
}

impl Error for StateValidationError {}
