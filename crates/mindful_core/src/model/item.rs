//! Item domain model.
//!
//! # Responsibility
//! - Define the task/goal sum type shared by every view.
//! - Normalize and validate user submissions before they become items.
//!
//! # Invariants
//! - `id` is assigned once and never reused for another item.
//! - Goal `points` always match `difficulty`; they are never set directly,
//!   not even when decoding stored data.
//! - Tasks carry no reward data at all.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Maximum number of user-perceived characters (grapheme clusters) kept
/// from a submitted icon.
pub const MAX_ICON_CHARS: usize = 2;

/// Opaque, stable item identifier.
///
/// Fresh ids are UUID v4 strings. Ids read from storage or import files are
/// kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Goal difficulty; selects the XP reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// XP granted when a goal of this difficulty is archived.
    pub fn points(self) -> u32 {
        match self {
            Self::Easy => 50,
            Self::Medium => 100,
            Self::Hard => 200,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ItemValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(ItemValidationError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Reward data carried only by goals.
///
/// Decoding ignores any stored `points` and derives them from `difficulty`;
/// a missing difficulty falls back to [`Difficulty::Easy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GoalRecord")]
pub struct Goal {
    difficulty: Difficulty,
    points: u32,
}

impl Goal {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            points: difficulty.points(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        *self = Self::new(difficulty);
    }
}

#[derive(Deserialize)]
struct GoalRecord {
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

impl From<GoalRecord> for Goal {
    fn from(record: GoalRecord) -> Self {
        Self::new(record.difficulty.unwrap_or_default())
    }
}

/// Item variant, serialized as the `type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Goal(Goal),
}

/// One task or goal in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Short glyph, usually a single emoji.
    pub icon: String,
    #[serde(
        default,
        deserialize_with = "deserialize_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Resolved/focused flag; independent from archival.
    #[serde(default)]
    pub is_marked: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    /// Creates an active, unmarked task with a fresh id.
    ///
    /// Does not normalize input; submissions go through [`ItemDraft`].
    pub fn task(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self::with_kind(ItemId::generate(), ItemKind::Task, title, icon)
    }

    /// Creates an active, unmarked goal with a fresh id.
    pub fn goal(title: impl Into<String>, icon: impl Into<String>, difficulty: Difficulty) -> Self {
        Self::with_kind(
            ItemId::generate(),
            ItemKind::Goal(Goal::new(difficulty)),
            title,
            icon,
        )
    }

    fn with_kind(
        id: ItemId,
        kind: ItemKind,
        title: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            icon: icon.into(),
            description: None,
            is_marked: false,
            is_archived: false,
            kind,
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind, ItemKind::Goal(_))
    }

    pub fn is_task(&self) -> bool {
        matches!(self.kind, ItemKind::Task)
    }

    /// Returns whether the item belongs to the active view.
    pub fn is_active(&self) -> bool {
        !self.is_archived
    }

    /// XP reward granted on archival; `0` for tasks.
    pub fn points(&self) -> u32 {
        match &self.kind {
            ItemKind::Task => 0,
            ItemKind::Goal(goal) => goal.points(),
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match &self.kind {
            ItemKind::Task => None,
            ItemKind::Goal(goal) => Some(goal.difficulty()),
        }
    }

    /// Stable lowercase label of the variant (`task|goal`).
    pub fn type_label(&self) -> &'static str {
        match self.kind {
            ItemKind::Task => "task",
            ItemKind::Goal(_) => "goal",
        }
    }

    /// Applies a validated edit in place.
    ///
    /// Marked/archived flags and the item's position are left untouched.
    /// `difficulty` is ignored for tasks; for goals `None` keeps the current
    /// one. Nothing is changed when validation fails.
    pub fn apply_edit(&mut self, edit: ItemEdit) -> Result<(), ItemValidationError> {
        let title = normalize_title(&edit.title)?;
        let icon = normalize_icon(&edit.icon)?;

        self.title = title;
        self.icon = icon;
        self.description = normalize_description(edit.description);
        if let (ItemKind::Goal(goal), Some(difficulty)) = (&mut self.kind, edit.difficulty) {
            goal.set_difficulty(difficulty);
        }
        Ok(())
    }
}

/// Variant requested by a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
    Task,
    Goal(Difficulty),
}

/// User submission for a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub icon: String,
    pub description: Option<String>,
    pub kind: DraftKind,
}

impl ItemDraft {
    pub fn task(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            description: None,
            kind: DraftKind::Task,
        }
    }

    pub fn goal(title: impl Into<String>, icon: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            description: None,
            kind: DraftKind::Goal(difficulty),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the submission and builds an active, unmarked item.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyIcon` when either is blank after trimming.
    pub fn into_item(self, id: ItemId) -> Result<Item, ItemValidationError> {
        let title = normalize_title(&self.title)?;
        let icon = normalize_icon(&self.icon)?;
        let kind = match self.kind {
            DraftKind::Task => ItemKind::Task,
            DraftKind::Goal(difficulty) => ItemKind::Goal(Goal::new(difficulty)),
        };

        let mut item = Item::with_kind(id, kind, title, icon);
        item.description = normalize_description(self.description);
        Ok(item)
    }
}

/// User submission editing an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEdit {
    pub title: String,
    pub icon: String,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl ItemEdit {
    /// Builds an edit pre-filled with the item's current values.
    pub fn from_item(item: &Item) -> Self {
        Self {
            title: item.title.clone(),
            icon: item.icon.clone(),
            description: item.description.clone(),
            difficulty: item.difficulty(),
        }
    }
}

/// Submission validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyTitle,
    EmptyIcon,
    UnknownDifficulty(String),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EmptyIcon => write!(f, "icon is required"),
            Self::UnknownDifficulty(value) => write!(
                f,
                "unknown difficulty `{value}`; expected easy|medium|hard"
            ),
        }
    }
}

impl Error for ItemValidationError {}

fn normalize_title(title: &str) -> Result<String, ItemValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ItemValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_icon(icon: &str) -> Result<String, ItemValidationError> {
    // Multi-scalar emoji (ZWJ sequences, variation selectors) stay whole.
    let truncated = icon
        .trim()
        .graphemes(true)
        .take(MAX_ICON_CHARS)
        .collect::<String>();
    if truncated.is_empty() {
        return Err(ItemValidationError::EmptyIcon);
    }
    Ok(truncated)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Stored snapshots keep an empty string for "no description".
fn deserialize_description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
