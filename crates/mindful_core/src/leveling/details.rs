//! Read-only XP summary for display layers.

use crate::leveling::badge::{badge_for_level, LevelBadge};
use crate::leveling::engine::{resolve_level, LevelProgress};

/// Everything the XP details view shows for one XP total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpDetails {
    pub total_xp: u64,
    pub progress: LevelProgress,
    pub badge: &'static LevelBadge,
    /// XP earned since the current level started.
    pub xp_in_level: u64,
    /// Share of the current level completed, in `0.0..100.0`.
    pub progress_percent: f64,
}

impl XpDetails {
    pub fn for_xp(xp: u64) -> Self {
        let progress = resolve_level(xp);
        Self {
            total_xp: xp,
            progress,
            badge: badge_for_level(progress.level),
            xp_in_level: progress.xp_in_level(xp),
            progress_percent: progress.progress_percent(xp),
        }
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }
}
