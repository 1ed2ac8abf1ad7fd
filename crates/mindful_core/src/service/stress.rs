//! Stress metric over the active list.
//!
//! # Invariants
//! - Only active items count; archived ones are ignored even when marked.
//! - An empty active list reads as fully calm (100%).
//! - Mood buckets: ratio > 0.66 stressed, > 0.33 neutral, otherwise calm.

use crate::model::item::Item;

/// Suggestions shown when the list reads as neutral or stressed.
pub const STRESS_RELIEF_TIPS: [&str; 3] = [
    "Mark finished activities as resolved.",
    "Archive completed tasks to clear the list.",
    "Avoid creating big goals; goals are only steps.",
];

const STRESSED_ABOVE: f64 = 0.66;
const NEUTRAL_ABOVE: f64 = 0.33;

/// Three-bucket mood derived from the stress ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Calm,
    Neutral,
    Stressed,
}

impl Mood {
    pub fn from_ratio(stress_ratio: f64) -> Self {
        if stress_ratio > STRESSED_ABOVE {
            Self::Stressed
        } else if stress_ratio > NEUTRAL_ABOVE {
            Self::Neutral
        } else {
            Self::Calm
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Neutral => "Neutral",
            Self::Stressed => "Stressed",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Calm => "😊",
            Self::Neutral => "😐",
            Self::Stressed => "😨",
        }
    }
}

/// One reading of the stress metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressReading {
    /// Active items.
    pub total: usize,
    /// Active items flagged as marked.
    pub resolved: usize,
    /// Share of active items still unresolved, in `0.0..=1.0`.
    pub stress_ratio: f64,
    /// `round((1 - stress_ratio) * 100)`.
    pub calm_percentage: u8,
    pub mood: Mood,
}

impl StressReading {
    /// Measures the given items, skipping archived ones.
    pub fn measure<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let (total, resolved) = items
            .into_iter()
            .filter(|item| item.is_active())
            .fold((0, 0), |(total, resolved), item| {
                (total + 1, resolved + usize::from(item.is_marked))
            });
        Self::from_counts(total, resolved)
    }

    /// Builds a reading from raw counts. `resolved` is clamped to `total`.
    pub fn from_counts(total: usize, resolved: usize) -> Self {
        let resolved = resolved.min(total);
        if total == 0 {
            return Self {
                total,
                resolved,
                stress_ratio: 0.0,
                calm_percentage: 100,
                mood: Mood::Calm,
            };
        }

        let stress_ratio = (total - resolved) as f64 / total as f64;
        let calm_percentage = ((1.0 - stress_ratio) * 100.0).round() as u8;

        Self {
            total,
            resolved,
            stress_ratio,
            calm_percentage,
            mood: Mood::from_ratio(stress_ratio),
        }
    }

    /// Active items not yet marked.
    pub fn pending(&self) -> usize {
        self.total - self.resolved
    }

    /// Whether relief tips are worth showing.
    pub fn needs_help(&self) -> bool {
        self.mood != Mood::Calm
    }

    /// Indicator emoji; an empty list gets its own relaxed face.
    pub fn emoji(&self) -> &'static str {
        if self.total == 0 {
            "😌"
        } else {
            self.mood.emoji()
        }
    }
}
