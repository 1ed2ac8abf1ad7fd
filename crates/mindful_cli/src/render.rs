//! Plain-text rendering of cards and summaries.
//!
//! Consumes core views only; never mutates state.

use mindful_core::{AppState, Item, StressReading, XpDetails, STRESS_RELIEF_TIPS};
use std::fmt::Write as _;

const SHORT_ID_CHARS: usize = 8;

/// Affordance offered on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Edit,
    Mark,
    Unmark,
    Archive,
    Recover,
    Delete,
}

impl CardAction {
    /// Command label; archiving reads differently for tasks and goals.
    pub fn label(self, item: &Item) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Mark => "mark",
            Self::Unmark => "unmark",
            Self::Archive if item.is_goal() => "archive (complete)",
            Self::Archive => "archive (release)",
            Self::Recover => "recover",
            Self::Delete => "delete",
        }
    }
}

/// Actions available for `item` in the main list or in an archive list.
pub fn card_actions(item: &Item, in_archive: bool) -> Vec<CardAction> {
    if in_archive {
        return vec![CardAction::Recover, CardAction::Delete];
    }
    let mark = if item.is_marked {
        CardAction::Unmark
    } else {
        CardAction::Mark
    };
    vec![CardAction::Edit, mark, CardAction::Archive, CardAction::Delete]
}

pub fn short_id(item: &Item) -> String {
    item.id.as_str().chars().take(SHORT_ID_CHARS).collect()
}

pub fn render_card(item: &Item, in_archive: bool) -> String {
    let mut out = String::new();
    let marker = if item.is_marked { "x" } else { " " };
    let _ = write!(out, "[{marker}] {} {}", item.icon, item.title);
    if item.is_goal() {
        let _ = write!(out, " ({} pts)", item.points());
    }
    let _ = write!(out, "  #{}", short_id(item));
    if let Some(description) = &item.description {
        let _ = write!(out, "\n      {description}");
    }
    let actions = card_actions(item, in_archive)
        .into_iter()
        .map(|action| action.label(item))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = write!(out, "\n      actions: {actions}");
    out
}

pub fn render_list<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    in_archive: bool,
    empty: &str,
) -> String {
    let cards: Vec<String> = items
        .into_iter()
        .map(|item| render_card(item, in_archive))
        .collect();
    if cards.is_empty() {
        return empty.to_string();
    }
    cards.join("\n")
}

pub fn render_status(state: &AppState, stress: &StressReading, xp: &XpDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", state.app_title);
    let _ = writeln!(
        out,
        "Level {} {}  |  {} {}% {}",
        xp.level(),
        xp.badge.emoji,
        stress.emoji(),
        stress.calm_percentage,
        stress.mood.label()
    );
    out.push_str(&render_list(
        state.active_items(),
        false,
        "Empty list! Use `add-task` or `add-goal` to add an activity or goal.",
    ));
    if stress.needs_help() {
        let _ = write!(
            out,
            "\n\nYou have {} of {} items pending.",
            stress.pending(),
            stress.total
        );
        for tip in STRESS_RELIEF_TIPS {
            let _ = write!(out, "\n  - {tip}");
        }
    }
    out
}

pub fn render_xp(xp: &XpDetails) -> String {
    format!(
        "Current level: {} {} ({})\nTotal XP: {}\nXP in this level: {}\nXP needed for next level: {}\nProgress: {:.0}%",
        xp.level(),
        xp.badge.emoji,
        xp.badge.title,
        xp.total_xp,
        xp.xp_in_level,
        xp.progress.xp_to_next_level,
        xp.progress_percent
    )
}
