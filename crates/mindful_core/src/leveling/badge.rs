//! Cosmetic level badges.
//!
//! Static presentation metadata: each entry applies from `min_level` up to
//! the next entry. Nothing in the core depends on it for correctness.

/// Emoji and title shown for a level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBadge {
    pub min_level: u32,
    pub emoji: &'static str,
    pub title: &'static str,
}

const fn badge(min_level: u32, emoji: &'static str, title: &'static str) -> LevelBadge {
    LevelBadge {
        min_level,
        emoji,
        title,
    }
}

// Sorted by `min_level`; `badge_for_level` relies on it.
const LEVEL_BADGES: &[LevelBadge] = &[
    badge(1, "🐭", "Mouse"),
    badge(2, "🐮", "Ox"),
    badge(3, "🐵", "Monkey"),
    badge(4, "🐷", "Pig"),
    badge(5, "🐔", "Rooster"),
    badge(6, "🐶", "Dog"),
    badge(7, "🐰", "Rabbit"),
    badge(8, "🐐", "Goat"),
    badge(9, "🐴", "Horse"),
    badge(10, "🐯", "Tiger"),
    badge(12, "🐍", "Snake"),
    badge(14, "🐲", "Dragon Head"),
    badge(16, "🐉", "Dragon"),
    badge(18, "👹", "Demon"),
    badge(20, "👺", "Mask"),
    badge(22, "💀", "Skull"),
    badge(24, "☠️", "Skull and Bones"),
    badge(26, "👻", "Ghost"),
    badge(28, "👽", "Martian"),
    badge(30, "👾", "Critter"),
    badge(32, "🧟", "Zombie"),
    badge(34, "🧌", "Troll"),
    badge(36, "🤹", "Juggler"),
    badge(38, "🧙‍♂️", "Wizard"),
    badge(40, "🛡️", "Defender"),
    badge(42, "🏹", "Archer"),
    badge(44, "👑", "King"),
    badge(46, "🏴‍☠️", "Pirate"),
    badge(48, "🕯️", "Enlightened"),
    badge(50, "👁️", "Seer"),
    badge(55, "🏃", "Runner"),
    badge(60, "🤿", "Diver"),
    badge(65, "🥊", "Fighter"),
    badge(70, "🥋", "Artist"),
    badge(75, "🏆", "Champion"),
    badge(80, "🎰", "Gambler"),
    badge(85, "♟️", "Player"),
    badge(90, "🩻", "Specter"),
    badge(95, "🧑‍🚀", "Astronaut"),
    badge(100, "🦑", "Squid"),
    badge(110, "🤖", "Robot"),
    badge(120, "🧭", "Seeker"),
    badge(130, "🥂", "The Sought"),
    badge(140, "🌌", "The Void"),
    badge(150, "♻️", "The Repetition"),
];

/// Returns every badge in ascending `min_level` order.
pub fn level_badges() -> &'static [LevelBadge] {
    LEVEL_BADGES
}

/// Returns the badge with the highest `min_level` not above `level`.
///
/// Levels below the first entry fall back to the level-1 badge.
pub fn badge_for_level(level: u32) -> &'static LevelBadge {
    LEVEL_BADGES
        .iter()
        .rev()
        .find(|badge| badge.min_level <= level)
        .unwrap_or(&LEVEL_BADGES[0])
}
