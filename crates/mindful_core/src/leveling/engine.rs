//! XP to level resolution.
//!
//! # Responsibility
//! - Define the per-level XP cost curve.
//! - Resolve any XP total into a level and progress-within-level figures.
//!
//! # Invariants
//! - `level_threshold(1) == 0` and thresholds are strictly increasing.
//! - For every `xp`, `threshold(level) <= xp < threshold(level + 1)`.
//! - `xp_to_next_level` is always strictly positive.

/// XP cost of reaching level 2 from level 1.
pub const BASE_LEVEL_COST: u64 = 50;
/// Linear growth of the cost between two consecutive levels.
pub const LEVEL_COST_STEP: u64 = 25;

/// Resolved level figures for one XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    /// Current level, starting at 1.
    pub level: u32,
    /// XP still missing to reach `level + 1`. Never zero.
    pub xp_to_next_level: u64,
    /// Cumulative XP at which `level` starts.
    pub total_xp_for_current_level: u64,
}

impl LevelProgress {
    /// XP earned since the start of the current level.
    pub fn xp_in_level(&self, xp: u64) -> u64 {
        xp.saturating_sub(self.total_xp_for_current_level)
    }

    /// Percentage of the current level already completed, in `0.0..100.0`.
    pub fn progress_percent(&self, xp: u64) -> f64 {
        let earned = self.xp_in_level(xp);
        if earned == 0 {
            return 0.0;
        }
        earned as f64 / (earned as f64 + self.xp_to_next_level as f64) * 100.0
    }
}

/// XP cost of going from `level - 1` to `level`.
///
/// Level 1 is free; level 2 costs 50, level 3 costs 75, and so on.
pub fn level_cost(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    BASE_LEVEL_COST + u64::from(level - 2) * LEVEL_COST_STEP
}

/// Cumulative XP required to reach `level`.
///
/// Levels `0` and `1` both map to `0`. Saturates at `u64::MAX` for levels
/// whose cumulative cost no longer fits.
pub fn level_threshold(level: u32) -> u64 {
    let steps = u128::from(level.saturating_sub(1));
    u64::try_from(threshold_after_steps(steps)).unwrap_or(u64::MAX)
}

/// Resolves `xp` into its level and progress figures.
///
/// Solves the quadratic of the arithmetic cost series directly, then
/// corrects the floating-point estimate with exact integer checks so
/// results stay exact at threshold boundaries.
pub fn resolve_level(xp: u64) -> LevelProgress {
    let target = u128::from(xp);
    let mut steps = estimate_steps(xp);

    while steps > 0 && threshold_after_steps(steps) > target {
        steps -= 1;
    }
    while threshold_after_steps(steps + 1) <= target {
        steps += 1;
    }

    let current = threshold_after_steps(steps);
    let next = threshold_after_steps(steps + 1);

    LevelProgress {
        // `steps` stays far below `u32::MAX` for any `u64` XP (about 1.2e9).
        level: u32::try_from(steps + 1).unwrap_or(u32::MAX),
        xp_to_next_level: u64::try_from(next - target).unwrap_or(u64::MAX),
        total_xp_for_current_level: u64::try_from(current).unwrap_or(u64::MAX),
    }
}

/// Sum of the first `steps` level costs: `k*B + S*k*(k-1)/2`.
fn threshold_after_steps(steps: u128) -> u128 {
    if steps == 0 {
        return 0;
    }
    let base = u128::from(BASE_LEVEL_COST);
    let step = u128::from(LEVEL_COST_STEP);
    steps * base + step * steps * (steps - 1) / 2
}

fn estimate_steps(xp: u64) -> u128 {
    let base = BASE_LEVEL_COST as f64;
    let step = LEVEL_COST_STEP as f64;
    let linear = base - step / 2.0;
    let discriminant = linear * linear + 2.0 * step * xp as f64;
    let estimate = (discriminant.sqrt() - linear) / step;
    if estimate.is_finite() && estimate > 0.0 {
        estimate.floor() as u128
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{level_cost, level_threshold, resolve_level, threshold_after_steps};

    fn resolve_by_iteration(xp: u64) -> u32 {
        let mut level = 1;
        while level_threshold(level + 1) <= xp {
            level += 1;
        }
        level
    }

    #[test]
    fn costs_grow_by_twenty_five_per_level() {
        assert_eq!(level_cost(1), 0);
        assert_eq!(level_cost(2), 50);
        assert_eq!(level_cost(3), 75);
        assert_eq!(level_cost(4), 100);
    }

    #[test]
    fn thresholds_are_running_sums_of_costs() {
        let mut running = 0;
        for level in 1..200 {
            running += level_cost(level);
            assert_eq!(level_threshold(level), running, "level {level}");
        }
    }

    #[test]
    fn closed_form_matches_iteration_around_boundaries() {
        for level in 1..120 {
            let threshold = level_threshold(level);
            for xp in [threshold.saturating_sub(1), threshold, threshold + 1] {
                assert_eq!(resolve_level(xp).level, resolve_by_iteration(xp), "xp {xp}");
            }
        }
    }

    #[test]
    fn huge_xp_resolves_without_overflow() {
        let progress = resolve_level(u64::MAX);
        assert!(progress.level > 1_000_000_000);
        assert!(progress.xp_to_next_level > 0);
        assert!(threshold_after_steps(u128::from(progress.level)) > u128::from(u64::MAX));
    }

    #[test]
    fn threshold_saturates_for_unreachable_levels() {
        assert_eq!(level_threshold(u32::MAX), u64::MAX);
    }
}
