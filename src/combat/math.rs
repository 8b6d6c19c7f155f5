//! Shared win-probability model for duels and faction wars.
//!
//! These pure functions decide outcomes without side effects so both combat
//! modes agree on the same odds.

use crate::core::constants::{WIN_RATE_BASE, WIN_RATE_MAX, WIN_RATE_MIN, WIN_RATE_SWING};
use crate::core::rng::RandomSource;

/// Challenger's chance to win.
///
/// `0.5 + (challenger - defender) / (challenger + defender) * 0.3`, clamped to
/// `[0.2, 0.8]`. A zero power sum is an even fight.
///
/// # Examples
/// * 1000 vs 3000 → 0.35
/// * 0 vs 0 → 0.5
/// * 5000 vs 0 → 0.8
pub fn win_rate(challenger_power: i64, defender_power: i64) -> f64 {
    let total = challenger_power + defender_power;
    let raw = if total == 0 {
        WIN_RATE_BASE
    } else {
        let diff = (challenger_power - defender_power) as f64;
        WIN_RATE_BASE + diff / total as f64 * WIN_RATE_SWING
    };
    raw.clamp(WIN_RATE_MIN, WIN_RATE_MAX)
}

/// Roll whether the challenger wins at `win_rate`.
pub fn roll_win(win_rate: f64, rng: &mut dyn RandomSource) -> bool {
    rng.unit() < win_rate
}
