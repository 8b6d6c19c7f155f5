//! Rate-limited cultivation.

use serde::Serialize;

use super::ledger::apply_delta;
use super::tribulation::required_cultivation;
use super::types::Character;
use crate::core::constants::{CULTIVATION_NOISE_MAX, CULTIVATION_NOISE_MIN};
use crate::core::error::EngineError;
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CultivationReport {
    pub gain: i64,
    pub cultivation: i64,
    pub level_before: u32,
    pub level: u32,
    /// Level rose as a side effect of this session.
    pub auto_breakthrough: bool,
}

/// Seconds left before the character may cultivate again, 0 if ready.
pub fn cooldown_remaining(character: &Character, now: i64, cooldown_secs: i64) -> i64 {
    let elapsed = now - character.last_cultivation_at;
    (cooldown_secs - elapsed).max(0)
}

/// Cultivation before noise: `level * (1 + growth coefficient)`.
pub fn base_gain(character: &Character) -> f64 {
    character.level as f64 * (1.0 + character.affinity.growth_coefficient())
}

/// One cultivation session.
///
/// Claims the cooldown window, rolls a gain of `base * U(0.8, 1.2)` truncated
/// toward zero, and promotes the character one level if cultivation now
/// covers the next realm's requirement. Nothing changes on `OnCooldown`.
pub fn cultivate(
    character: &mut Character,
    now: i64,
    cooldown_secs: i64,
    rng: &mut dyn RandomSource,
) -> Result<CultivationReport, EngineError> {
    let remaining = cooldown_remaining(character, now, cooldown_secs);
    if remaining > 0 {
        return Err(EngineError::OnCooldown {
            remaining_secs: remaining,
        });
    }
    character.last_cultivation_at = now;

    let noise = rng.between(CULTIVATION_NOISE_MIN, CULTIVATION_NOISE_MAX);
    let gain = (base_gain(character) * noise).trunc() as i64;
    tracing::debug!(actor = %character.actor_id, noise, gain, "cultivation roll");
    let applied = apply_delta(character, gain, 0);

    let level_before = character.level;
    if !character.is_max_level() && character.cultivation >= required_cultivation(character.level)
    {
        character.level += 1;
    }

    Ok(CultivationReport {
        gain: applied,
        cultivation: character.cultivation,
        level_before,
        level: character.level,
        auto_breakthrough: character.level != level_before,
    })
}
