//! Tribulation: the explicit, probability-gated breakthrough.

use serde::Serialize;

use super::ledger::apply_delta;
use super::types::Character;
use crate::core::constants::*;
use crate::core::error::EngineError;
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakthroughReport {
    pub success: bool,
    pub level_before: u32,
    pub level: u32,
    pub required: i64,
    pub chance: f64,
    pub cultivation_delta: i64,
    pub karma_delta: i64,
    pub cultivation: i64,
    pub karma: i64,
}

/// Cultivation needed to leave `level`.
pub fn required_cultivation(level: u32) -> i64 {
    (level as i64 + 1) * CULTIVATION_PER_LEVEL
}

/// Success chance when attempting from `level`.
///
/// Not floored: past level 16 this goes negative. Level 8 is terminal so the
/// ladder never gets there.
pub fn breakthrough_chance(level: u32) -> f64 {
    TRIBULATION_BASE_CHANCE - level as f64 * TRIBULATION_CHANCE_STEP
}

pub fn check_breakthrough(character: &Character) -> Result<i64, EngineError> {
    if character.is_max_level() {
        return Err(EngineError::MaxLevelReached);
    }
    let required = required_cultivation(character.level);
    if character.cultivation < required {
        return Err(EngineError::InsufficientCultivation {
            required,
            current: character.cultivation,
        });
    }
    Ok(required)
}

/// Attempts to advance one realm. Always yields a verdict once the
/// preconditions pass; on a precondition failure nothing is touched.
pub fn attempt_breakthrough(
    character: &mut Character,
    rng: &mut dyn RandomSource,
) -> Result<BreakthroughReport, EngineError> {
    let required = check_breakthrough(character)?;
    let chance = breakthrough_chance(character.level);
    let roll = rng.unit();
    let success = roll < chance;
    tracing::debug!(actor = %character.actor_id, roll, chance, success, "tribulation roll");

    let level_before = character.level;
    let (cultivation_delta, karma_delta) = if success {
        character.level += 1;
        (-required, TRIBULATION_SUCCESS_KARMA)
    } else {
        let loss = (required as f64 * TRIBULATION_FAILURE_LOSS_RATIO).floor() as i64;
        (-loss, TRIBULATION_FAILURE_KARMA)
    };
    let applied = apply_delta(character, cultivation_delta, karma_delta);

    Ok(BreakthroughReport {
        success,
        level_before,
        level: character.level,
        required,
        chance,
        cultivation_delta: applied,
        karma_delta,
        cultivation: character.cultivation,
        karma: character.karma,
    })
}
