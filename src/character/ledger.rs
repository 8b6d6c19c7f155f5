//! Character ledger: creation, clamped resource deltas and combat power.

use super::types::{Affinity, Character};
use crate::core::constants::{POWER_PER_ARTIFACT, POWER_PER_LEVEL};
use crate::core::error::EngineError;

/// Builds a fresh level-1 character, rejecting actors that already have one.
pub fn create_character(
    existing: Option<&Character>,
    actor_id: &str,
    affinity: Affinity,
    now: i64,
) -> Result<Character, EngineError> {
    if existing.is_some() {
        return Err(EngineError::AlreadyExists {
            actor_id: actor_id.to_string(),
        });
    }
    Ok(Character::new(actor_id, affinity, now))
}

/// Adds both deltas, then floors cultivation at zero. Karma is never clamped.
///
/// Returns the cultivation delta that actually landed after clamping.
pub fn apply_delta(character: &mut Character, cultivation_delta: i64, karma_delta: i64) -> i64 {
    let before = character.cultivation;
    character.cultivation = before.saturating_add(cultivation_delta).max(0);
    character.karma = character.karma.saturating_add(karma_delta);
    character.cultivation - before
}

pub fn combat_power(character: &Character) -> i64 {
    character.cultivation
        + character.level as i64 * POWER_PER_LEVEL
        + character.affinity.combat_bonus()
        + character.artifacts.len() as i64 * POWER_PER_ARTIFACT
}
