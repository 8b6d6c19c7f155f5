//! One-on-one duels between characters.

use serde::Serialize;

use super::math::{roll_win, win_rate};
use crate::character::ledger::{apply_delta, combat_power};
use crate::character::types::Character;
use crate::core::constants::{DUEL_KARMA_SWING, DUEL_REWARD_PER_LEVEL};
use crate::core::error::EngineError;
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelReport {
    pub challenger_id: String,
    pub defender_id: String,
    pub challenger_power: i64,
    pub defender_power: i64,
    pub win_rate: f64,
    pub challenger_won: bool,
    pub winner_id: String,
    pub loser_id: String,
    pub cultivation_reward: i64,
    pub karma_swing: i64,
}

/// Cultivation the winner earns: the lower of the two levels times 100.
pub fn duel_reward(challenger: &Character, defender: &Character) -> i64 {
    challenger.level.min(defender.level) as i64 * DUEL_REWARD_PER_LEVEL
}

/// Resolve a duel and apply rewards to both sides.
///
/// Powers are read before anything changes. The winner takes the cultivation
/// reward and `+20` karma, the loser `-20` karma.
pub fn resolve_duel(
    challenger: &mut Character,
    defender: &mut Character,
    rng: &mut dyn RandomSource,
) -> Result<DuelReport, EngineError> {
    if challenger.actor_id == defender.actor_id {
        return Err(EngineError::InvalidTarget);
    }

    let challenger_id = challenger.actor_id.clone();
    let defender_id = defender.actor_id.clone();
    let challenger_power = combat_power(challenger);
    let defender_power = combat_power(defender);
    let rate = win_rate(challenger_power, defender_power);
    let challenger_won = roll_win(rate, rng);
    let reward = duel_reward(challenger, defender);
    tracing::debug!(
        challenger = %challenger_id,
        defender = %defender_id,
        challenger_power,
        defender_power,
        win_rate = rate,
        challenger_won,
        "duel roll"
    );

    let (winner, loser) = if challenger_won {
        (challenger, defender)
    } else {
        (defender, challenger)
    };
    apply_delta(winner, reward, DUEL_KARMA_SWING);
    apply_delta(loser, 0, -DUEL_KARMA_SWING);

    Ok(DuelReport {
        challenger_id,
        defender_id,
        challenger_power,
        defender_power,
        win_rate: rate,
        challenger_won,
        winner_id: winner.actor_id.clone(),
        loser_id: loser.actor_id.clone(),
        cultivation_reward: reward,
        karma_swing: DUEL_KARMA_SWING,
    })
}
