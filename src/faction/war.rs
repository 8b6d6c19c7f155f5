//! Faction against faction.

use serde::Serialize;

use super::types::Faction;
use crate::combat::math::{roll_win, win_rate};
use crate::core::constants::{FACTION_WAR_TRANSFER_MAX, FACTION_WAR_TRANSFER_MIN};
use crate::core::error::EngineError;
use crate::core::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactionWarReport {
    pub attacker_id: String,
    pub attacker_name: String,
    pub defender_id: String,
    pub defender_name: String,
    pub attacker_power: i64,
    pub defender_power: i64,
    pub win_rate: f64,
    pub attacker_won: bool,
    pub winner_id: String,
    pub resource_transfer: i64,
    pub attacker_resources: i64,
    pub defender_resources: i64,
}

/// Leader or elder of `own`, and the target is another faction.
pub fn check_war(actor_id: &str, own: &Faction, target: &Faction) -> Result<(), EngineError> {
    if !own.can_command(actor_id) {
        return Err(EngineError::Unauthorized);
    }
    if own.id == target.id {
        return Err(EngineError::InvalidTarget);
    }
    Ok(())
}

/// Resolve a war between two factions whose powers were already scanned.
///
/// The winner gains the full transfer; the loser pays it down to zero at most.
pub fn resolve_faction_war(
    actor_id: &str,
    own: &mut Faction,
    own_power: i64,
    target: &mut Faction,
    target_power: i64,
    rng: &mut dyn RandomSource,
) -> Result<FactionWarReport, EngineError> {
    check_war(actor_id, own, target)?;

    let rate = win_rate(own_power, target_power);
    let attacker_won = roll_win(rate, rng);
    let transfer = rng.int_in(FACTION_WAR_TRANSFER_MIN, FACTION_WAR_TRANSFER_MAX);
    tracing::debug!(
        attacker = %own.name,
        defender = %target.name,
        own_power,
        target_power,
        win_rate = rate,
        attacker_won,
        transfer,
        "faction war roll"
    );

    let (winner, loser) = if attacker_won {
        (&mut *own, &mut *target)
    } else {
        (&mut *target, &mut *own)
    };
    winner.adjust_resources(transfer);
    loser.adjust_resources(-transfer);
    let winner_id = winner.id.clone();

    Ok(FactionWarReport {
        attacker_id: own.id.clone(),
        attacker_name: own.name.clone(),
        defender_id: target.id.clone(),
        defender_name: target.name.clone(),
        attacker_power: own_power,
        defender_power: target_power,
        win_rate: rate,
        attacker_won,
        winner_id,
        resource_transfer: transfer,
        attacker_resources: own.resources,
        defender_resources: target.resources,
    })
}
