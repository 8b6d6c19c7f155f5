//! Append-only audit records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogCategory {
    Creation,
    Cultivation,
    Exploration,
    Tribulation,
    DuelWin,
    DuelLoss,
    Faction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: String,
    pub actor_id: String,
    pub category: LogCategory,
    pub label: String,
    pub cultivation_delta: i64,
    pub karma_delta: i64,
    pub timestamp: i64,
}

impl ActionLogEntry {
    pub fn new(
        actor_id: &str,
        category: LogCategory,
        label: impl Into<String>,
        cultivation_delta: i64,
        karma_delta: i64,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            actor_id: actor_id.to_string(),
            category,
            label: label.into(),
            cultivation_delta,
            karma_delta,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatKind {
    Duel,
    FactionWar,
}

/// One resolved fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRecord {
    pub id: String,
    pub kind: CombatKind,
    pub challenger_id: String,
    /// `FACTION_WAR_DEFENDER` for faction wars.
    pub defender_id: String,
    /// Winning actor for duels, winning faction id for faction wars.
    pub winner_id: String,
    #[serde(default)]
    pub challenger_faction_id: Option<String>,
    #[serde(default)]
    pub defender_faction_id: Option<String>,
    pub cultivation_reward: i64,
    pub karma_swing: i64,
    pub resource_transfer: i64,
    pub timestamp: i64,
}

impl CombatRecord {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}
