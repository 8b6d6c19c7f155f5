use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants::{MAX_LEVEL, MIN_LEVEL};

/// Spiritual root a character is born with.
///
/// Affinity feeds two independent tables: the growth coefficient used when
/// cultivating and the flat bonus added to combat power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affinity {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Affinity {
    pub fn all() -> [Affinity; 5] {
        [
            Affinity::Metal,
            Affinity::Wood,
            Affinity::Water,
            Affinity::Fire,
            Affinity::Earth,
        ]
    }

    /// Multiplier bonus applied to base cultivation gain.
    pub fn growth_coefficient(self) -> f64 {
        match self {
            Affinity::Metal => 0.3,
            Affinity::Wood => 0.25,
            Affinity::Water => 0.2,
            Affinity::Fire => 0.35,
            Affinity::Earth => 0.15,
        }
    }

    /// Flat combat power bonus.
    pub fn combat_bonus(self) -> i64 {
        match self {
            Affinity::Metal => 300,
            Affinity::Wood => 200,
            Affinity::Water => 250,
            Affinity::Fire => 350,
            Affinity::Earth => 150,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Affinity::Metal => "金",
            Affinity::Wood => "木",
            Affinity::Water => "水",
            Affinity::Fire => "火",
            Affinity::Earth => "土",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::all().into_iter().find(|a| a.symbol() == symbol)
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Affinity::Metal => "Metal",
            Affinity::Wood => "Wood",
            Affinity::Water => "Water",
            Affinity::Fire => "Fire",
            Affinity::Earth => "Earth",
        };
        write!(f, "{} ({})", name, self.symbol())
    }
}

/// Display name for a realm level.
pub fn realm_name(level: u32) -> &'static str {
    match level {
        1 => "Qi Refining",
        2 => "Foundation Establishment",
        3 => "Golden Core",
        4 => "Nascent Soul",
        5 => "Deity Transformation",
        6 => "Void Refining",
        7 => "Body Integration",
        8 => "Mahayana",
        _ => "Unknown Realm",
    }
}

/// Canonical per-player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub actor_id: String,
    pub level: u32,
    pub cultivation: i64,
    pub karma: i64,
    pub affinity: Affinity,
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Unix seconds of the last successful cultivation, 0 if never.
    #[serde(default)]
    pub last_cultivation_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl Character {
    pub fn new(actor_id: impl Into<String>, affinity: Affinity, created_at: i64) -> Self {
        Self {
            actor_id: actor_id.into(),
            level: MIN_LEVEL,
            cultivation: 0,
            karma: 0,
            affinity,
            artifacts: Vec::new(),
            last_cultivation_at: 0,
            faction_id: None,
            created_at,
        }
    }

    pub fn realm_name(&self) -> &'static str {
        realm_name(self.level)
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    pub fn in_faction(&self, faction_id: &str) -> bool {
        self.faction_id.as_deref() == Some(faction_id)
    }
}
