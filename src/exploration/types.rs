use serde::Serialize;
use std::fmt;

use crate::character::types::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Boon,
    Hazard,
    Battle,
    Relic,
    Peril,
    Epiphany,
    Fortune,
}

/// When a template may be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Eligibility {
    Always,
    MinLevel(u32),
}

impl Eligibility {
    pub fn allows(self, character: &Character) -> bool {
        match self {
            Eligibility::Always => true,
            Eligibility::MinLevel(level) => character.level >= level,
        }
    }
}

/// How an event moves cultivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CultivationEffect {
    Flat(i64),
    /// Signed fraction of the character's current cultivation, truncated toward zero.
    ShareOfCurrent(f64),
}

impl CultivationEffect {
    pub fn evaluate(self, character: &Character) -> i64 {
        match self {
            CultivationEffect::Flat(amount) => amount,
            CultivationEffect::ShareOfCurrent(share) => {
                (character.cultivation as f64 * share).trunc() as i64
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSpec {
    pub cultivation: CultivationEffect,
    pub karma: i64,
    pub artifact: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: EventKind,
    pub eligibility: Eligibility,
    pub effect: EffectSpec,
}

/// One line of an event's outcome, for the caller to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EffectLine {
    CultivationChanged(i64),
    KarmaChanged(i64),
    ArtifactGained(String),
}

impl fmt::Display for EffectLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectLine::CultivationChanged(n) if *n >= 0 => write!(f, "Cultivation +{n}"),
            EffectLine::CultivationChanged(n) => write!(f, "Cultivation -{}", n.unsigned_abs()),
            EffectLine::KarmaChanged(n) if *n >= 0 => write!(f, "Karma +{n}"),
            EffectLine::KarmaChanged(n) => write!(f, "Karma -{}", n.unsigned_abs()),
            EffectLine::ArtifactGained(name) => write!(f, "Obtained artifact: {name}"),
        }
    }
}
