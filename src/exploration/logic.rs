//! Interpreter for the event catalog.

use serde::Serialize;

use super::data::ALL_EVENTS;
use super::types::{EffectLine, EventKind, EventTemplate};
use crate::character::ledger::apply_delta;
use crate::character::types::Character;
use crate::core::rng::RandomSource;

/// Concrete deltas an event produces against one character snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEffect {
    pub cultivation: i64,
    pub karma: i64,
    pub artifact: Option<String>,
}

impl EventEffect {
    /// Lines for each non-zero delta and the artifact, in that order.
    pub fn lines(&self) -> Vec<EffectLine> {
        let mut lines = Vec::new();
        if self.cultivation != 0 {
            lines.push(EffectLine::CultivationChanged(self.cultivation));
        }
        if self.karma != 0 {
            lines.push(EffectLine::KarmaChanged(self.karma));
        }
        if let Some(name) = &self.artifact {
            lines.push(EffectLine::ArtifactGained(name.clone()));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorationReport {
    pub name: String,
    pub description: String,
    pub kind: EventKind,
    pub effects: Vec<EffectLine>,
    /// Cultivation that actually landed after clamping.
    pub cultivation_delta: i64,
    pub karma_delta: i64,
    pub cultivation: i64,
    pub karma: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExploreOutcome {
    /// Nothing in the catalog fits this character. Not an error.
    NoEventAvailable,
    Event(ExplorationReport),
}

pub fn eligible_in<'a>(
    catalog: &'a [EventTemplate],
    character: &Character,
) -> Vec<&'a EventTemplate> {
    catalog
        .iter()
        .filter(|e| e.eligibility.allows(character))
        .collect()
}

pub fn eligible_events(character: &Character) -> Vec<&'static EventTemplate> {
    eligible_in(ALL_EVENTS, character)
}

pub fn evaluate(template: &EventTemplate, character: &Character) -> EventEffect {
    EventEffect {
        cultivation: template.effect.cultivation.evaluate(character),
        karma: template.effect.karma,
        artifact: template.effect.artifact.map(str::to_string),
    }
}

/// Evaluate `template` against the character as it is now, then apply it.
pub fn apply_event(character: &mut Character, template: &EventTemplate) -> ExplorationReport {
    let effect = evaluate(template, character);
    let applied = apply_delta(character, effect.cultivation, effect.karma);
    if let Some(name) = &effect.artifact {
        character.artifacts.push(name.clone());
    }

    ExplorationReport {
        name: template.name.to_string(),
        description: template.description.to_string(),
        kind: template.kind,
        effects: effect.lines(),
        cultivation_delta: applied,
        karma_delta: effect.karma,
        cultivation: character.cultivation,
        karma: character.karma,
    }
}

/// Draw one eligible event uniformly from `catalog` and apply it.
pub fn explore_catalog(
    catalog: &[EventTemplate],
    character: &mut Character,
    rng: &mut dyn RandomSource,
) -> ExploreOutcome {
    let eligible = eligible_in(catalog, character);
    if eligible.is_empty() {
        return ExploreOutcome::NoEventAvailable;
    }
    let pick = rng.index(eligible.len());
    let template = eligible[pick];
    tracing::debug!(
        actor = %character.actor_id,
        eligible = eligible.len(),
        pick,
        event = template.name,
        "exploration roll"
    );
    ExploreOutcome::Event(apply_event(character, template))
}

pub fn explore(character: &mut Character, rng: &mut dyn RandomSource) -> ExploreOutcome {
    explore_catalog(ALL_EVENTS, character, rng)
}
