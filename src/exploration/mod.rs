//! Exploration: a static event catalog and the interpreter that applies it.

pub mod data;
pub mod logic;
pub mod types;

pub use data::ALL_EVENTS;
pub use logic::{apply_event, eligible_events, explore, ExplorationReport, ExploreOutcome};
pub use types::{CultivationEffect, EffectLine, EffectSpec, Eligibility, EventKind, EventTemplate};
