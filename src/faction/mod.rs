//! Factions: registry rules and faction wars.

pub mod registry;
pub mod types;
pub mod war;

pub use registry::{
    appoint_elder, found_faction, join_faction, leave_faction, total_power, validate_name,
    FoundingRules, LeaveReport,
};
pub use types::Faction;
pub use war::{resolve_faction_war, FactionWarReport};
