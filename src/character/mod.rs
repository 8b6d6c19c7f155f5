//! Character state, the ledger, and the two advancement paths.

pub mod cultivation;
pub mod ledger;
pub mod tribulation;
pub mod types;

pub use cultivation::{cultivate, CultivationReport};
pub use ledger::{apply_delta, combat_power, create_character};
pub use tribulation::{
    attempt_breakthrough, breakthrough_chance, required_cultivation, BreakthroughReport,
};
pub use types::{realm_name, Affinity, Character};
