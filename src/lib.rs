//! Tribulation - cultivation progression and combat simulation engine.
//!
//! Characters cultivate, explore and attempt tribulations to climb eight
//! realms, duel each other, and band together into factions that wage war
//! over a shared resource pool. Every action runs through
//! [`core::engine::Engine`], which serializes work per entity and commits each
//! action's writes to a [`store::Store`] as one batch.

pub mod character;
pub mod combat;
pub mod core;
pub mod exploration;
pub mod faction;
pub mod simulator;
pub mod store;

pub use crate::core::{Action, Engine, EngineConfig, EngineError, Outcome};
pub use crate::store::{MemoryStore, Store};
