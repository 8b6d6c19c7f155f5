//! Engine core: dispatch, locking, randomness, time, configuration and errors.

pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod locks;
pub mod rng;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Action, ElderReport, Engine, FactionInfo, NextTribulation, Outcome, StatusReport};
pub use error::{EngineError, ErrorCategory, Missing, NameRejection};
pub use locks::{EntityLocks, LockGuard, LockKey};
pub use rng::{RandomSource, RngSource, ScriptedRolls};
