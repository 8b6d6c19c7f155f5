//! Tunable engine settings.
//!
//! Formula coefficients live in [`crate::core::constants`]; only values an
//! operator might reasonably change per deployment are here.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::constants::{
    CULTIVATION_COOLDOWN_SECONDS, FACTION_MIN_LEVEL, FACTION_SEED_RESOURCES, STATUS_HISTORY_LEN,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cultivation_cooldown_secs: i64,
    pub faction_seed_resources: i64,
    pub faction_min_level: u32,
    /// Log entries included in a status report.
    pub status_history_len: usize,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cultivation_cooldown_secs: CULTIVATION_COOLDOWN_SECONDS,
            faction_seed_resources: FACTION_SEED_RESOURCES,
            faction_min_level: FACTION_MIN_LEVEL,
            status_history_len: STATUS_HISTORY_LEN,
            snapshot_path: None,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
