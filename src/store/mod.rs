//! Persistence seam.
//!
//! The engine never writes entities one at a time: each action collects its
//! writes into a [`WriteBatch`] and hands it to [`Store::commit`], which must
//! apply all of it or none of it.

pub mod memory;
pub mod records;

pub use memory::{default_snapshot_path, MemoryStore, Snapshot};
pub use records::{ActionLogEntry, CombatKind, CombatRecord, LogCategory};

use std::fmt;
use std::io;

use crate::character::types::Character;
use crate::faction::types::Faction;

#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
    /// A create collided with an existing key, or an update targeted a missing one.
    Conflict(String),
    Io(io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
            Self::Conflict(reason) => write!(f, "write conflict: {reason}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Serde(err) => write!(f, "serde error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    CreateCharacter(Character),
    UpdateCharacter(Character),
    CreateFaction(Faction),
    UpdateFaction(Faction),
    AppendCombat(CombatRecord),
    AppendLog(ActionLogEntry),
}

/// Ordered set of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_character(mut self, character: Character) -> Self {
        self.writes.push(Write::CreateCharacter(character));
        self
    }

    pub fn update_character(mut self, character: Character) -> Self {
        self.writes.push(Write::UpdateCharacter(character));
        self
    }

    pub fn create_faction(mut self, faction: Faction) -> Self {
        self.writes.push(Write::CreateFaction(faction));
        self
    }

    pub fn update_faction(mut self, faction: Faction) -> Self {
        self.writes.push(Write::UpdateFaction(faction));
        self
    }

    pub fn combat(mut self, record: CombatRecord) -> Self {
        self.writes.push(Write::AppendCombat(record));
        self
    }

    pub fn log(mut self, entry: ActionLogEntry) -> Self {
        self.writes.push(Write::AppendLog(entry));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }
}

/// Key-value style storage of characters, factions and audit records.
pub trait Store: Send + Sync {
    fn character(&self, actor_id: &str) -> Result<Option<Character>, StoreError>;

    fn faction(&self, faction_id: &str) -> Result<Option<Faction>, StoreError>;

    fn faction_by_name(&self, name: &str) -> Result<Option<Faction>, StoreError>;

    /// Every character whose faction reference equals `faction_id`.
    fn faction_members(&self, faction_id: &str) -> Result<Vec<Character>, StoreError>;

    /// Most recent log entries for an actor, newest first.
    fn recent_log(&self, actor_id: &str, limit: usize) -> Result<Vec<ActionLogEntry>, StoreError>;

    /// Combat records in commit order.
    fn combat_records(&self) -> Result<Vec<CombatRecord>, StoreError>;

    /// Applies every write in the batch atomically.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn character(&self, actor_id: &str) -> Result<Option<Character>, StoreError> {
        (**self).character(actor_id)
    }

    fn faction(&self, faction_id: &str) -> Result<Option<Faction>, StoreError> {
        (**self).faction(faction_id)
    }

    fn faction_by_name(&self, name: &str) -> Result<Option<Faction>, StoreError> {
        (**self).faction_by_name(name)
    }

    fn faction_members(&self, faction_id: &str) -> Result<Vec<Character>, StoreError> {
        (**self).faction_members(faction_id)
    }

    fn recent_log(&self, actor_id: &str, limit: usize) -> Result<Vec<ActionLogEntry>, StoreError> {
        (**self).recent_log(actor_id, limit)
    }

    fn combat_records(&self) -> Result<Vec<CombatRecord>, StoreError> {
        (**self).combat_records()
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}
