//! In-process store with optional JSON snapshot persistence.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use super::records::{ActionLogEntry, CombatRecord};
use super::{Store, StoreError, Write, WriteBatch};
use crate::character::types::Character;
use crate::faction::types::Faction;

const SNAPSHOT_VERSION: u32 = 1;

/// Resolve `<data dir>/tribulation/world.json`, creating the directory if needed.
pub fn default_snapshot_path() -> io::Result<PathBuf> {
    let base = dirs::data_dir().or_else(dirs::home_dir).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine data directory",
        )
    })?;
    let dir = base.join("tribulation");
    fs::create_dir_all(&dir)?;
    Ok(dir.join("world.json"))
}

/// Full contents of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub characters: BTreeMap<String, Character>,
    #[serde(default)]
    pub factions: BTreeMap<String, Faction>,
    #[serde(default)]
    pub combat_records: Vec<CombatRecord>,
    #[serde(default)]
    pub action_log: Vec<ActionLogEntry>,
}

/// What a batch displaced, so a failed commit can be put back in place.
#[derive(Debug, Default)]
struct Undo {
    version: u32,
    characters: Vec<(String, Option<Character>)>,
    factions: Vec<(String, Option<Faction>)>,
    combat_len: usize,
    log_len: usize,
}

impl Snapshot {
    fn faction_name_taken(&self, name: &str, except_id: &str) -> bool {
        self.factions
            .values()
            .any(|f| f.name == name && f.id != except_id)
    }

    fn undo_point(&self) -> Undo {
        Undo {
            version: self.version,
            combat_len: self.combat_records.len(),
            log_len: self.action_log.len(),
            ..Undo::default()
        }
    }

    fn apply(&mut self, write: Write, undo: &mut Undo) -> Result<(), StoreError> {
        match write {
            Write::CreateCharacter(character) => {
                if self.characters.contains_key(&character.actor_id) {
                    return Err(StoreError::Conflict(format!(
                        "character {} already exists",
                        character.actor_id
                    )));
                }
                undo.characters.push((character.actor_id.clone(), None));
                self.characters
                    .insert(character.actor_id.clone(), character);
            }
            Write::UpdateCharacter(character) => {
                let slot = self.characters.get_mut(&character.actor_id).ok_or_else(|| {
                    StoreError::Conflict(format!(
                        "character {} does not exist",
                        character.actor_id
                    ))
                })?;
                let id = character.actor_id.clone();
                let previous = std::mem::replace(slot, character);
                undo.characters.push((id, Some(previous)));
            }
            Write::CreateFaction(faction) => {
                if self.factions.contains_key(&faction.id) {
                    return Err(StoreError::Conflict(format!(
                        "faction {} already exists",
                        faction.id
                    )));
                }
                if self.faction_name_taken(&faction.name, &faction.id) {
                    return Err(StoreError::Conflict(format!(
                        "faction name {} already taken",
                        faction.name
                    )));
                }
                undo.factions.push((faction.id.clone(), None));
                self.factions.insert(faction.id.clone(), faction);
            }
            Write::UpdateFaction(faction) => {
                if self.faction_name_taken(&faction.name, &faction.id) {
                    return Err(StoreError::Conflict(format!(
                        "faction name {} already taken",
                        faction.name
                    )));
                }
                let slot = self.factions.get_mut(&faction.id).ok_or_else(|| {
                    StoreError::Conflict(format!("faction {} does not exist", faction.id))
                })?;
                let id = faction.id.clone();
                let previous = std::mem::replace(slot, faction);
                undo.factions.push((id, Some(previous)));
            }
            Write::AppendCombat(record) => self.combat_records.push(record),
            Write::AppendLog(entry) => self.action_log.push(entry),
        }
        Ok(())
    }

    /// Restore everything recorded in `undo`, newest change first.
    fn roll_back(&mut self, undo: Undo) {
        for (id, previous) in undo.characters.into_iter().rev() {
            match previous {
                Some(character) => {
                    self.characters.insert(id, character);
                }
                None => {
                    self.characters.remove(&id);
                }
            }
        }
        for (id, previous) in undo.factions.into_iter().rev() {
            match previous {
                Some(faction) => {
                    self.factions.insert(id, faction);
                }
                None => {
                    self.factions.remove(&id);
                }
            }
        }
        self.combat_records.truncate(undo.combat_len);
        self.action_log.truncate(undo.log_len);
        self.version = undo.version;
    }
}

/// All tables live behind one mutex. A batch is applied in place while the
/// mutex is held and rolled back if any write conflicts or the snapshot write
/// fails, so readers never see a partial batch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by a JSON snapshot file. A missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Snapshot::default(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), "opened snapshot store");
        Ok(Self {
            state: Mutex::new(state),
            snapshot_path: Some(path),
        })
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            snapshot_path: None,
        }
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub fn action_log(&self) -> Vec<ActionLogEntry> {
        self.lock().action_log.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Store for MemoryStore {
    fn character(&self, actor_id: &str) -> Result<Option<Character>, StoreError> {
        Ok(self.lock().characters.get(actor_id).cloned())
    }

    fn faction(&self, faction_id: &str) -> Result<Option<Faction>, StoreError> {
        Ok(self.lock().factions.get(faction_id).cloned())
    }

    fn faction_by_name(&self, name: &str) -> Result<Option<Faction>, StoreError> {
        Ok(self
            .lock()
            .factions
            .values()
            .find(|f| f.name == name)
            .cloned())
    }

    fn faction_members(&self, faction_id: &str) -> Result<Vec<Character>, StoreError> {
        Ok(self
            .lock()
            .characters
            .values()
            .filter(|c| c.in_faction(faction_id))
            .cloned()
            .collect())
    }

    fn recent_log(&self, actor_id: &str, limit: usize) -> Result<Vec<ActionLogEntry>, StoreError> {
        Ok(self
            .lock()
            .action_log
            .iter()
            .rev()
            .filter(|e| e.actor_id == actor_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn combat_records(&self) -> Result<Vec<CombatRecord>, StoreError> {
        Ok(self.lock().combat_records.clone())
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut state = self.lock();
        let mut undo = state.undo_point();
        state.version = SNAPSHOT_VERSION;
        let mut result = Ok(());
        for write in batch.writes {
            result = state.apply(write, &mut undo);
            if result.is_err() {
                break;
            }
        }
        if result.is_ok() {
            if let Some(path) = &self.snapshot_path {
                result = Self::persist(path, &state);
            }
        }
        if result.is_err() {
            state.roll_back(undo);
        }
        result
    }
}
