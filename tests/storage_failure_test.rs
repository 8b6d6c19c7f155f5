//! Integration test: storage failures
//!
//! A failed commit must leave every entity and record exactly as it was, and
//! surface as `StorageUnavailable`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tribulation::character::{Affinity, Character};
use tribulation::core::{
    Engine, EngineConfig, EngineError, ErrorCategory, ManualClock, ScriptedRolls,
};
use tribulation::faction::Faction;
use tribulation::store::{
    ActionLogEntry, CombatRecord, MemoryStore, Store, StoreError, WriteBatch,
};

const NOW: i64 = 1_700_000_000;

/// Wraps a store and fails reads or commits on demand.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_commits: AtomicBool,
}

impl FlakyStore {
    fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read refused".to_string()));
        }
        Ok(())
    }
}

impl Store for FlakyStore {
    fn character(&self, actor_id: &str) -> Result<Option<Character>, StoreError> {
        self.check_read()?;
        self.inner.character(actor_id)
    }

    fn faction(&self, faction_id: &str) -> Result<Option<Faction>, StoreError> {
        self.check_read()?;
        self.inner.faction(faction_id)
    }

    fn faction_by_name(&self, name: &str) -> Result<Option<Faction>, StoreError> {
        self.check_read()?;
        self.inner.faction_by_name(name)
    }

    fn faction_members(&self, faction_id: &str) -> Result<Vec<Character>, StoreError> {
        self.check_read()?;
        self.inner.faction_members(faction_id)
    }

    fn recent_log(&self, actor_id: &str, limit: usize) -> Result<Vec<ActionLogEntry>, StoreError> {
        self.check_read()?;
        self.inner.recent_log(actor_id, limit)
    }

    fn combat_records(&self) -> Result<Vec<CombatRecord>, StoreError> {
        self.check_read()?;
        self.inner.combat_records()
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit refused".to_string()));
        }
        self.inner.commit(batch)
    }
}

fn engine() -> Engine<FlakyStore> {
    let engine = Engine::with_parts(
        FlakyStore::default(),
        EngineConfig::default(),
        ScriptedRolls::constant(0.0),
        Arc::new(ManualClock::new(NOW)),
    );
    for id in ["a", "b"] {
        let c = Character::new(id, Affinity::Fire, 0);
        engine
            .store()
            .commit(WriteBatch::new().create_character(c))
            .unwrap();
    }
    engine
}

fn assert_storage_error(err: EngineError) {
    assert!(matches!(err, EngineError::StorageUnavailable(_)));
    assert_eq!(err.category(), ErrorCategory::StorageUnavailable);
    assert!(!err.is_recoverable());
}

#[test]
fn test_failed_commit_leaves_world_untouched() {
    let engine = engine();
    let before = engine.store().inner.snapshot();
    engine.store().fail_commits.store(true, Ordering::SeqCst);

    assert_storage_error(engine.cultivate("a").unwrap_err());
    assert_storage_error(engine.explore("a").unwrap_err());
    assert_storage_error(engine.challenge_character("a", "b").unwrap_err());
    assert_storage_error(engine.begin_character("c").unwrap_err());

    assert_eq!(engine.store().inner.snapshot(), before);
}

#[test]
fn test_cooldown_is_not_claimed_by_a_failed_commit() {
    let engine = engine();
    engine.store().fail_commits.store(true, Ordering::SeqCst);
    assert_storage_error(engine.cultivate("a").unwrap_err());

    engine.store().fail_commits.store(false, Ordering::SeqCst);
    let report = engine.cultivate("a").unwrap();
    assert!(report.gain > 0);
}

#[test]
fn test_read_failure_surfaces_from_status() {
    let engine = engine();
    engine.store().fail_reads.store(true, Ordering::SeqCst);
    assert_storage_error(engine.status("a").unwrap_err());
}

#[test]
fn test_snapshot_write_failure_keeps_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("world.json");
    let engine = Engine::with_parts(
        MemoryStore::open(&path).unwrap(),
        EngineConfig::default(),
        ScriptedRolls::constant(0.0),
        Arc::new(ManualClock::new(NOW)),
    );

    let err = engine.begin_character("a").unwrap_err();
    assert!(matches!(
        err,
        EngineError::StorageUnavailable(StoreError::Io(_))
    ));
    assert!(engine.store().character("a").unwrap().is_none());
}

#[test]
fn test_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");
    {
        let engine = Engine::with_parts(
            MemoryStore::open(&path).unwrap(),
            EngineConfig::default(),
            ScriptedRolls::constant(0.0),
            Arc::new(ManualClock::new(NOW)),
        );
        engine.begin_character("a").unwrap();
        engine.explore("a").unwrap();
    }

    let reopened = MemoryStore::open(&path).unwrap();
    let a = reopened.character("a").unwrap().unwrap();
    assert_eq!(a.cultivation, 100);
    assert_eq!(reopened.recent_log("a", 10).unwrap().len(), 2);
}

#[test]
fn test_engine_from_config_persists_to_snapshot_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");
    let config = EngineConfig {
        snapshot_path: Some(path.clone()),
        ..EngineConfig::default()
    };

    let engine = Engine::from_config(config).unwrap();
    engine.begin_character("a").unwrap();
    drop(engine);

    let reopened = MemoryStore::open(&path).unwrap();
    assert_eq!(reopened.character("a").unwrap().unwrap().level, 1);
}
