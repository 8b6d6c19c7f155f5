//! Integration test: character actions through the engine
//!
//! Covers creation, both advancement paths, exploration, duels and the
//! read-only status view, with scripted randomness and a manual clock.

use std::sync::Arc;

use tribulation::character::{Affinity, Character};
use tribulation::core::{
    Action, Engine, EngineConfig, EngineError, ErrorCategory, ManualClock, Outcome, ScriptedRolls,
};
use tribulation::exploration::{EffectLine, ExploreOutcome};
use tribulation::store::{CombatKind, LogCategory, MemoryStore, Store, WriteBatch};

const NOW: i64 = 1_700_000_000;

fn engine(rolls: Vec<f64>) -> (Engine<MemoryStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    let engine = Engine::with_parts(
        MemoryStore::new(),
        EngineConfig::default(),
        ScriptedRolls::new(rolls),
        Arc::clone(&clock),
    );
    (engine, clock)
}

fn seed_character(engine: &Engine<MemoryStore>, character: Character) {
    engine
        .store()
        .commit(WriteBatch::new().create_character(character))
        .unwrap();
}

fn stored(engine: &Engine<MemoryStore>, actor_id: &str) -> Character {
    engine.store().character(actor_id).unwrap().unwrap()
}

#[test]
fn test_begin_creates_level_one_character_once() {
    let (engine, _) = engine(vec![0.0]);

    let created = engine.begin_character("alice").unwrap();
    assert_eq!(created.affinity, Affinity::Metal);
    assert_eq!(created.level, 1);
    assert_eq!(created.cultivation, 0);
    assert_eq!(created.karma, 0);
    assert_eq!(created.created_at, NOW);

    let log = engine.store().recent_log("alice", 10).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].category, LogCategory::Creation);

    let err = engine.begin_character("alice").unwrap_err();
    assert!(matches!(err, EngineError::AlreadyExists { .. }));
    assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    assert_eq!(engine.store().recent_log("alice", 10).unwrap().len(), 1);
}

#[test]
fn test_actions_on_missing_character_are_not_found() {
    let (engine, _) = engine(vec![0.5]);
    for err in [
        engine.cultivate("nobody").unwrap_err(),
        engine.explore("nobody").unwrap_err(),
        engine.attempt_breakthrough("nobody").unwrap_err(),
        engine.status("nobody").unwrap_err(),
    ] {
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}

/// Metal, level 1, noise factor 1.0: gain is trunc(1.3) = 1.
#[test]
fn test_first_cultivation_of_metal_character() {
    let (engine, _) = engine(vec![0.0, 0.5]);
    engine.begin_character("alice").unwrap();

    let report = engine.cultivate("alice").unwrap();
    assert_eq!(report.gain, 1);
    assert_eq!(report.cultivation, 1);
    assert!(!report.auto_breakthrough);

    let alice = stored(&engine, "alice");
    assert_eq!(alice.cultivation, 1);
    assert_eq!(alice.last_cultivation_at, NOW);

    let log = engine.store().recent_log("alice", 1).unwrap();
    assert_eq!(log[0].category, LogCategory::Cultivation);
    assert_eq!(log[0].cultivation_delta, 1);
}

#[test]
fn test_cooldown_blocks_until_window_passes() {
    let (engine, clock) = engine(vec![0.0, 0.5]);
    engine.begin_character("alice").unwrap();
    engine.cultivate("alice").unwrap();

    let err = engine.cultivate("alice").unwrap_err();
    assert!(matches!(err, EngineError::OnCooldown { remaining_secs: 3600 }));

    clock.advance(3599);
    let err = engine.cultivate("alice").unwrap_err();
    assert!(matches!(err, EngineError::OnCooldown { remaining_secs: 1 }));
    assert_eq!(stored(&engine, "alice").cultivation, 1);

    clock.advance(1);
    engine.cultivate("alice").unwrap();
    assert_eq!(stored(&engine, "alice").cultivation, 2);
}

#[test]
fn test_cultivation_auto_breakthrough_logs_it() {
    let (engine, _) = engine(vec![0.5]);
    let mut c = Character::new("alice", Affinity::Fire, 0);
    c.cultivation = 1999;
    seed_character(&engine, c);

    let report = engine.cultivate("alice").unwrap();
    assert!(report.auto_breakthrough);
    assert_eq!(report.level, 2);
    let log = engine.store().recent_log("alice", 1).unwrap();
    assert!(log[0].label.contains("Foundation Establishment"));
}

fn golden_core(actor_id: &str) -> Character {
    let mut c = Character::new(actor_id, Affinity::Water, 0);
    c.level = 3;
    c.cultivation = 4000;
    c
}

#[test]
fn test_tribulation_success() {
    let (engine, _) = engine(vec![0.6]);
    seed_character(&engine, golden_core("alice"));

    let report = engine.attempt_breakthrough("alice").unwrap();
    assert!(report.success);

    let alice = stored(&engine, "alice");
    assert_eq!(alice.level, 4);
    assert_eq!(alice.cultivation, 0);
    assert_eq!(alice.karma, 50);

    let log = engine.store().recent_log("alice", 1).unwrap();
    assert_eq!(log[0].category, LogCategory::Tribulation);
    assert_eq!(log[0].cultivation_delta, -4000);
    assert_eq!(log[0].karma_delta, 50);
}

#[test]
fn test_tribulation_failure() {
    let (engine, _) = engine(vec![0.7]);
    seed_character(&engine, golden_core("alice"));

    let report = engine.attempt_breakthrough("alice").unwrap();
    assert!(!report.success);

    let alice = stored(&engine, "alice");
    assert_eq!(alice.level, 3);
    assert_eq!(alice.cultivation, 2000);
    assert_eq!(alice.karma, -30);
}

#[test]
fn test_tribulation_preconditions_write_nothing() {
    let (engine, _) = engine(vec![0.0]);
    let mut peak = Character::new("peak", Affinity::Earth, 0);
    peak.level = 8;
    peak.cultivation = 50_000;
    seed_character(&engine, peak.clone());
    let mut novice = Character::new("novice", Affinity::Earth, 0);
    novice.cultivation = 1999;
    seed_character(&engine, novice.clone());

    let err = engine.attempt_breakthrough("peak").unwrap_err();
    assert!(matches!(err, EngineError::MaxLevelReached));
    assert_eq!(stored(&engine, "peak"), peak);

    let err = engine.attempt_breakthrough("novice").unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientCultivation {
            required: 2000,
            current: 1999
        }
    ));
    assert_eq!(stored(&engine, "novice"), novice);
    assert!(engine.store().recent_log("peak", 5).unwrap().is_empty());
    assert!(engine.store().recent_log("novice", 5).unwrap().is_empty());
}

#[test]
fn test_level_one_exploration_applies_base_event() {
    let (engine, _) = engine(vec![0.0]);
    engine.begin_character("alice").unwrap();

    let outcome = engine.explore("alice").unwrap();
    let report = match outcome {
        ExploreOutcome::Event(report) => report,
        ExploreOutcome::NoEventAvailable => panic!("level 1 always has base events"),
    };
    assert_eq!(report.name, "Spirit Herb Garden");
    assert_eq!(
        report.effects,
        vec![
            EffectLine::CultivationChanged(100),
            EffectLine::KarmaChanged(20)
        ]
    );

    let alice = stored(&engine, "alice");
    assert_eq!((alice.cultivation, alice.karma), (100, 20));
    let log = engine.store().recent_log("alice", 1).unwrap();
    assert_eq!(log[0].category, LogCategory::Exploration);
    assert_eq!(log[0].label, "Spirit Herb Garden");
    assert_eq!((log[0].cultivation_delta, log[0].karma_delta), (100, 20));
}

#[test]
fn test_exploration_log_records_clamped_delta() {
    // level 2 sees 6 events; 0.9 picks the sixth, Misty Forest
    let (engine, _) = engine(vec![0.9]);
    let mut c = Character::new("alice", Affinity::Wood, 0);
    c.level = 2;
    c.cultivation = 30;
    seed_character(&engine, c);

    engine.explore("alice").unwrap();
    let alice = stored(&engine, "alice");
    assert_eq!(alice.cultivation, 0);
    assert_eq!(alice.karma, -10);
    let log = engine.store().recent_log("alice", 1).unwrap();
    assert_eq!(log[0].label, "Misty Forest");
    assert_eq!(log[0].cultivation_delta, -30);
}

/// Powers 1000 vs 3000 give a 0.35 win rate; a 0.3 draw is a challenger win.
#[test]
fn test_duel_rewards_and_records() {
    let (engine, _) = engine(vec![0.3]);
    let mut a = Character::new("a", Affinity::Earth, 0);
    a.cultivation = 350;
    let mut b = Character::new("b", Affinity::Earth, 0);
    b.cultivation = 2350;
    seed_character(&engine, a);
    seed_character(&engine, b);

    let report = engine.challenge_character("a", "b").unwrap();
    assert_eq!(report.challenger_power, 1000);
    assert_eq!(report.defender_power, 3000);
    assert!((report.win_rate - 0.35).abs() < 1e-9);
    assert!(report.challenger_won);
    assert_eq!(report.cultivation_reward, 100);

    let a = stored(&engine, "a");
    let b = stored(&engine, "b");
    assert_eq!((a.cultivation, a.karma), (450, 20));
    assert_eq!((b.cultivation, b.karma), (2350, -20));

    let records = engine.store().combat_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, CombatKind::Duel);
    assert_eq!(records[0].winner_id, "a");

    let a_log = engine.store().recent_log("a", 5).unwrap();
    let b_log = engine.store().recent_log("b", 5).unwrap();
    assert_eq!(a_log[0].category, LogCategory::DuelWin);
    assert_eq!(b_log[0].category, LogCategory::DuelLoss);
    assert_eq!(b_log[0].karma_delta, -20);
}

#[test]
fn test_duel_preconditions() {
    let (engine, _) = engine(vec![0.0]);
    engine.begin_character("a").unwrap();

    let err = engine.challenge_character("a", "a").unwrap_err();
    assert!(matches!(err, EngineError::InvalidTarget));
    let err = engine.challenge_character("a", "ghost").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(engine.store().combat_records().unwrap().is_empty());
}

#[test]
fn test_status_reads_without_writing() {
    let (engine, _) = engine(vec![0.0, 0.5]);
    engine.begin_character("alice").unwrap();
    engine.cultivate("alice").unwrap();
    engine.explore("alice").unwrap();
    engine.explore("alice").unwrap();

    let before = engine.store().snapshot();
    let status = engine.status("alice").unwrap();
    assert_eq!(engine.store().snapshot(), before);

    assert_eq!(status.realm, "Qi Refining");
    assert_eq!(status.faction_name, None);
    let next = status.next_tribulation.unwrap();
    assert_eq!(next.required, 2000);
    assert!((next.chance - 0.75).abs() < 1e-9);
    assert_eq!(status.recent_log.len(), 3);
    assert_eq!(status.recent_log[0].category, LogCategory::Exploration);
    assert_eq!(status.recent_log[2].category, LogCategory::Cultivation);
}

#[test]
fn test_status_at_peak_has_no_next_tribulation() {
    let (engine, _) = engine(vec![0.0]);
    let mut peak = Character::new("peak", Affinity::Metal, 0);
    peak.level = 8;
    seed_character(&engine, peak);
    let status = engine.status("peak").unwrap();
    assert_eq!(status.realm, "Mahayana");
    assert!(status.next_tribulation.is_none());
}

#[test]
fn test_dispatch_routes_and_serializes() {
    let (engine, _) = engine(vec![0.0, 0.5]);
    let outcome = engine.dispatch("alice", Action::Begin).unwrap();
    assert!(matches!(outcome, Outcome::Began(_)));

    let outcome = engine.dispatch("alice", Action::Cultivate).unwrap();
    assert!(matches!(outcome, Outcome::Cultivated(ref r) if r.gain == 1));

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("Cultivated"));

    let err = engine
        .dispatch(
            "alice",
            Action::Challenge {
                target_id: "alice".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTarget));
}
