//! Concurrent soak runner.
//!
//! Spawns workers that hammer one shared engine with random actions, then
//! checks the final world against the invariants every action must preserve.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SoakConfig;
use super::report::SoakReport;
use crate::core::clock::ManualClock;
use crate::core::config::EngineConfig;
use crate::core::constants::{MAX_LEVEL, MIN_LEVEL};
use crate::core::engine::{Action, Engine};
use crate::core::rng::RngSource;
use crate::store::{MemoryStore, Snapshot};

const START_TIME: i64 = 1_700_000_000;
const FACTION_NAMES: [&str; 3] = ["Azure Cloud", "Crimson Flame", "Jade Lotus"];

type SoakEngine = Engine<MemoryStore>;

#[derive(Debug, Default)]
struct Tally {
    actions: u64,
    successes: u64,
    succeeded_by_action: BTreeMap<String, u64>,
    failed_by_category: BTreeMap<String, u64>,
}

impl Tally {
    fn merge_into(self, report: &mut SoakReport) {
        report.actions += self.actions;
        report.successes += self.successes;
        report.failures += self.actions - self.successes;
        for (action, count) in self.succeeded_by_action {
            *report.succeeded_by_action.entry(action).or_insert(0) += count;
        }
        for (category, count) in self.failed_by_category {
            *report.failed_by_category.entry(category).or_insert(0) += count;
        }
    }
}

/// Run a soak and return its report.
pub fn run_soak(config: &SoakConfig) -> SoakReport {
    let seed = config.seed.unwrap_or_else(rand::random);
    let clock = Arc::new(ManualClock::new(START_TIME));
    let engine = Arc::new(Engine::with_parts(
        MemoryStore::new(),
        EngineConfig::default(),
        RngSource::seeded(seed),
        Arc::clone(&clock),
    ));
    let actors: Arc<Vec<String>> = Arc::new(
        (0..config.actors.max(1))
            .map(|i| format!("actor-{i}"))
            .collect(),
    );

    let handles: Vec<_> = (0..config.workers.max(1))
        .map(|worker| {
            let engine = Arc::clone(&engine);
            let clock = Arc::clone(&clock);
            let actors = Arc::clone(&actors);
            let config = config.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64 + 1));
                let tally = run_worker(&engine, &clock, &actors, &config, &mut rng);
                if config.verbosity >= 2 {
                    println!(
                        "worker {worker}: {} actions, {} ok",
                        tally.actions, tally.successes
                    );
                }
                tally
            })
        })
        .collect();

    let mut report = SoakReport {
        seed,
        ..Default::default()
    };
    for handle in handles {
        match handle.join() {
            Ok(tally) => tally.merge_into(&mut report),
            Err(_) => report.violations.push("worker thread panicked".to_string()),
        }
    }

    let world = engine.store().snapshot();
    report.violations.extend(check_invariants(&world));
    report.record_world(&world);
    report
}

fn run_worker(
    engine: &SoakEngine,
    clock: &ManualClock,
    actors: &[String],
    config: &SoakConfig,
    rng: &mut StdRng,
) -> Tally {
    let mut tally = Tally::default();
    for _ in 0..config.actions_per_worker {
        let actor = &actors[rng.gen_range(0..actors.len())];
        let action = random_action(actors, rng);
        let label = action_label(&action);
        tally.actions += 1;
        match engine.dispatch(actor, action) {
            Ok(_) => {
                tally.successes += 1;
                *tally.succeeded_by_action.entry(label.to_string()).or_insert(0) += 1;
            }
            Err(err) => {
                let category = format!("{:?}", err.category());
                *tally.failed_by_category.entry(category).or_insert(0) += 1;
            }
        }
        clock.advance(config.clock_step_secs);
    }
    tally
}

fn random_action(actors: &[String], rng: &mut StdRng) -> Action {
    let other = actors[rng.gen_range(0..actors.len())].clone();
    let faction = FACTION_NAMES[rng.gen_range(0..FACTION_NAMES.len())].to_string();
    match rng.gen_range(0..100) {
        0..=7 => Action::Begin,
        8..=11 => Action::Status,
        12..=36 => Action::Cultivate,
        37..=54 => Action::Explore,
        55..=64 => Action::Breakthrough,
        65..=76 => Action::Challenge { target_id: other },
        77..=80 => Action::CreateFaction { name: faction },
        81..=86 => Action::JoinFaction { name: faction },
        87..=88 => Action::LeaveFaction,
        89..=92 => Action::AppointElder { target_id: other },
        93..=97 => Action::ChallengeFaction { target_name: faction },
        _ => Action::FactionInfo,
    }
}

fn action_label(action: &Action) -> &'static str {
    match action {
        Action::Begin => "begin",
        Action::Status => "status",
        Action::Cultivate => "cultivate",
        Action::Explore => "explore",
        Action::Breakthrough => "breakthrough",
        Action::Challenge { .. } => "challenge",
        Action::CreateFaction { .. } => "create_faction",
        Action::JoinFaction { .. } => "join_faction",
        Action::LeaveFaction => "leave_faction",
        Action::AppointElder { .. } => "appoint_elder",
        Action::ChallengeFaction { .. } => "challenge_faction",
        Action::FactionInfo => "faction_info",
    }
}

/// Everything that must hold in any reachable world.
pub fn check_invariants(world: &Snapshot) -> Vec<String> {
    let mut violations = Vec::new();

    for character in world.characters.values() {
        if character.cultivation < 0 {
            violations.push(format!(
                "{} has negative cultivation {}",
                character.actor_id, character.cultivation
            ));
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&character.level) {
            violations.push(format!(
                "{} is at level {} outside the realm ladder",
                character.actor_id, character.level
            ));
        }
        if let Some(faction_id) = &character.faction_id {
            if !world.factions.contains_key(faction_id) {
                violations.push(format!(
                    "{} points at missing faction {faction_id}",
                    character.actor_id
                ));
            }
        }
    }

    for faction in world.factions.values() {
        if faction.resources < 0 {
            violations.push(format!("{} has negative resources", faction.name));
        }
        let leader_inside = world
            .characters
            .get(&faction.leader_id)
            .is_some_and(|leader| leader.in_faction(&faction.id));
        if !leader_inside {
            violations.push(format!("{} lost its leader {}", faction.name, faction.leader_id));
        }
        for elder in &faction.elders {
            let elder_inside = world
                .characters
                .get(elder)
                .is_some_and(|c| c.in_faction(&faction.id));
            if !elder_inside {
                violations.push(format!("{} lists non-member elder {elder}", faction.name));
            }
        }
    }

    let mut names: Vec<&str> = world.factions.values().map(|f| f.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() != world.factions.len() {
        violations.push("faction names are not unique".to_string());
    }

    violations
}
