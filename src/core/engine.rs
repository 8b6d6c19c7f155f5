//! Action dispatch.
//!
//! Every action follows the same cycle: lock the entities it touches, load
//! them, validate, compute with the pure rule functions, and commit one
//! [`WriteBatch`]. Nothing is written when validation fails, with one
//! exception: a character pointing at a faction that no longer resolves has
//! the reference cleared and committed before `DataIntegrity` is returned.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::{Clock, SystemClock};
use super::config::EngineConfig;
use super::constants::FACTION_WAR_DEFENDER;
use super::error::EngineError;
use super::locks::{EntityLocks, LockGuard, LockKey};
use super::rng::{RandomSource, RngSource};
use crate::character::{
    self, breakthrough_chance, combat_power, required_cultivation, Affinity, BreakthroughReport,
    Character, CultivationReport,
};
use crate::combat::{resolve_duel, DuelReport};
use crate::exploration::{self, ExploreOutcome};
use crate::faction::registry::ensure_unaffiliated;
use crate::faction::{self, Faction, FactionWarReport, FoundingRules, LeaveReport};
use crate::store::{
    ActionLogEntry, CombatKind, CombatRecord, LogCategory, MemoryStore, Store, WriteBatch,
};

/// Requirement and odds of the next tribulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextTribulation {
    pub required: i64,
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub character: Character,
    pub realm: String,
    pub combat_power: i64,
    pub faction_name: Option<String>,
    /// `None` at the highest realm.
    pub next_tribulation: Option<NextTribulation>,
    /// Newest first.
    pub recent_log: Vec<ActionLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactionInfo {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub description: String,
    pub leader_id: String,
    pub elders: Vec<String>,
    pub member_count: usize,
    pub resources: i64,
    pub total_power: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElderReport {
    pub faction_id: String,
    pub faction_name: String,
    pub elder_id: String,
    /// False when the target already was an elder.
    pub newly_appointed: bool,
}

/// A verb and its raw argument, as delivered by the command surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Begin,
    Status,
    Cultivate,
    Explore,
    Breakthrough,
    Challenge { target_id: String },
    CreateFaction { name: String },
    JoinFaction { name: String },
    LeaveFaction,
    AppointElder { target_id: String },
    ChallengeFaction { target_name: String },
    FactionInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Began(Character),
    Status(StatusReport),
    Cultivated(CultivationReport),
    Explored(ExploreOutcome),
    Tribulation(BreakthroughReport),
    Duel(DuelReport),
    FactionFounded(Faction),
    FactionJoined(Faction),
    FactionLeft(LeaveReport),
    ElderAppointed(ElderReport),
    FactionWar(FactionWarReport),
    FactionInfo(FactionInfo),
}

pub struct Engine<S: Store = MemoryStore> {
    store: S,
    locks: EntityLocks,
    rng: Mutex<Box<dyn RandomSource + Send>>,
    clock: Box<dyn Clock>,
    config: EngineConfig,
}

impl Engine<MemoryStore> {
    /// Engine over a [`MemoryStore`], restored from `config.snapshot_path` when set.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let store = match &config.snapshot_path {
            Some(path) => MemoryStore::open(path)?,
            None => MemoryStore::new(),
        };
        Ok(Self::new(store, config))
    }
}

impl<S: Store> Engine<S> {
    /// Engine with entropy-seeded randomness and the system clock.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_parts(store, config, RngSource::from_entropy(), SystemClock)
    }

    pub fn with_parts(
        store: S,
        config: EngineConfig,
        rng: impl RandomSource + Send + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            store,
            locks: EntityLocks::new(),
            rng: Mutex::new(Box::new(rng)),
            clock: Box::new(clock),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatch(&self, actor_id: &str, action: Action) -> Result<Outcome, EngineError> {
        match action {
            Action::Begin => self.begin_character(actor_id).map(Outcome::Began),
            Action::Status => self.status(actor_id).map(Outcome::Status),
            Action::Cultivate => self.cultivate(actor_id).map(Outcome::Cultivated),
            Action::Explore => self.explore(actor_id).map(Outcome::Explored),
            Action::Breakthrough => self.attempt_breakthrough(actor_id).map(Outcome::Tribulation),
            Action::Challenge { target_id } => self
                .challenge_character(actor_id, &target_id)
                .map(Outcome::Duel),
            Action::CreateFaction { name } => self
                .create_faction(actor_id, &name)
                .map(Outcome::FactionFounded),
            Action::JoinFaction { name } => self
                .join_faction(actor_id, &name)
                .map(Outcome::FactionJoined),
            Action::LeaveFaction => self.leave_faction(actor_id).map(Outcome::FactionLeft),
            Action::AppointElder { target_id } => self
                .appoint_elder(actor_id, &target_id)
                .map(Outcome::ElderAppointed),
            Action::ChallengeFaction { target_name } => self
                .challenge_faction(actor_id, &target_name)
                .map(Outcome::FactionWar),
            Action::FactionInfo => self.faction_info(actor_id).map(Outcome::FactionInfo),
        }
    }

    // ── Character actions ───────────────────────────────────────────

    /// Create the actor's character with a uniformly rolled affinity.
    pub fn begin_character(&self, actor_id: &str) -> Result<Character, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let existing = self.store.character(actor_id)?;
        let affinities = Affinity::all();
        let affinity = self.roll(|rng| affinities[rng.index(affinities.len())]);
        let now = self.clock.now();
        let created = character::create_character(existing.as_ref(), actor_id, affinity, now)?;

        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Creation,
            format!("Began cultivating with {affinity} affinity"),
            0,
            0,
            now,
        );
        self.commit(
            WriteBatch::new()
                .create_character(created.clone())
                .log(entry),
        )?;
        tracing::info!(actor = actor_id, %affinity, "character created");
        Ok(created)
    }

    /// Read-only view of the actor. Never writes, never repairs.
    pub fn status(&self, actor_id: &str) -> Result<StatusReport, EngineError> {
        let character = self.load_character(actor_id)?;
        let faction_name = match &character.faction_id {
            Some(faction_id) => self.store.faction(faction_id)?.map(|f| f.name),
            None => None,
        };
        let next_tribulation = (!character.is_max_level()).then(|| NextTribulation {
            required: required_cultivation(character.level),
            chance: breakthrough_chance(character.level),
        });
        let recent_log = self
            .store
            .recent_log(actor_id, self.config.status_history_len)?;

        Ok(StatusReport {
            realm: character.realm_name().to_string(),
            combat_power: combat_power(&character),
            faction_name,
            next_tribulation,
            recent_log,
            character,
        })
    }

    pub fn cultivate(&self, actor_id: &str) -> Result<CultivationReport, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut character = self.load_character(actor_id)?;
        let now = self.clock.now();
        let cooldown = self.config.cultivation_cooldown_secs;
        let report =
            self.roll(|rng| character::cultivate(&mut character, now, cooldown, rng))?;

        let label = if report.auto_breakthrough {
            format!("Broke through to {} while cultivating", character.realm_name())
        } else {
            "Routine cultivation".to_string()
        };
        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Cultivation,
            label,
            report.gain,
            0,
            now,
        );
        self.commit(WriteBatch::new().update_character(character).log(entry))?;
        tracing::info!(
            actor = actor_id,
            gain = report.gain,
            level = report.level,
            auto_breakthrough = report.auto_breakthrough,
            "cultivated"
        );
        Ok(report)
    }

    pub fn explore(&self, actor_id: &str) -> Result<ExploreOutcome, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut character = self.load_character(actor_id)?;
        let outcome = self.roll(|rng| exploration::explore(&mut character, rng));

        if let ExploreOutcome::Event(report) = &outcome {
            let entry = ActionLogEntry::new(
                actor_id,
                LogCategory::Exploration,
                report.name.clone(),
                report.cultivation_delta,
                report.karma_delta,
                self.clock.now(),
            );
            self.commit(WriteBatch::new().update_character(character).log(entry))?;
            tracing::info!(actor = actor_id, event = %report.name, "explored");
        }
        Ok(outcome)
    }

    pub fn attempt_breakthrough(&self, actor_id: &str) -> Result<BreakthroughReport, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut character = self.load_character(actor_id)?;
        let report = self.roll(|rng| character::attempt_breakthrough(&mut character, rng))?;

        let label = if report.success {
            format!("Survived the tribulation, reached {}", character.realm_name())
        } else {
            "Failed the tribulation".to_string()
        };
        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Tribulation,
            label,
            report.cultivation_delta,
            report.karma_delta,
            self.clock.now(),
        );
        self.commit(WriteBatch::new().update_character(character).log(entry))?;
        tracing::info!(
            actor = actor_id,
            success = report.success,
            level = report.level,
            "tribulation resolved"
        );
        Ok(report)
    }

    pub fn challenge_character(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<DuelReport, EngineError> {
        if actor_id == target_id {
            return Err(EngineError::InvalidTarget);
        }
        let _guard = self
            .locks
            .acquire([LockKey::character(actor_id), LockKey::character(target_id)]);
        let mut challenger = self.load_character(actor_id)?;
        let mut defender = self.load_character(target_id)?;
        let report = self.roll(|rng| resolve_duel(&mut challenger, &mut defender, rng))?;

        let now = self.clock.now();
        let record = CombatRecord {
            id: CombatRecord::new_id(),
            kind: CombatKind::Duel,
            challenger_id: report.challenger_id.clone(),
            defender_id: report.defender_id.clone(),
            winner_id: report.winner_id.clone(),
            challenger_faction_id: challenger.faction_id.clone(),
            defender_faction_id: defender.faction_id.clone(),
            cultivation_reward: report.cultivation_reward,
            karma_swing: report.karma_swing,
            resource_transfer: 0,
            timestamp: now,
        };
        let win = ActionLogEntry::new(
            &report.winner_id,
            LogCategory::DuelWin,
            format!("Defeated {}", report.loser_id),
            report.cultivation_reward,
            report.karma_swing,
            now,
        );
        let loss = ActionLogEntry::new(
            &report.loser_id,
            LogCategory::DuelLoss,
            format!("Lost to {}", report.winner_id),
            0,
            -report.karma_swing,
            now,
        );
        self.commit(
            WriteBatch::new()
                .update_character(challenger)
                .update_character(defender)
                .combat(record)
                .log(win)
                .log(loss),
        )?;
        tracing::info!(
            challenger = actor_id,
            defender = target_id,
            winner = %report.winner_id,
            "duel resolved"
        );
        Ok(report)
    }

    // ── Faction actions ─────────────────────────────────────────────

    pub fn create_faction(&self, actor_id: &str, name: &str) -> Result<Faction, EngineError> {
        let name = faction::validate_name(name)?;
        let _guard = self
            .locks
            .acquire([LockKey::character(actor_id), LockKey::faction_name(&name)]);
        let mut founder = self.load_character(actor_id)?;
        self.repair_dangling_reference(&mut founder)?;
        let name_holder = self.store.faction_by_name(&name)?;

        let rules = FoundingRules {
            min_level: self.config.faction_min_level,
            seed_resources: self.config.faction_seed_resources,
        };
        let now = self.clock.now();
        let founded = faction::found_faction(
            &mut founder,
            &name,
            name_holder.as_ref(),
            Uuid::new_v4().to_string(),
            rules,
            now,
        )?;

        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Faction,
            format!("Founded {}", founded.name),
            0,
            0,
            now,
        );
        self.commit(
            WriteBatch::new()
                .create_faction(founded.clone())
                .update_character(founder)
                .log(entry),
        )?;
        tracing::info!(
            actor = actor_id,
            faction = %founded.name,
            id = %founded.id,
            "faction founded"
        );
        Ok(founded)
    }

    pub fn join_faction(&self, actor_id: &str, name: &str) -> Result<Faction, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut actor = self.load_character(actor_id)?;
        self.repair_dangling_reference(&mut actor)?;
        ensure_unaffiliated(&actor)?;

        let name = name.trim();
        let target = self
            .store
            .faction_by_name(name)?
            .ok_or_else(|| EngineError::faction_not_found(name))?;
        faction::join_faction(&mut actor, &target)?;

        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Faction,
            format!("Joined {}", target.name),
            0,
            0,
            self.clock.now(),
        );
        self.commit(WriteBatch::new().update_character(actor).log(entry))?;
        tracing::info!(actor = actor_id, faction = %target.name, "joined faction");
        Ok(target)
    }

    pub fn leave_faction(&self, actor_id: &str) -> Result<LeaveReport, EngineError> {
        let mut guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut actor = self.load_character(actor_id)?;
        let mut own = self.lock_own_faction(&mut guard, &mut actor, EngineError::NotInFaction)?;
        let report = faction::leave_faction(&mut actor, &mut own)?;

        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Faction,
            format!("Left {}", report.faction_name),
            0,
            0,
            self.clock.now(),
        );
        let mut batch = WriteBatch::new().update_character(actor);
        if report.was_elder {
            batch = batch.update_faction(own);
        }
        self.commit(batch.log(entry))?;
        tracing::info!(actor = actor_id, faction = %report.faction_name, "left faction");
        Ok(report)
    }

    pub fn appoint_elder(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<ElderReport, EngineError> {
        let mut guard = self
            .locks
            .acquire([LockKey::character(actor_id), LockKey::character(target_id)]);
        let mut leader = self.load_character(actor_id)?;
        let mut own = self.lock_own_faction(&mut guard, &mut leader, EngineError::NotLeader)?;
        if !own.is_leader(actor_id) {
            return Err(EngineError::NotLeader);
        }
        let target = self.load_character(target_id)?;
        let newly_appointed = faction::appoint_elder(&leader, &mut own, &target)?;

        let entry = ActionLogEntry::new(
            actor_id,
            LogCategory::Faction,
            format!("Appointed {target_id} elder of {}", own.name),
            0,
            0,
            self.clock.now(),
        );
        let report = ElderReport {
            faction_id: own.id.clone(),
            faction_name: own.name.clone(),
            elder_id: target_id.to_string(),
            newly_appointed,
        };
        self.commit(WriteBatch::new().update_faction(own).log(entry))?;
        tracing::info!(
            actor = actor_id,
            elder = target_id,
            newly_appointed,
            "elder appointed"
        );
        Ok(report)
    }

    /// Faction war led by a leader or elder against another faction by name.
    pub fn challenge_faction(
        &self,
        actor_id: &str,
        target_name: &str,
    ) -> Result<FactionWarReport, EngineError> {
        let mut guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut actor = self.load_character(actor_id)?;
        let own_id = actor.faction_id.clone().ok_or(EngineError::Unauthorized)?;

        // Authority is checked on an unlocked read first; both factions are
        // then locked together and everything is checked again.
        let own = self.resolve_faction(&mut actor, &own_id)?;
        if !own.can_command(actor_id) {
            return Err(EngineError::Unauthorized);
        }

        let target_name = target_name.trim();
        let target_id = self
            .store
            .faction_by_name(target_name)?
            .map(|f| f.id)
            .ok_or_else(|| EngineError::faction_not_found(target_name))?;
        guard.extend([LockKey::faction(&own_id), LockKey::faction(&target_id)]);

        let mut own = self.resolve_faction(&mut actor, &own_id)?;
        let mut target = self
            .store
            .faction(&target_id)?
            .ok_or_else(|| EngineError::faction_not_found(target_name))?;
        faction::war::check_war(actor_id, &own, &target)?;

        let own_power = faction::total_power(&self.store.faction_members(&own.id)?);
        let target_power = faction::total_power(&self.store.faction_members(&target.id)?);
        let report = self.roll(|rng| {
            faction::resolve_faction_war(
                actor_id,
                &mut own,
                own_power,
                &mut target,
                target_power,
                rng,
            )
        })?;

        let record = CombatRecord {
            id: CombatRecord::new_id(),
            kind: CombatKind::FactionWar,
            challenger_id: actor_id.to_string(),
            defender_id: FACTION_WAR_DEFENDER.to_string(),
            winner_id: report.winner_id.clone(),
            challenger_faction_id: Some(own.id.clone()),
            defender_faction_id: Some(target.id.clone()),
            cultivation_reward: 0,
            karma_swing: 0,
            resource_transfer: report.resource_transfer,
            timestamp: self.clock.now(),
        };
        self.commit(
            WriteBatch::new()
                .update_faction(own)
                .update_faction(target)
                .combat(record),
        )?;
        tracing::info!(
            actor = actor_id,
            attacker = %report.attacker_name,
            defender = %report.defender_name,
            attacker_won = report.attacker_won,
            transfer = report.resource_transfer,
            "faction war resolved"
        );
        Ok(report)
    }

    pub fn faction_info(&self, actor_id: &str) -> Result<FactionInfo, EngineError> {
        let _guard = self.locks.acquire([LockKey::character(actor_id)]);
        let mut actor = self.load_character(actor_id)?;
        let faction_id = actor.faction_id.clone().ok_or(EngineError::NotInFaction)?;
        let own = self.resolve_faction(&mut actor, &faction_id)?;
        let members = self.store.faction_members(&own.id)?;

        Ok(FactionInfo {
            member_count: members.len(),
            total_power: faction::total_power(&members),
            id: own.id,
            name: own.name,
            level: own.level,
            description: own.description,
            leader_id: own.leader_id,
            elders: own.elders,
            resources: own.resources,
            created_at: own.created_at,
        })
    }

    // ── Internals ───────────────────────────────────────────────────

    fn roll<T>(&self, f: impl FnOnce(&mut dyn RandomSource) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **rng)
    }

    fn load_character(&self, actor_id: &str) -> Result<Character, EngineError> {
        self.store
            .character(actor_id)?
            .ok_or_else(|| EngineError::character_not_found(actor_id))
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), EngineError> {
        let writes = batch.len();
        self.store.commit(batch).map_err(|err| {
            tracing::warn!(error = %err, writes, "commit failed");
            EngineError::from(err)
        })
    }

    /// Load the faction `actor` points at, repairing the reference if it is gone.
    ///
    /// The caller must hold the actor's lock.
    fn resolve_faction(
        &self,
        actor: &mut Character,
        faction_id: &str,
    ) -> Result<Faction, EngineError> {
        match self.store.faction(faction_id)? {
            Some(found) => Ok(found),
            None => {
                actor.faction_id = None;
                tracing::warn!(
                    actor = %actor.actor_id,
                    faction = faction_id,
                    "dangling faction reference cleared"
                );
                self.commit(WriteBatch::new().update_character(actor.clone()))?;
                Err(EngineError::DataIntegrity {
                    actor_id: actor.actor_id.clone(),
                    faction_id: faction_id.to_string(),
                })
            }
        }
    }

    fn repair_dangling_reference(&self, actor: &mut Character) -> Result<(), EngineError> {
        match actor.faction_id.clone() {
            Some(faction_id) => self.resolve_faction(actor, &faction_id).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Lock and load the actor's own faction. `unaffiliated` is returned when
    /// the actor has none.
    fn lock_own_faction(
        &self,
        guard: &mut LockGuard<'_>,
        actor: &mut Character,
        unaffiliated: EngineError,
    ) -> Result<Faction, EngineError> {
        let faction_id = match actor.faction_id.clone() {
            Some(id) => id,
            None => return Err(unaffiliated),
        };
        guard.extend([LockKey::faction(&faction_id)]);
        self.resolve_faction(actor, &faction_id)
    }
}
