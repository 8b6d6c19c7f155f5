//! Membership rules and aggregate power.
//!
//! Functions here validate and mutate the entities handed to them; loading,
//! locking and committing is the engine's job.

use serde::Serialize;

use super::types::Faction;
use crate::character::ledger::combat_power;
use crate::character::types::Character;
use crate::core::constants::FACTION_NAME_MAX_CHARS;
use crate::core::error::{EngineError, NameRejection};

/// Trim and validate a faction name.
pub fn validate_name(name: &str) -> Result<String, EngineError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(NameRejection::Empty));
    }
    if trimmed.chars().count() > FACTION_NAME_MAX_CHARS {
        return Err(EngineError::InvalidName(NameRejection::TooLong {
            max_chars: FACTION_NAME_MAX_CHARS,
        }));
    }
    Ok(trimmed.to_string())
}

/// Rules for founding a faction.
#[derive(Debug, Clone, Copy)]
pub struct FoundingRules {
    pub min_level: u32,
    pub seed_resources: i64,
}

/// Found a faction with `founder` as leader and point the founder at it.
///
/// `name_holder` is whatever faction currently owns the (validated) name.
pub fn found_faction(
    founder: &mut Character,
    name: &str,
    name_holder: Option<&Faction>,
    faction_id: String,
    rules: FoundingRules,
    now: i64,
) -> Result<Faction, EngineError> {
    if founder.level < rules.min_level {
        return Err(EngineError::InsufficientLevel {
            required: rules.min_level,
            current: founder.level,
        });
    }
    if let Some(current) = &founder.faction_id {
        return Err(EngineError::AlreadyInFaction {
            faction_id: current.clone(),
        });
    }
    if name_holder.is_some() {
        return Err(EngineError::NameConflict {
            name: name.to_string(),
        });
    }

    let faction = Faction::new(
        faction_id,
        name,
        founder.actor_id.clone(),
        rules.seed_resources,
        now,
    );
    founder.faction_id = Some(faction.id.clone());
    Ok(faction)
}

/// Fails with `AlreadyInFaction` if the actor already belongs somewhere.
pub fn ensure_unaffiliated(actor: &Character) -> Result<(), EngineError> {
    match &actor.faction_id {
        Some(current) => Err(EngineError::AlreadyInFaction {
            faction_id: current.clone(),
        }),
        None => Ok(()),
    }
}

pub fn join_faction(actor: &mut Character, faction: &Faction) -> Result<(), EngineError> {
    ensure_unaffiliated(actor)?;
    actor.faction_id = Some(faction.id.clone());
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveReport {
    pub faction_id: String,
    pub faction_name: String,
    pub was_elder: bool,
}

/// Leave `faction`. Leaders cannot leave: there is no transfer or disband.
pub fn leave_faction(
    actor: &mut Character,
    faction: &mut Faction,
) -> Result<LeaveReport, EngineError> {
    if !actor.in_faction(&faction.id) {
        return Err(EngineError::NotInFaction);
    }
    if faction.is_leader(&actor.actor_id) {
        return Err(EngineError::LeaderCannotLeave);
    }
    let was_elder = faction.remove_elder(&actor.actor_id);
    actor.faction_id = None;
    Ok(LeaveReport {
        faction_id: faction.id.clone(),
        faction_name: faction.name.clone(),
        was_elder,
    })
}

/// Make `target` an elder of the leader's faction.
///
/// Returns false when the target already was one.
pub fn appoint_elder(
    leader: &Character,
    faction: &mut Faction,
    target: &Character,
) -> Result<bool, EngineError> {
    if !leader.in_faction(&faction.id) || !faction.is_leader(&leader.actor_id) {
        return Err(EngineError::NotLeader);
    }
    if !target.in_faction(&faction.id) {
        return Err(EngineError::NotAMember {
            actor_id: target.actor_id.clone(),
        });
    }
    Ok(faction.add_elder(&target.actor_id))
}

/// Sum of member combat power, from a live membership scan.
pub fn total_power(members: &[Character]) -> i64 {
    members.iter().map(combat_power).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::types::Affinity;

    const RULES: FoundingRules = FoundingRules {
        min_level: 3,
        seed_resources: 100,
    };

    fn member(id: &str, level: u32) -> Character {
        let mut c = Character::new(id, Affinity::Wood, 0);
        c.level = level;
        c
    }

    fn founded() -> (Character, Faction) {
        let mut leader = member("leader", 3);
        let faction = found_faction(&mut leader, "Azure", None, "f1".into(), RULES, 5).unwrap();
        (leader, faction)
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Azure Cloud ").unwrap(), "Azure Cloud");
        assert_eq!(validate_name("青云门").unwrap(), "青云门");
        assert!(matches!(
            validate_name("   "),
            Err(EngineError::InvalidName(NameRejection::Empty))
        ));
        assert!(validate_name(&"x".repeat(50)).is_ok());
        assert!(validate_name(&"青".repeat(50)).is_ok());
        assert!(matches!(
            validate_name(&"x".repeat(51)),
            Err(EngineError::InvalidName(NameRejection::TooLong { max_chars: 50 }))
        ));
    }

    #[test]
    fn test_found_faction_sets_leader_and_reference() {
        let (leader, faction) = founded();
        assert_eq!(faction.leader_id, "leader");
        assert_eq!(faction.resources, 100);
        assert!(faction.elders.is_empty());
        assert_eq!(faction.created_at, 5);
        assert_eq!(leader.faction_id.as_deref(), Some("f1"));
    }

    #[test]
    fn test_found_faction_preconditions_in_order() {
        let mut low = member("low", 2);
        low.faction_id = Some("other".into());
        let err = found_faction(&mut low, "Azure", None, "f1".into(), RULES, 0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientLevel {
                required: 3,
                current: 2
            }
        ));

        let mut affiliated = member("a", 5);
        affiliated.faction_id = Some("other".into());
        let err = found_faction(&mut affiliated, "Azure", None, "f1".into(), RULES, 0).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyInFaction { .. }));

        let (_, existing) = founded();
        let mut free = member("b", 5);
        let err =
            found_faction(&mut free, "Azure", Some(&existing), "f2".into(), RULES, 0).unwrap_err();
        assert!(matches!(err, EngineError::NameConflict { .. }));
        assert!(free.faction_id.is_none());
    }

    #[test]
    fn test_join_requires_no_faction() {
        let (_, faction) = founded();
        let mut newcomer = member("n", 1);
        join_faction(&mut newcomer, &faction).unwrap();
        assert!(newcomer.in_faction("f1"));
        assert!(matches!(
            join_faction(&mut newcomer, &faction),
            Err(EngineError::AlreadyInFaction { .. })
        ));
    }

    #[test]
    fn test_leader_cannot_leave() {
        let (mut leader, mut faction) = founded();
        let err = leave_faction(&mut leader, &mut faction).unwrap_err();
        assert!(matches!(err, EngineError::LeaderCannotLeave));
        assert!(leader.in_faction("f1"));
    }

    #[test]
    fn test_leaving_elder_is_removed_from_elder_set() {
        let (leader, mut faction) = founded();
        let mut elder = member("e", 1);
        join_faction(&mut elder, &faction).unwrap();
        assert!(appoint_elder(&leader, &mut faction, &elder).unwrap());

        let report = leave_faction(&mut elder, &mut faction).unwrap();
        assert!(report.was_elder);
        assert!(faction.elders.is_empty());
        assert!(elder.faction_id.is_none());
    }

    #[test]
    fn test_appoint_elder_is_idempotent() {
        let (leader, mut faction) = founded();
        let mut target = member("t", 1);
        join_faction(&mut target, &faction).unwrap();
        assert!(appoint_elder(&leader, &mut faction, &target).unwrap());
        assert!(!appoint_elder(&leader, &mut faction, &target).unwrap());
        assert_eq!(faction.elders.len(), 1);
    }

    #[test]
    fn test_appoint_elder_rejects_non_leader_and_outsider() {
        let (leader, mut faction) = founded();
        let mut member_a = member("a", 1);
        join_faction(&mut member_a, &faction).unwrap();
        let outsider = member("o", 1);

        assert!(matches!(
            appoint_elder(&member_a, &mut faction, &leader),
            Err(EngineError::NotLeader)
        ));
        assert!(matches!(
            appoint_elder(&leader, &mut faction, &outsider),
            Err(EngineError::NotAMember { .. })
        ));
    }

    #[test]
    fn test_total_power_sums_members() {
        let members = vec![member("a", 1), member("b", 2)];
        // (0 + 500 + 200) + (0 + 1000 + 200)
        assert_eq!(total_power(&members), 1900);
        assert_eq!(total_power(&[]), 0);
    }
}
