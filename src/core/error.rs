use std::fmt;

use crate::store::StoreError;

/// Coarse grouping of [`EngineError`] for callers that only need the outcome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    AlreadyExists,
    PreconditionFailed,
    NameConflict,
    DataIntegrity,
    StorageUnavailable,
}

/// What a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Character(String),
    Faction(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Character(id) => write!(f, "character {id}"),
            Missing::Faction(name) => write!(f, "faction {name}"),
        }
    }
}

/// Why a faction name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRejection {
    Empty,
    TooLong { max_chars: usize },
}

impl fmt::Display for NameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRejection::Empty => write!(f, "must not be empty"),
            NameRejection::TooLong { max_chars } => {
                write!(f, "must be at most {max_chars} characters")
            }
        }
    }
}

#[derive(Debug)]
pub enum EngineError {
    NotFound(Missing),
    AlreadyExists { actor_id: String },
    AlreadyInFaction { faction_id: String },
    OnCooldown { remaining_secs: i64 },
    InsufficientCultivation { required: i64, current: i64 },
    InsufficientLevel { required: u32, current: u32 },
    MaxLevelReached,
    InvalidTarget,
    InvalidName(NameRejection),
    NotLeader,
    NotAMember { actor_id: String },
    NotInFaction,
    LeaderCannotLeave,
    Unauthorized,
    NameConflict { name: String },
    /// The actor pointed at a faction that no longer resolves. The reference
    /// has already been cleared and committed when this is returned.
    DataIntegrity { actor_id: String, faction_id: String },
    StorageUnavailable(StoreError),
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::AlreadyInFaction { .. } => {
                ErrorCategory::AlreadyExists
            }
            Self::NameConflict { .. } => ErrorCategory::NameConflict,
            Self::DataIntegrity { .. } => ErrorCategory::DataIntegrity,
            Self::StorageUnavailable(_) => ErrorCategory::StorageUnavailable,
            Self::OnCooldown { .. }
            | Self::InsufficientCultivation { .. }
            | Self::InsufficientLevel { .. }
            | Self::MaxLevelReached
            | Self::InvalidTarget
            | Self::InvalidName(_)
            | Self::NotLeader
            | Self::NotAMember { .. }
            | Self::NotInFaction
            | Self::LeaderCannotLeave
            | Self::Unauthorized => ErrorCategory::PreconditionFailed,
        }
    }

    /// Expected, user-facing outcomes. Only storage failures are not.
    pub fn is_recoverable(&self) -> bool {
        self.category() != ErrorCategory::StorageUnavailable
    }

    pub(crate) fn character_not_found(actor_id: &str) -> Self {
        Self::NotFound(Missing::Character(actor_id.to_string()))
    }

    pub(crate) fn faction_not_found(name: &str) -> Self {
        Self::NotFound(Missing::Faction(name.to_string()))
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "{missing} not found"),
            Self::AlreadyExists { actor_id } => {
                write!(f, "character {actor_id} already exists")
            }
            Self::AlreadyInFaction { faction_id } => {
                write!(f, "already a member of faction {faction_id}")
            }
            Self::OnCooldown { remaining_secs } => {
                write!(f, "cultivation on cooldown for {remaining_secs}s")
            }
            Self::InsufficientCultivation { required, current } => write!(
                f,
                "insufficient cultivation: {current} of {required} required"
            ),
            Self::InsufficientLevel { required, current } => {
                write!(f, "insufficient level: {current} of {required} required")
            }
            Self::MaxLevelReached => write!(f, "already at the highest realm"),
            Self::InvalidTarget => write!(f, "invalid target"),
            Self::InvalidName(reason) => write!(f, "faction name {reason}"),
            Self::NotLeader => write!(f, "only the faction leader can do that"),
            Self::NotAMember { actor_id } => {
                write!(f, "{actor_id} is not a member of this faction")
            }
            Self::NotInFaction => write!(f, "not a member of any faction"),
            Self::LeaderCannotLeave => write!(f, "the faction leader cannot leave"),
            Self::Unauthorized => write!(f, "only the leader or an elder can do that"),
            Self::NameConflict { name } => write!(f, "faction name {name} is taken"),
            Self::DataIntegrity {
                actor_id,
                faction_id,
            } => write!(
                f,
                "faction {faction_id} referenced by {actor_id} no longer exists; reference cleared"
            ),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}
