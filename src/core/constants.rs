// Realm ladder
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 8;
pub const CULTIVATION_PER_LEVEL: i64 = 1000;

// Combat power:
//   cultivation + level * POWER_PER_LEVEL + affinity bonus + artifacts * POWER_PER_ARTIFACT
pub const POWER_PER_LEVEL: i64 = 500;
pub const POWER_PER_ARTIFACT: i64 = 200;

// Cultivation
pub const CULTIVATION_COOLDOWN_SECONDS: i64 = 3600;
pub const CULTIVATION_NOISE_MIN: f64 = 0.8;
pub const CULTIVATION_NOISE_MAX: f64 = 1.2;

// Tribulation: chance = BASE - level * STEP
pub const TRIBULATION_BASE_CHANCE: f64 = 0.8;
pub const TRIBULATION_CHANCE_STEP: f64 = 0.05;
pub const TRIBULATION_SUCCESS_KARMA: i64 = 50;
pub const TRIBULATION_FAILURE_KARMA: i64 = -30;
pub const TRIBULATION_FAILURE_LOSS_RATIO: f64 = 0.5;

// Win rate model (duels and faction wars)
pub const WIN_RATE_BASE: f64 = 0.5;
pub const WIN_RATE_SWING: f64 = 0.3;
pub const WIN_RATE_MIN: f64 = 0.2;
pub const WIN_RATE_MAX: f64 = 0.8;

// Duel rewards
pub const DUEL_REWARD_PER_LEVEL: i64 = 100;
pub const DUEL_KARMA_SWING: i64 = 20;

// Factions
pub const FACTION_MIN_LEVEL: u32 = 3;
pub const FACTION_SEED_RESOURCES: i64 = 100;
pub const FACTION_NAME_MAX_CHARS: usize = 50;
pub const FACTION_WAR_TRANSFER_MIN: i64 = 50;
pub const FACTION_WAR_TRANSFER_MAX: i64 = 100;

/// Defender id written on faction war records, which have no single defender.
pub const FACTION_WAR_DEFENDER: &str = "system";

// Status
pub const STATUS_HISTORY_LEN: usize = 3;
