//! Soak run configuration.

/// Configuration for a concurrent soak run.
#[derive(Debug, Clone)]
pub struct SoakConfig {
    /// Worker threads firing actions at the shared engine
    pub workers: usize,

    /// Actions each worker dispatches before stopping
    pub actions_per_worker: u32,

    /// Number of distinct characters in the world
    pub actors: usize,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Seconds the shared clock advances after every action
    pub clock_step_secs: i64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per worker)
    pub verbosity: u8,
}

impl Default for SoakConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            actions_per_worker: 500,
            actors: 12,
            seed: None,
            clock_step_secs: 600,
            verbosity: 1,
        }
    }
}

impl SoakConfig {
    /// Small run for smoke testing
    pub fn quick() -> Self {
        Self {
            workers: 2,
            actions_per_worker: 100,
            actors: 6,
            ..Default::default()
        }
    }

    /// Many workers on few characters, to maximize lock contention
    pub fn contention() -> Self {
        Self {
            workers: 8,
            actions_per_worker: 400,
            actors: 4,
            ..Default::default()
        }
    }
}
