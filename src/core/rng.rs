//! Injectable randomness.
//!
//! Every roll in the engine goes through [`RandomSource`], so tests can replay
//! exact sequences and the simulator can run from a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer draw over the closed range `[lo, hi]`.
    fn int_in(&mut self, lo: i64, hi: i64) -> i64;

    /// Uniform draw in `[lo, hi)`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform index into a slice of length `len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        self.int_in(0, len as i64 - 1) as usize
    }
}

/// Adapter over any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
///
/// Integer draws consume one unit draw and map it onto the range, so a
/// scripted `0.0` always picks `lo` and a value just below `1.0` picks `hi`.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: Vec<f64>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        let mut rolls = rolls.into();
        if rolls.is_empty() {
            rolls.push(0.5);
        }
        for roll in rolls.iter_mut() {
            *roll = roll.clamp(0.0, 1.0 - f64::EPSILON);
        }
        Self { rolls, cursor: 0 }
    }

    /// Single value repeated forever.
    pub fn constant(roll: f64) -> Self {
        Self::new(vec![roll])
    }

    /// Number of draws taken so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRolls {
    fn unit(&mut self) -> f64 {
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }

    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            self.unit();
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        let offset = (self.unit() * span).floor() as i64;
        lo + offset.min(hi - lo)
    }
}
