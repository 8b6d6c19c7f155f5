//! Concurrent soak simulation.
//!
//! Drives a shared engine from several threads with seeded random actions and
//! verifies that the final world still satisfies every entity invariant.

mod config;
mod report;
mod runner;

pub use config::SoakConfig;
pub use report::SoakReport;
pub use runner::{check_invariants, run_soak};
