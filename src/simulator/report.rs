//! Soak run report.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::store::Snapshot;

/// Aggregated results of a soak run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SoakReport {
    pub seed: u64,
    pub actions: u64,
    pub successes: u64,
    pub failures: u64,

    // Per-action success counts and per-category failure counts
    pub succeeded_by_action: BTreeMap<String, u64>,
    pub failed_by_category: BTreeMap<String, u64>,

    // Final world
    pub characters: usize,
    pub factions: usize,
    pub combat_records: usize,
    pub log_entries: usize,
    pub max_level: u32,
    pub total_artifacts: usize,

    /// Broken invariants found in the final world. Empty on a healthy run.
    pub violations: Vec<String>,
}

impl SoakReport {
    pub fn record_world(&mut self, world: &Snapshot) {
        self.characters = world.characters.len();
        self.factions = world.factions.len();
        self.combat_records = world.combat_records.len();
        self.log_entries = world.action_log.len();
        self.max_level = world.characters.values().map(|c| c.level).max().unwrap_or(0);
        self.total_artifacts = world.characters.values().map(|c| c.artifacts.len()).sum();
    }

    pub fn is_healthy(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("═══ SOAK SUMMARY ═══\n");
        out.push_str(&format!("Seed:            {}\n", self.seed));
        out.push_str(&format!(
            "Actions:         {} ({} ok, {} rejected)\n",
            self.actions, self.successes, self.failures
        ));
        out.push_str("\nSucceeded by action:\n");
        for (action, count) in &self.succeeded_by_action {
            out.push_str(&format!("  {action:<18} {count}\n"));
        }
        out.push_str("\nRejected by category:\n");
        for (category, count) in &self.failed_by_category {
            out.push_str(&format!("  {category:<18} {count}\n"));
        }
        out.push_str("\nWorld:\n");
        out.push_str(&format!("  Characters:     {}\n", self.characters));
        out.push_str(&format!("  Factions:       {}\n", self.factions));
        out.push_str(&format!("  Combat records: {}\n", self.combat_records));
        out.push_str(&format!("  Log entries:    {}\n", self.log_entries));
        out.push_str(&format!("  Highest level:  {}\n", self.max_level));
        out.push_str(&format!("  Artifacts:      {}\n", self.total_artifacts));
        out.push('\n');
        if self.violations.is_empty() {
            out.push_str("Invariants: OK\n");
        } else {
            out.push_str(&format!("Invariants: {} VIOLATED\n", self.violations.len()));
            for violation in &self.violations {
                out.push_str(&format!("  - {violation}\n"));
            }
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
