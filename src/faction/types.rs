use serde::{Deserialize, Serialize};

/// A player-formed sect.
///
/// Membership is not stored here: a character belongs to a faction when its
/// `faction_id` points at it. The leader is a member the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: String,
    pub name: String,
    pub leader_id: String,
    #[serde(default)]
    pub elders: Vec<String>,
    pub resources: i64,
    /// Display only; nothing advances it yet.
    #[serde(default = "default_faction_level")]
    pub level: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: i64,
}

fn default_faction_level() -> u32 {
    1
}

impl Faction {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        leader_id: impl Into<String>,
        resources: i64,
        created_at: i64,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            description: format!("{name}, a newly founded sect."),
            name,
            leader_id: leader_id.into(),
            elders: Vec::new(),
            resources,
            level: default_faction_level(),
            created_at,
        }
    }

    pub fn is_leader(&self, actor_id: &str) -> bool {
        self.leader_id == actor_id
    }

    pub fn is_elder(&self, actor_id: &str) -> bool {
        self.elders.iter().any(|e| e == actor_id)
    }

    /// Leader or elder.
    pub fn can_command(&self, actor_id: &str) -> bool {
        self.is_leader(actor_id) || self.is_elder(actor_id)
    }

    /// Returns false if the actor was already an elder.
    pub fn add_elder(&mut self, actor_id: &str) -> bool {
        if self.is_elder(actor_id) {
            return false;
        }
        self.elders.push(actor_id.to_string());
        true
    }

    /// Returns true if the actor was an elder.
    pub fn remove_elder(&mut self, actor_id: &str) -> bool {
        let before = self.elders.len();
        self.elders.retain(|e| e != actor_id);
        self.elders.len() != before
    }

    /// Adds to the pool, never letting it drop below zero.
    pub fn adjust_resources(&mut self, delta: i64) {
        self.resources = self.resources.saturating_add(delta).max(0);
    }
}
