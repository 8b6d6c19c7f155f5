//! Static exploration event catalog.

use super::types::CultivationEffect::{Flat, ShareOfCurrent};
use super::types::Eligibility::{Always, MinLevel};
use super::types::{EffectSpec, EventKind, EventTemplate};

/// Every event an explorer can stumble into, grouped by realm gate.
pub const ALL_EVENTS: &[EventTemplate] = &[
    // ═══════════════════════════════════════════════════════════════
    // BASE EVENTS (any realm)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Spirit Herb Garden",
        description: "Deep in the mountains you find a garden of spirit herbs, thick with qi and fragrance.",
        kind: EventKind::Boon,
        eligibility: Always,
        effect: EffectSpec {
            cultivation: Flat(100),
            karma: 20,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Stream Baptism",
        description: "A qi-rich mountain stream makes every hour of cultivation count twice.",
        kind: EventKind::Boon,
        eligibility: Always,
        effect: EffectSpec {
            cultivation: Flat(80),
            karma: 10,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Wandering Cultivator",
        description: "You spar with a wandering cultivator and both walk away wiser.",
        kind: EventKind::Boon,
        eligibility: Always,
        effect: EffectSpec {
            cultivation: Flat(50),
            karma: 5,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // FOUNDATION ESTABLISHMENT (level 2+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Ancient Cultivator's Cave",
        description: "An old cave abode still holds the cultivation notes of its former master.",
        kind: EventKind::Boon,
        eligibility: MinLevel(2),
        effect: EffectSpec {
            cultivation: Flat(200),
            karma: 50,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Spirit Stone Vein",
        description: "You uncover a vein of spirit stones and mine it clean.",
        kind: EventKind::Boon,
        eligibility: MinLevel(2),
        effect: EffectSpec {
            cultivation: Flat(180),
            karma: 30,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Misty Forest",
        description: "You lose your way in a fog-bound forest and exhaust yourself getting out.",
        kind: EventKind::Hazard,
        eligibility: MinLevel(2),
        effect: EffectSpec {
            cultivation: Flat(-50),
            karma: -10,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // GOLDEN CORE (level 3+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Outer Demon",
        description: "A demon from beyond the realm ambushes you; you barely escape.",
        kind: EventKind::Battle,
        eligibility: MinLevel(3),
        effect: EffectSpec {
            cultivation: ShareOfCurrent(-0.3),
            karma: -50,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Heavenly Treasure",
        description: "You find a ten-thousand-year lingzhi and your cultivation surges.",
        kind: EventKind::Boon,
        eligibility: MinLevel(3),
        effect: EffectSpec {
            cultivation: Flat(500),
            karma: 100,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Pill Refining",
        description: "You gather rare ingredients and refine a furnace of superior pills.",
        kind: EventKind::Boon,
        eligibility: MinLevel(3),
        effect: EffectSpec {
            cultivation: Flat(300),
            karma: 80,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // NASCENT SOUL (level 4+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Ancient Ruins",
        description: "The ruins of a vanished sect yield a trove of its teachings.",
        kind: EventKind::Boon,
        eligibility: MinLevel(4),
        effect: EffectSpec {
            cultivation: Flat(800),
            karma: 200,
            artifact: Some("Ancient Inheritance Jade Slip"),
        },
    },
    EventTemplate {
        name: "Spirit Vein Dispute",
        description: "Rivals covet the spirit vein you found; you hold it, at a price.",
        kind: EventKind::Battle,
        eligibility: MinLevel(4),
        effect: EffectSpec {
            cultivation: Flat(600),
            karma: -100,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Hidden Grotto Heaven",
        description: "Time runs differently inside a hidden grotto; you cultivate there for years.",
        kind: EventKind::Boon,
        eligibility: MinLevel(4),
        effect: EffectSpec {
            cultivation: Flat(1000),
            karma: 150,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // DEITY TRANSFORMATION (level 5+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Ancient Battlefield",
        description: "Residual energy of an immortal war still hums across the old battlefield.",
        kind: EventKind::Relic,
        eligibility: MinLevel(5),
        effect: EffectSpec {
            cultivation: Flat(1500),
            karma: 300,
            artifact: Some("Shattered Immortal Artifact"),
        },
    },
    EventTemplate {
        name: "Tribulation Aftershock",
        description: "You are caught in the backlash of someone else's tribulation.",
        kind: EventKind::Hazard,
        eligibility: MinLevel(5),
        effect: EffectSpec {
            cultivation: ShareOfCurrent(-0.4),
            karma: -200,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Secret Realm Gate",
        description: "A gate to a secret realm opens and you return laden with resources.",
        kind: EventKind::Boon,
        eligibility: MinLevel(5),
        effect: EffectSpec {
            cultivation: Flat(2000),
            karma: 500,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // VOID REFINING (level 6+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Ascension Site",
        description: "An ascended master's last abode holds clues to the path beyond.",
        kind: EventKind::Relic,
        eligibility: MinLevel(6),
        effect: EffectSpec {
            cultivation: Flat(3000),
            karma: 1000,
            artifact: Some("Ascension Jade Slip"),
        },
    },
    EventTemplate {
        name: "Visitor from Beyond",
        description: "A being from beyond the heavens nearly ends your path.",
        kind: EventKind::Peril,
        eligibility: MinLevel(6),
        effect: EffectSpec {
            cultivation: ShareOfCurrent(-0.5),
            karma: -500,
            artifact: None,
        },
    },
    EventTemplate {
        name: "Enlightenment Tea Tree",
        description: "Tea from the legendary tree brings sudden insight into your own dao.",
        kind: EventKind::Epiphany,
        eligibility: MinLevel(6),
        effect: EffectSpec {
            cultivation: ShareOfCurrent(0.5),
            karma: 800,
            artifact: None,
        },
    },
    // ═══════════════════════════════════════════════════════════════
    // BODY INTEGRATION (level 7+)
    // ═══════════════════════════════════════════════════════════════
    EventTemplate {
        name: "Immortal's Abode",
        description: "You enter the abode an immortal left behind and inherit their legacy.",
        kind: EventKind::Fortune,
        eligibility: MinLevel(7),
        effect: EffectSpec {
            cultivation: Flat(5000),
            karma: 2000,
            artifact: Some("Immortal Inheritance"),
        },
    },
    EventTemplate {
        name: "Heavenly Punishment",
        description: "Somehow you have angered the heavens; the punishment nearly scatters your soul.",
        kind: EventKind::Peril,
        eligibility: MinLevel(7),
        effect: EffectSpec {
            cultivation: ShareOfCurrent(-0.7),
            karma: -1000,
            artifact: None,
        },
    },
];
