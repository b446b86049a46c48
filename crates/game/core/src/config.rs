use serde::{Deserialize, Serialize};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of every generated floor (including the border walls).
    pub floor_width: u32,
    /// Height of every generated floor (including the border walls).
    pub floor_height: u32,
    pub generator: GeneratorConfig,
    pub starting_kit: StartingKit,
    pub loot: LootConfig,
    /// Enemy template used for placements that carry no template of their own.
    pub default_enemy: String,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 16;
    pub const MAX_INVENTORY_SLOTS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLOOR_WIDTH: u32 = 21;
    pub const DEFAULT_FLOOR_HEIGHT: u32 = 15;

    pub fn new() -> Self {
        Self {
            floor_width: Self::DEFAULT_FLOOR_WIDTH,
            floor_height: Self::DEFAULT_FLOOR_HEIGHT,
            generator: GeneratorConfig::default(),
            starting_kit: StartingKit::default(),
            loot: LootConfig::default(),
            default_enemy: "slime".to_string(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Placement counts for the level generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Interior wall cells scattered before placement.
    pub obstacles: u32,
    pub enemies: u32,
    pub weapons: u32,
    pub armors: u32,
    pub items: u32,
    pub events: u32,
    pub npcs: u32,
    pub shops: u32,
    /// Enemy template ids drawn for each enemy placement.
    pub enemy_roster: Vec<String>,
    /// Random draws allowed per rejection placement before falling back to a scan.
    pub placement_attempts: u32,
}

impl GeneratorConfig {
    /// Number of special tiles placed, excluding the player start.
    pub fn special_count(&self, include_downstairs: bool) -> u32 {
        [
            self.enemies,
            self.weapons,
            self.armors,
            self.items,
            self.events,
            self.npcs,
            self.shops,
        ]
        .into_iter()
        .fold(3 + u32::from(include_downstairs), u32::saturating_add)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            obstacles: 30,
            enemies: 5,
            weapons: 1,
            armors: 1,
            items: 2,
            events: 1,
            npcs: 1,
            shops: 1,
            enemy_roster: Vec::new(),
            placement_attempts: 1000,
        }
    }
}

/// Stats and gear a new run starts with.
///
/// The weapon and armor ids double as the default-gear policy applied when a
/// restored snapshot has no usable equipment (see [`crate::state::StartingGear`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingKit {
    pub hp: u32,
    pub mp: u32,
    pub coins: u32,
    pub weapon: String,
    pub armor: String,
    pub skills: Vec<String>,
}

impl Default for StartingKit {
    fn default() -> Self {
        Self {
            hp: 120,
            mp: 30,
            coins: 0,
            weapon: "wooden_sword".to_string(),
            armor: "cloth_tunic".to_string(),
            skills: Vec::new(),
        }
    }
}

/// Content ids handed out by loot tiles, one drawn per pickup from the
/// floor's PRNG.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub weapons: Vec<String>,
    pub armors: Vec<String>,
    pub items: Vec<String>,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            weapons: vec!["iron_sword".to_string()],
            armors: vec!["leather_armor".to_string()],
            items: vec!["potion".to_string()],
        }
    }
}
