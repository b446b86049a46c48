//! Static content definitions.
//!
//! These are the records a host loads from its content tables. The core only
//! reads them; actor state keeps owned clones of the definitions it holds so
//! that combat and status ticks never need a table lookup.

use serde::{Deserialize, Serialize};

/// Equippable weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: String,
    pub name: String,
    pub attack: u32,
    /// Weapon attribute ids; each one owns a charge counter while equipped.
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Equippable armor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorDefinition {
    pub id: String,
    pub name: String,
    pub defense: u32,
    /// Absorption pool refilled at the start of every encounter.
    #[serde(default)]
    pub shield: u32,
    /// Armor attribute ids contributing flat defense.
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Inventory item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stackable: bool,
    /// Applied when the item is used from the inventory.
    #[serde(default)]
    pub effect: EventOutcome,
}

/// Buff or debuff classification for status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    #[default]
    Buff,
    Debuff,
}

/// Timed status effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDefinition {
    pub id: String,
    pub name: String,
    /// Duration used when a grant does not request one.
    pub duration: u32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    /// HP change applied on every status tick (negative for damage over time).
    #[serde(default)]
    pub hp_per_turn: i32,
    #[serde(default)]
    pub kind: StatusKind,
}

/// Effect fired when a weapon attribute's charge reaches its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeEffect {
    /// The triggering attack treats the target's defense as zero.
    IgnoreDefense,
    /// Flat damage added to the triggering attack.
    BonusDamage(u32),
    /// Heals this percentage of the damage dealt by the triggering attack.
    Lifesteal(u32),
    /// The triggering attack deals exactly this much damage.
    Special { damage: u32 },
}

/// Charge-based weapon attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponAttributeDefinition {
    pub id: String,
    pub name: String,
    pub charge_max: u32,
    pub effect: AttributeEffect,
}

impl WeaponAttributeDefinition {
    /// Charge threshold, never below one so an attribute always fires eventually.
    pub fn threshold(&self) -> u32 {
        self.charge_max.max(1)
    }
}

/// Flat-defense armor attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorAttributeDefinition {
    pub id: String,
    pub name: String,
    pub defense: u32,
}

/// Learnable skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub cooldown: u32,
    #[serde(default)]
    pub effect: EventOutcome,
}

/// Enemy template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Coins granted when the enemy is defeated in live combat.
    #[serde(default)]
    pub coins: u32,
}

/// Item grant inside an [`EventOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    pub id: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

/// Status grant inside an [`EventOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGrant {
    pub id: String,
    /// Overrides the status definition's default duration.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl StatusGrant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            duration: None,
        }
    }

    pub fn with_duration(id: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            duration: Some(duration),
        }
    }
}

/// Effect payload shared by items, events, skills and NPC rewards.
///
/// `hp_set` wins over `hp_delta` when both are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventOutcome {
    pub message: String,
    pub hp_delta: Option<i32>,
    pub hp_set: Option<u32>,
    pub mp_delta: Option<i32>,
    pub grant_key: bool,
    pub items: Vec<ItemGrant>,
    pub coins: i32,
    pub statuses: Vec<StatusGrant>,
    pub skills: Vec<String>,
}

impl EventOutcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

fn one() -> u32 {
    1
}
