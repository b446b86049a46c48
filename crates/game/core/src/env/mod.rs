//! Traits describing read-only content and the randomness source.
//!
//! Content (weapons, armor, items, statuses, skills, enemies and attribute
//! tables) is injected through [`ContentOracle`] rather than read from
//! process-wide tables, so tests can run against small fake catalogs.
//! [`ContentTables`] is the in-memory implementation hosts normally use; the
//! `delve-content` crate fills it from RON files.
mod attributes;
mod definitions;
mod rng;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use attributes::{
    armor_defense_bonus, resolve_armor_attributes, resolve_weapon_attributes,
};
pub use definitions::{
    ArmorAttributeDefinition, ArmorDefinition, AttributeEffect, EnemyDefinition, EventOutcome,
    ItemDefinition, ItemGrant, SkillDefinition, StatusDefinition, StatusGrant, StatusKind,
    WeaponAttributeDefinition, WeaponDefinition,
};
pub use rng::{RngSource, SeededRng, derive_seed};

/// Read-only lookup of content definitions by id.
///
/// Every lookup returns `None` for an unknown id; callers decide whether that
/// is skipped silently or reported as a warning line.
pub trait ContentOracle: Send + Sync {
    fn weapon(&self, id: &str) -> Option<&WeaponDefinition>;
    fn armor(&self, id: &str) -> Option<&ArmorDefinition>;
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
    fn status(&self, id: &str) -> Option<&StatusDefinition>;
    fn skill(&self, id: &str) -> Option<&SkillDefinition>;
    fn enemy(&self, id: &str) -> Option<&EnemyDefinition>;
    fn weapon_attribute(&self, id: &str) -> Option<&WeaponAttributeDefinition>;
    fn armor_attribute(&self, id: &str) -> Option<&ArmorAttributeDefinition>;
}

/// In-memory content catalog keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    pub weapons: BTreeMap<String, WeaponDefinition>,
    pub armors: BTreeMap<String, ArmorDefinition>,
    pub items: BTreeMap<String, ItemDefinition>,
    pub statuses: BTreeMap<String, StatusDefinition>,
    pub skills: BTreeMap<String, SkillDefinition>,
    pub enemies: BTreeMap<String, EnemyDefinition>,
    pub weapon_attributes: BTreeMap<String, WeaponAttributeDefinition>,
    pub armor_attributes: BTreeMap<String, ArmorAttributeDefinition>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weapon(mut self, weapon: WeaponDefinition) -> Self {
        self.weapons.insert(weapon.id.clone(), weapon);
        self
    }

    pub fn with_armor(mut self, armor: ArmorDefinition) -> Self {
        self.armors.insert(armor.id.clone(), armor);
        self
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn with_status(mut self, status: StatusDefinition) -> Self {
        self.statuses.insert(status.id.clone(), status);
        self
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.insert(skill.id.clone(), skill);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyDefinition) -> Self {
        self.enemies.insert(enemy.id.clone(), enemy);
        self
    }

    pub fn with_weapon_attribute(mut self, attribute: WeaponAttributeDefinition) -> Self {
        self.weapon_attributes.insert(attribute.id.clone(), attribute);
        self
    }

    pub fn with_armor_attribute(mut self, attribute: ArmorAttributeDefinition) -> Self {
        self.armor_attributes.insert(attribute.id.clone(), attribute);
        self
    }
}

impl ContentOracle for ContentTables {
    fn weapon(&self, id: &str) -> Option<&WeaponDefinition> {
        self.weapons.get(id)
    }

    fn armor(&self, id: &str) -> Option<&ArmorDefinition> {
        self.armors.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn status(&self, id: &str) -> Option<&StatusDefinition> {
        self.statuses.get(id)
    }

    fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    fn enemy(&self, id: &str) -> Option<&EnemyDefinition> {
        self.enemies.get(id)
    }

    fn weapon_attribute(&self, id: &str) -> Option<&WeaponAttributeDefinition> {
        self.weapon_attributes.get(id)
    }

    fn armor_attribute(&self, id: &str) -> Option<&ArmorAttributeDefinition> {
        self.armor_attributes.get(id)
    }
}
