//! Content catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use delve_core::ContentTables;
use delve_core::env::{
    ArmorAttributeDefinition, ArmorDefinition, EnemyDefinition, ItemDefinition, SkillDefinition,
    StatusDefinition, WeaponAttributeDefinition, WeaponDefinition,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files: one list per content kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub weapons: Vec<WeaponDefinition>,
    pub armors: Vec<ArmorDefinition>,
    pub items: Vec<ItemDefinition>,
    pub statuses: Vec<StatusDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub enemies: Vec<EnemyDefinition>,
    pub weapon_attributes: Vec<WeaponAttributeDefinition>,
    pub armor_attributes: Vec<ArmorAttributeDefinition>,
}

impl ContentCatalog {
    /// Indexes every list by id. The first definition of a duplicated id wins.
    pub fn into_tables(self) -> ContentTables {
        let tables = ContentTables {
            weapons: index("weapon", self.weapons, |d| &d.id),
            armors: index("armor", self.armors, |d| &d.id),
            items: index("item", self.items, |d| &d.id),
            statuses: index("status", self.statuses, |d| &d.id),
            skills: index("skill", self.skills, |d| &d.id),
            enemies: index("enemy", self.enemies, |d| &d.id),
            weapon_attributes: index("weapon attribute", self.weapon_attributes, |d| &d.id),
            armor_attributes: index("armor attribute", self.armor_attributes, |d| &d.id),
        };
        warn_dangling(&tables);
        tables
    }
}

/// Loader for content catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a ContentCatalog
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Parse catalog text that is already in memory.
    pub fn parse(text: &str) -> LoadResult<ContentTables> {
        let catalog: ContentCatalog =
            ron::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        Ok(catalog.into_tables())
    }
}

fn index<T>(kind: &str, definitions: Vec<T>, id: impl Fn(&T) -> &String) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    for definition in definitions {
        let key = id(&definition).clone();
        if map.contains_key(&key) {
            tracing::warn!(kind, id = %key, "duplicate definition ignored");
            continue;
        }
        map.insert(key, definition);
    }
    map
}

/// Logs references the core will skip at runtime.
fn warn_dangling(tables: &ContentTables) {
    for weapon in tables.weapons.values() {
        for attribute in &weapon.attributes {
            if !tables.weapon_attributes.contains_key(attribute) {
                tracing::warn!(weapon = %weapon.id, %attribute, "unknown weapon attribute");
            }
        }
    }
    for armor in tables.armors.values() {
        for attribute in &armor.attributes {
            if !tables.armor_attributes.contains_key(attribute) {
                tracing::warn!(armor = %armor.id, %attribute, "unknown armor attribute");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::ContentOracle;
    use delve_core::env::AttributeEffect;

    const SAMPLE: &str = r#"(
        weapons: [
            (id: "fang", name: "Fang", attack: 9, attributes: ["leech"]),
            (id: "fang", name: "Second Fang", attack: 99),
        ],
        weapon_attributes: [
            (id: "leech", name: "Leech", charge_max: 3, effect: Lifesteal(25)),
        ],
        enemies: [
            (id: "bat", name: "Bat", hp: 8, attack: 3, defense: 0),
        ],
        items: [
            (id: "potion", name: "Potion", stackable: true, effect: (hp_delta: Some(30))),
        ],
    )"#;

    #[test]
    fn parses_and_indexes() {
        let tables = CatalogLoader::parse(SAMPLE).unwrap();
        let fang = tables.weapon("fang").unwrap();
        assert_eq!(fang.name, "Fang");
        assert_eq!(
            tables.weapon_attribute("leech").map(|a| a.effect),
            Some(AttributeEffect::Lifesteal(25))
        );
        assert_eq!(tables.enemy("bat").map(|e| e.coins), Some(0));
        assert_eq!(
            tables.item("potion").and_then(|i| i.effect.hp_delta),
            Some(30)
        );
        assert!(tables.armors.is_empty());
    }

    #[test]
    fn rejects_malformed_text() {
        let error = CatalogLoader::parse("(weapons: [(id: 3)])").unwrap_err();
        assert!(error.to_string().contains("Failed to parse catalog RON"));
    }
}
