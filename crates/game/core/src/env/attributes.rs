//! Equipment attribute lookup and aggregation.
//!
//! Pure functions over a [`ContentOracle`]. Unknown attribute ids are skipped
//! silently: a weapon naming an attribute the tables do not know simply has
//! one attribute fewer.

use super::{ArmorAttributeDefinition, ContentOracle, WeaponAttributeDefinition};

/// Resolves weapon attribute ids in declaration order.
///
/// A repeated id resolves once; charges are tracked per id.
pub fn resolve_weapon_attributes<O>(content: &O, ids: &[String]) -> Vec<WeaponAttributeDefinition>
where
    O: ContentOracle + ?Sized,
{
    let mut resolved: Vec<WeaponAttributeDefinition> = Vec::new();
    for attribute in ids.iter().filter_map(|id| content.weapon_attribute(id)) {
        if resolved.iter().all(|seen| seen.id != attribute.id) {
            resolved.push(attribute.clone());
        }
    }
    resolved
}

/// Resolves armor attribute ids in declaration order.
pub fn resolve_armor_attributes<O>(content: &O, ids: &[String]) -> Vec<ArmorAttributeDefinition>
where
    O: ContentOracle + ?Sized,
{
    ids.iter()
        .filter_map(|id| content.armor_attribute(id))
        .cloned()
        .collect()
}

/// Sum of the flat defense bonuses of the given armor attributes.
pub fn armor_defense_bonus<O>(content: &O, ids: &[String]) -> u32
where
    O: ContentOracle + ?Sized,
{
    ids.iter()
        .filter_map(|id| content.armor_attribute(id))
        .fold(0u32, |total, attribute| total.saturating_add(attribute.defense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AttributeEffect, ContentTables};

    fn tables() -> ContentTables {
        ContentTables::new()
            .with_weapon_attribute(WeaponAttributeDefinition {
                id: "pierce".into(),
                name: "Pierce".into(),
                charge_max: 3,
                effect: AttributeEffect::IgnoreDefense,
            })
            .with_armor_attribute(ArmorAttributeDefinition {
                id: "sturdy".into(),
                name: "Sturdy".into(),
                defense: 2,
            })
            .with_armor_attribute(ArmorAttributeDefinition {
                id: "plated".into(),
                name: "Plated".into(),
                defense: 5,
            })
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let ids = vec!["pierce".to_string(), "ghost".to_string()];
        let resolved = resolve_weapon_attributes(&tables(), &ids);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "pierce");
    }

    #[test]
    fn repeated_ids_resolve_once() {
        let ids = vec!["pierce".to_string(), "pierce".to_string()];
        assert_eq!(resolve_weapon_attributes(&tables(), &ids).len(), 1);
    }

    #[test]
    fn armor_bonuses_sum() {
        let ids = vec!["sturdy".into(), "plated".into(), "missing".into()];
        assert_eq!(armor_defense_bonus(&tables(), &ids), 7);
        assert_eq!(resolve_armor_attributes(&tables(), &ids).len(), 2);
    }
}
