//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};

use delve_core::env::{
    ArmorDefinition, AttributeEffect, EnemyDefinition, EventOutcome, ItemDefinition,
    SkillDefinition, StatusDefinition, StatusKind, WeaponAttributeDefinition, WeaponDefinition,
};
use delve_core::{CardinalDirection, ContentTables, Grid, Position, Tile};

/// Installs a test-writer subscriber once; `RUST_LOG` controls the filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn enemy(id: &str, hp: u32, attack: u32, defense: u32, coins: u32) -> EnemyDefinition {
    EnemyDefinition {
        id: id.into(),
        name: id.into(),
        hp,
        attack,
        defense,
        coins,
    }
}

/// Small catalog covering every content kind.
pub fn content() -> ContentTables {
    ContentTables::new()
        .with_weapon(WeaponDefinition {
            id: "wooden_sword".into(),
            name: "Wooden Sword".into(),
            attack: 10,
            attributes: vec!["pierce".into()],
        })
        .with_weapon(WeaponDefinition {
            id: "flame_blade".into(),
            name: "Flame Blade".into(),
            attack: 16,
            attributes: vec!["ember".into(), "drain".into()],
        })
        .with_armor(ArmorDefinition {
            id: "cloth_tunic".into(),
            name: "Cloth Tunic".into(),
            defense: 2,
            shield: 0,
            attributes: Vec::new(),
        })
        .with_armor(ArmorDefinition {
            id: "knight_mail".into(),
            name: "Knight Mail".into(),
            defense: 5,
            shield: 15,
            attributes: vec!["sturdy".into()],
        })
        .with_weapon_attribute(WeaponAttributeDefinition {
            id: "pierce".into(),
            name: "Pierce".into(),
            charge_max: 3,
            effect: AttributeEffect::IgnoreDefense,
        })
        .with_weapon_attribute(WeaponAttributeDefinition {
            id: "ember".into(),
            name: "Ember".into(),
            charge_max: 2,
            effect: AttributeEffect::BonusDamage(4),
        })
        .with_weapon_attribute(WeaponAttributeDefinition {
            id: "drain".into(),
            name: "Drain".into(),
            charge_max: 4,
            effect: AttributeEffect::Lifesteal(50),
        })
        .with_armor_attribute(delve_core::env::ArmorAttributeDefinition {
            id: "sturdy".into(),
            name: "Sturdy".into(),
            defense: 1,
        })
        .with_item(ItemDefinition {
            id: "potion".into(),
            name: "Potion".into(),
            stackable: true,
            effect: EventOutcome {
                hp_delta: Some(30),
                ..EventOutcome::default()
            },
        })
        .with_item(ItemDefinition {
            id: "iron_sword".into(),
            name: "Iron Sword".into(),
            stackable: false,
            effect: EventOutcome::default(),
        })
        .with_status(StatusDefinition {
            id: "poison".into(),
            name: "Poison".into(),
            duration: 4,
            attack: 0,
            defense: 0,
            hp_per_turn: -3,
            kind: StatusKind::Debuff,
        })
        .with_status(StatusDefinition {
            id: "guard".into(),
            name: "Guard".into(),
            duration: 5,
            attack: 0,
            defense: 4,
            hp_per_turn: 0,
            kind: StatusKind::Buff,
        })
        .with_skill(SkillDefinition {
            id: "mend".into(),
            name: "Mend".into(),
            cooldown: 4,
            effect: EventOutcome {
                hp_delta: Some(25),
                ..EventOutcome::default()
            },
        })
        .with_enemy(enemy("slime", 20, 6, 1, 2))
        .with_enemy(enemy("ogre", 200, 60, 5, 20))
}

/// Directions leading from the player to a cell next to `target`, walking
/// only over bare floor, followed by the step onto `target` itself.
pub fn path_to(grid: &Grid, target: Position) -> Option<Vec<CardinalDirection>> {
    let origin = grid.player()?;
    let mut came_from: BTreeMap<Position, (Position, CardinalDirection)> = BTreeMap::new();
    let mut queue = VecDeque::from([origin]);

    while let Some(current) = queue.pop_front() {
        for direction in CardinalDirection::ALL {
            let next = current.step(direction);
            if next == origin || came_from.contains_key(&next) {
                continue;
            }
            if next == target {
                came_from.insert(next, (current, direction));
                return Some(unwind(&came_from, origin, target));
            }
            if grid.tile(next) == Some(Tile::Floor) {
                came_from.insert(next, (current, direction));
                queue.push_back(next);
            }
        }
    }
    None
}

fn unwind(
    came_from: &BTreeMap<Position, (Position, CardinalDirection)>,
    origin: Position,
    target: Position,
) -> Vec<CardinalDirection> {
    let mut steps = Vec::new();
    let mut cursor = target;
    while cursor != origin {
        let (previous, direction) = came_from[&cursor];
        steps.push(direction);
        cursor = previous;
    }
    steps.reverse();
    steps
}
