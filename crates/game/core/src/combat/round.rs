//! One exchange of blows, as a pure function.
//!
//! Both the preview simulation and live combat call [`resolve_round`]; the
//! only difference is whether the returned state is kept.

use std::collections::BTreeMap;

use crate::env::{AttributeEffect, EnemyDefinition, WeaponAttributeDefinition};

use super::damage::{MINIMUM_DAMAGE, absorb, apply_damage, calculate_damage};

/// Mutable quantities of an encounter, owned and passed by value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundState {
    pub actor_hp: u32,
    pub enemy_hp: u32,
    /// Remaining armor shield for this encounter.
    pub shield: u32,
    /// Weapon attribute id → charge.
    pub charges: BTreeMap<String, u32>,
}

/// Fixed inputs of an encounter.
#[derive(Clone, Copy, Debug)]
pub struct RoundContext<'a> {
    pub attack: i32,
    pub defense: i32,
    pub attributes: &'a [WeaponAttributeDefinition],
    pub enemy: &'a EnemyDefinition,
    /// Lifesteal never heals above this HP.
    pub heal_cap: u32,
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RoundResult {
    Continue,
    Victory,
    Defeat,
}

impl RoundResult {
    pub fn is_over(self) -> bool {
        !matches!(self, RoundResult::Continue)
    }
}

/// Everything that happened in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundEvents {
    /// Damage dealt by the actor.
    pub dealt: u32,
    /// Attribute ids that triggered this round.
    pub triggered: Vec<String>,
    /// HP regained through lifesteal.
    pub healed: u32,
    /// Enemy damage before the shield; `None` when the enemy died first.
    pub received: Option<u32>,
    /// Portion of `received` soaked by the shield.
    pub absorbed: u32,
    pub result: RoundResult,
}

/// Resolves one round: actor attack, enemy death check, enemy counter-attack.
///
/// Every weapon attribute gains one charge per attack; an attribute whose
/// charge reaches its threshold triggers and drops back to zero. The enemy is
/// checked for defeat before it strikes back, so a round where both sides
/// would fall is a victory.
pub fn resolve_round(
    mut state: RoundState,
    ctx: &RoundContext<'_>,
) -> (RoundState, RoundEvents) {
    let mut triggered: Vec<&WeaponAttributeDefinition> = Vec::new();
    for attribute in ctx.attributes {
        let charge = state.charges.entry(attribute.id.clone()).or_insert(0);
        *charge += 1;
        if *charge >= attribute.threshold() {
            *charge = 0;
            triggered.push(attribute);
        }
    }

    let ignore_defense = triggered
        .iter()
        .any(|a| matches!(a.effect, AttributeEffect::IgnoreDefense));
    let enemy_defense = if ignore_defense {
        0
    } else {
        i32::try_from(ctx.enemy.defense).unwrap_or(i32::MAX)
    };

    let mut dealt = calculate_damage(ctx.attack, enemy_defense);
    let mut lifesteal = 0u32;
    if let Some(special) = triggered
        .iter()
        .filter_map(|a| match a.effect {
            AttributeEffect::Special { damage } => Some(damage),
            _ => None,
        })
        .max()
    {
        dealt = special.max(MINIMUM_DAMAGE);
    }
    for attribute in &triggered {
        match attribute.effect {
            AttributeEffect::BonusDamage(bonus) => dealt = dealt.saturating_add(bonus),
            AttributeEffect::Lifesteal(percent) => lifesteal = lifesteal.saturating_add(percent),
            AttributeEffect::IgnoreDefense | AttributeEffect::Special { .. } => {}
        }
    }

    state.enemy_hp = apply_damage(state.enemy_hp, dealt);

    let mut healed = 0;
    if lifesteal > 0 && state.actor_hp < ctx.heal_cap {
        let heal =
            (u64::from(dealt) * u64::from(lifesteal) / 100).min(u64::from(u32::MAX)) as u32;
        let healed_hp = state.actor_hp.saturating_add(heal).min(ctx.heal_cap);
        healed = healed_hp - state.actor_hp;
        state.actor_hp = healed_hp;
    }

    let triggered: Vec<String> = triggered.into_iter().map(|a| a.id.clone()).collect();

    if state.enemy_hp == 0 {
        return (
            state,
            RoundEvents {
                dealt,
                triggered,
                healed,
                received: None,
                absorbed: 0,
                result: RoundResult::Victory,
            },
        );
    }

    let enemy_attack = i32::try_from(ctx.enemy.attack).unwrap_or(i32::MAX);
    let received = calculate_damage(enemy_attack, ctx.defense);
    let absorption = absorb(state.shield, received);
    state.shield = absorption.shield_left;
    state.actor_hp = apply_damage(state.actor_hp, absorption.hp_damage);

    let result = if state.actor_hp == 0 {
        RoundResult::Defeat
    } else {
        RoundResult::Continue
    };

    (
        state,
        RoundEvents {
            dealt,
            triggered,
            healed,
            received: Some(received),
            absorbed: absorption.absorbed,
            result,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(hp: u32, attack: u32, defense: u32) -> EnemyDefinition {
        EnemyDefinition {
            id: "dummy".into(),
            name: "Dummy".into(),
            hp,
            attack,
            defense,
            coins: 0,
        }
    }

    fn attribute(id: &str, charge_max: u32, effect: AttributeEffect) -> WeaponAttributeDefinition {
        WeaponAttributeDefinition {
            id: id.into(),
            name: id.into(),
            charge_max,
            effect,
        }
    }

    fn start(actor_hp: u32, enemy_hp: u32) -> RoundState {
        RoundState {
            actor_hp,
            enemy_hp,
            ..RoundState::default()
        }
    }

    #[test]
    fn simultaneous_lethal_round_is_victory() {
        let foe = enemy(5, 50, 0);
        let ctx = RoundContext {
            attack: 10,
            defense: 0,
            attributes: &[],
            enemy: &foe,
            heal_cap: 1,
        };
        let (state, events) = resolve_round(start(1, 5), &ctx);
        assert_eq!(events.result, RoundResult::Victory);
        assert_eq!(events.received, None);
        assert_eq!(state.actor_hp, 1);
    }

    #[test]
    fn ignore_defense_fires_on_threshold() {
        let foe = enemy(100, 1, 8);
        let attributes = [attribute("pierce", 2, AttributeEffect::IgnoreDefense)];
        let ctx = RoundContext {
            attack: 10,
            defense: 0,
            attributes: &attributes,
            enemy: &foe,
            heal_cap: 50,
        };

        let (state, first) = resolve_round(start(50, 100), &ctx);
        assert_eq!(first.dealt, 2);
        assert!(first.triggered.is_empty());
        assert_eq!(state.charges.get("pierce"), Some(&1));

        let (state, second) = resolve_round(state, &ctx);
        assert_eq!(second.dealt, 10);
        assert_eq!(second.triggered, vec!["pierce".to_string()]);
        assert_eq!(state.charges.get("pierce"), Some(&0));
    }

    #[test]
    fn special_replaces_and_bonus_adds() {
        let foe = enemy(100, 1, 0);
        let attributes = [
            attribute("smite", 1, AttributeEffect::Special { damage: 30 }),
            attribute("edge", 1, AttributeEffect::BonusDamage(5)),
        ];
        let ctx = RoundContext {
            attack: 10,
            defense: 0,
            attributes: &attributes,
            enemy: &foe,
            heal_cap: 10,
        };
        let (_, events) = resolve_round(start(10, 100), &ctx);
        assert_eq!(events.dealt, 35);
    }

    #[test]
    fn zero_special_still_deals_minimum() {
        let foe = enemy(100, 1, 0);
        let attributes = [attribute("fizzle", 1, AttributeEffect::Special { damage: 0 })];
        let ctx = RoundContext {
            attack: 10,
            defense: 0,
            attributes: &attributes,
            enemy: &foe,
            heal_cap: 10,
        };
        let (state, events) = resolve_round(start(10, 100), &ctx);
        assert_eq!(events.dealt, MINIMUM_DAMAGE);
        assert_eq!(state.enemy_hp, 99);
    }

    #[test]
    fn lifesteal_is_capped() {
        let foe = enemy(100, 1, 0);
        let attributes = [attribute("leech", 1, AttributeEffect::Lifesteal(50))];
        let ctx = RoundContext {
            attack: 20,
            defense: 0,
            attributes: &attributes,
            enemy: &foe,
            heal_cap: 40,
        };
        let (state, events) = resolve_round(start(35, 100), &ctx);
        assert_eq!(events.healed, 5);
        // Healed to the cap of 40, then hit for 1.
        assert_eq!(state.actor_hp, 39);
    }

    #[test]
    fn shield_soaks_counter_attack() {
        let foe = enemy(100, 20, 0);
        let ctx = RoundContext {
            attack: 10,
            defense: 5,
            attributes: &[],
            enemy: &foe,
            heal_cap: 120,
        };
        let state = RoundState {
            shield: 15,
            ..start(120, 100)
        };
        let (state, events) = resolve_round(state, &ctx);
        assert_eq!(events.received, Some(15));
        assert_eq!(events.absorbed, 15);
        assert_eq!(state.shield, 0);
        assert_eq!(state.actor_hp, 120);
    }
}
