//! Battle preview: runs a whole encounter on a copy of the actor's numbers.

use std::collections::BTreeMap;

use crate::env::{
    ContentOracle, EnemyDefinition, WeaponAttributeDefinition, resolve_weapon_attributes,
};
use crate::state::ActorState;

use super::round::{RoundContext, RoundResult, RoundState, resolve_round};

/// The actor's combat-relevant numbers, detached from [`ActorState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatProfile {
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    /// Shield pool at the start of an encounter.
    pub shield: u32,
    pub attributes: Vec<WeaponAttributeDefinition>,
    pub charges: BTreeMap<String, u32>,
}

impl CombatProfile {
    pub fn new(hp: u32, attack: i32, defense: i32) -> Self {
        Self {
            hp,
            attack,
            defense,
            ..Self::default()
        }
    }

    pub fn with_shield(mut self, shield: u32) -> Self {
        self.shield = shield;
        self
    }

    pub fn with_attribute(mut self, attribute: WeaponAttributeDefinition) -> Self {
        self.charges.entry(attribute.id.clone()).or_insert(0);
        self.attributes.push(attribute);
        self
    }

    pub(crate) fn round_state(&self, enemy_hp: u32) -> RoundState {
        RoundState {
            actor_hp: self.hp,
            enemy_hp,
            shield: self.shield,
            charges: self.charges.clone(),
        }
    }

    pub(crate) fn context<'a>(
        &'a self,
        enemy: &'a EnemyDefinition,
        heal_cap: u32,
    ) -> RoundContext<'a> {
        RoundContext {
            attack: self.attack,
            defense: self.defense,
            attributes: &self.attributes,
            enemy,
            heal_cap,
        }
    }
}

impl ActorState {
    /// Current effective stats, full armor shield and weapon charges.
    pub fn combat_profile<O>(&self, content: &O) -> CombatProfile
    where
        O: ContentOracle + ?Sized,
    {
        let attributes = self
            .weapon()
            .map(|weapon| resolve_weapon_attributes(content, &weapon.attributes))
            .unwrap_or_default();
        CombatProfile {
            hp: self.hp(),
            attack: self.effective_attack(),
            defense: self.effective_defense(content),
            shield: self.armor().map_or(0, |armor| armor.shield),
            attributes,
            charges: self.charges().clone(),
        }
    }
}

/// Predicted result of fighting an enemy to the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleForecast {
    pub victory: bool,
    /// Starting HP minus final HP.
    pub hp_lost: u32,
    pub rounds: u32,
    /// Attribute id → number of times it would trigger.
    pub triggers: BTreeMap<String, u32>,
    pub final_charges: BTreeMap<String, u32>,
}

/// Simulates a full encounter against a fresh `enemy`.
///
/// Pure: the profile is only read. Always terminates because every round
/// deals at least [`MINIMUM_DAMAGE`](super::damage::MINIMUM_DAMAGE) to the
/// enemy.
pub fn forecast(profile: &CombatProfile, enemy: &EnemyDefinition) -> BattleForecast {
    simulate(profile.round_state(enemy.hp), &profile.context(enemy, profile.hp))
}

pub(crate) fn simulate(mut state: RoundState, ctx: &RoundContext<'_>) -> BattleForecast {
    let start_hp = state.actor_hp;
    let mut rounds = 0;
    let mut triggers: BTreeMap<String, u32> = BTreeMap::new();

    let victory = loop {
        let (next, events) = resolve_round(state, ctx);
        state = next;
        rounds += 1;
        for id in events.triggered {
            *triggers.entry(id).or_insert(0) += 1;
        }
        match events.result {
            RoundResult::Continue => {}
            RoundResult::Victory => break true,
            RoundResult::Defeat => break false,
        }
    };

    BattleForecast {
        victory,
        hp_lost: start_hp.saturating_sub(state.actor_hp),
        rounds,
        triggers,
        final_charges: state.charges,
    }
}
