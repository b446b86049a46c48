//! Player actor state.

use std::collections::BTreeMap;

use crate::config::{GameConfig, StartingKit};
use crate::env::{
    ArmorDefinition, ContentOracle, ItemDefinition, SkillDefinition, StatusGrant,
    WeaponDefinition, armor_defense_bonus,
};

use super::{GrantResult, InventoryState, SkillBook, StatusEffects, StatusTick};

/// Everything the run tracks about the player.
///
/// # Invariants
///
/// - `charges` holds exactly the attribute ids the equipped weapon declares,
///   each within `[0, charge_max]`
/// - stashes contain each id at most once
/// - inventory quantities and status durations are at least one
/// - every known skill has a cooldown entry
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActorState {
    pub(crate) hp: u32,
    pub(crate) mp: u32,
    pub(crate) weapon: Option<WeaponDefinition>,
    pub(crate) armor: Option<ArmorDefinition>,
    pub(crate) charges: BTreeMap<String, u32>,
    pub(crate) weapon_stash: Vec<WeaponDefinition>,
    pub(crate) armor_stash: Vec<ArmorDefinition>,
    pub(crate) coins: u32,
    pub(crate) has_key: bool,
    pub(crate) inventory: InventoryState,
    pub(crate) statuses: StatusEffects,
    pub(crate) skills: SkillBook,
}

/// Log lines from a status tick plus whether status damage defeated the actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub lines: Vec<String>,
    pub defeated: bool,
}

impl ActorState {
    /// Bare-handed, unarmored actor with the given pools.
    pub fn new(hp: u32, mp: u32) -> Self {
        Self {
            hp,
            mp,
            ..Self::default()
        }
    }

    /// Fresh run from the configured starting kit.
    pub fn new_run<O>(config: &GameConfig, content: &O) -> Self
    where
        O: ContentOracle + ?Sized,
    {
        let kit = &config.starting_kit;
        let mut state = Self::new(kit.hp, kit.mp);
        state.coins = kit.coins;
        StartingGear::fill_missing(&mut state, kit, content);
        state.apply_skill_grants(&kit.skills, content);
        state
    }

    /// Discards the run (defeat or new game) and starts over from the kit.
    pub fn reset<O>(&mut self, config: &GameConfig, content: &O)
    where
        O: ContentOracle + ?Sized,
    {
        *self = Self::new_run(config, content);
        tracing::info!(hp = self.hp, "actor state reset");
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn has_key(&self) -> bool {
        self.has_key
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn weapon(&self) -> Option<&WeaponDefinition> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&ArmorDefinition> {
        self.armor.as_ref()
    }

    pub fn charges(&self) -> &BTreeMap<String, u32> {
        &self.charges
    }

    pub fn weapon_stash(&self) -> &[WeaponDefinition] {
        &self.weapon_stash
    }

    pub fn armor_stash(&self) -> &[ArmorDefinition] {
        &self.armor_stash
    }

    pub fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    /// Sets HP to `hp` (already non-negative by type).
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp;
    }

    /// Adds a signed delta to HP, clamping at zero.
    pub fn adjust_hp(&mut self, delta: i64) -> u32 {
        self.hp = clamp_add(self.hp, delta);
        self.hp
    }

    pub fn adjust_mp(&mut self, delta: i64) -> u32 {
        self.mp = clamp_add(self.mp, delta);
        self.mp
    }

    pub fn adjust_coins(&mut self, delta: i64) -> u32 {
        self.coins = clamp_add(self.coins, delta);
        self.coins
    }

    /// Grants the floor key; returns false if one was already held.
    pub fn grant_key(&mut self) -> bool {
        !std::mem::replace(&mut self.has_key, true)
    }

    /// Uses up the held key; returns false if there was none.
    pub fn take_key(&mut self) -> bool {
        std::mem::replace(&mut self.has_key, false)
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    /// Equips `weapon` and returns the one it replaced.
    ///
    /// Both weapons are kept in the stash. Charges reset whenever the weapon
    /// actually changes.
    pub fn acquire_weapon(&mut self, weapon: WeaponDefinition) -> Option<WeaponDefinition> {
        if let Some(previous) = &self.weapon {
            stash_insert(&mut self.weapon_stash, previous, |w| &w.id);
        }
        stash_insert(&mut self.weapon_stash, &weapon, |w| &w.id);
        self.swap_weapon(weapon)
    }

    /// Equips `armor` and returns the one it replaced.
    pub fn acquire_armor(&mut self, armor: ArmorDefinition) -> Option<ArmorDefinition> {
        if let Some(previous) = &self.armor {
            stash_insert(&mut self.armor_stash, previous, |a| &a.id);
        }
        stash_insert(&mut self.armor_stash, &armor, |a| &a.id);
        self.armor.replace(armor)
    }

    /// Re-equips the stashed weapon at `index`; invalid index is a no-op.
    pub fn equip_weapon_by_index(&mut self, index: usize) -> Option<WeaponDefinition> {
        let weapon = self.weapon_stash.get(index)?.clone();
        self.swap_weapon(weapon)
    }

    /// Re-equips the stashed armor at `index`; invalid index is a no-op.
    pub fn equip_armor_by_index(&mut self, index: usize) -> Option<ArmorDefinition> {
        let armor = self.armor_stash.get(index)?.clone();
        self.armor.replace(armor)
    }

    fn swap_weapon(&mut self, weapon: WeaponDefinition) -> Option<WeaponDefinition> {
        let changed = self.weapon.as_ref().is_none_or(|current| current.id != weapon.id);
        if changed {
            self.charges = weapon
                .attributes
                .iter()
                .map(|id| (id.clone(), 0))
                .collect();
        }
        self.weapon.replace(weapon)
    }

    /// Flat defense from armor and its attributes (statuses excluded).
    pub fn armor_defense<O>(&self, content: &O) -> u32
    where
        O: ContentOracle + ?Sized,
    {
        self.armor.as_ref().map_or(0, |armor| {
            armor
                .defense
                .saturating_add(armor_defense_bonus(content, &armor.attributes))
        })
    }

    /// Weapon attack plus status attack bonuses.
    pub fn effective_attack(&self) -> i32 {
        let base = self.weapon.as_ref().map_or(0, |w| w.attack);
        saturating_i32(base).saturating_add(self.statuses.attack_bonus())
    }

    /// Armor defense plus status defense bonuses.
    pub fn effective_defense<O>(&self, content: &O) -> i32
    where
        O: ContentOracle + ?Sized,
    {
        saturating_i32(self.armor_defense(content)).saturating_add(self.statuses.defense_bonus())
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    pub fn add_item_to_inventory(&mut self, item: &ItemDefinition, quantity: u32) -> String {
        self.inventory.add(item, quantity)
    }

    pub fn consume_inventory_slot(&mut self, index: usize) -> Option<ItemDefinition> {
        self.inventory.consume(index)
    }

    // ------------------------------------------------------------------
    // Statuses and skills
    // ------------------------------------------------------------------

    /// Applies status grants; returns one line per grant.
    ///
    /// Unknown ids produce an error line and are otherwise ignored.
    pub fn apply_status_grants<O>(&mut self, grants: &[StatusGrant], content: &O) -> Vec<String>
    where
        O: ContentOracle + ?Sized,
    {
        grants
            .iter()
            .map(|grant| {
                let Some(definition) = content.status(&grant.id) else {
                    tracing::warn!(status = %grant.id, "unknown status in grant");
                    return format!("Unknown status: {}", grant.id);
                };
                let duration = grant.duration.unwrap_or(definition.duration);
                match self.statuses.grant(definition, duration) {
                    GrantResult::Added(turns) => {
                        format!("{} applied ({} turns).", definition.name, turns)
                    }
                    GrantResult::Refreshed(turns) => {
                        format!("{} refreshed ({} turns).", definition.name, turns)
                    }
                    GrantResult::Full => {
                        tracing::warn!(status = %grant.id, "status list full");
                        format!("No room for {}.", definition.name)
                    }
                }
            })
            .collect()
    }

    /// Learns each skill id once; returns a line per newly learned or unknown skill.
    pub fn apply_skill_grants<O>(&mut self, ids: &[String], content: &O) -> Vec<String>
    where
        O: ContentOracle + ?Sized,
    {
        ids.iter()
            .filter_map(|id| match content.skill(id) {
                Some(skill) => self
                    .learn_skill(skill)
                    .then(|| format!("Learned {}.", skill.name)),
                None => {
                    tracing::warn!(skill = %id, "unknown skill in grant");
                    Some(format!("Unknown skill: {id}"))
                }
            })
            .collect()
    }

    /// Adds a skill once; returns false if it was already known.
    pub fn learn_skill(&mut self, skill: &SkillDefinition) -> bool {
        self.skills.learn(skill)
    }

    pub fn move_skill(&mut self, from: usize, to: usize) -> bool {
        self.skills.move_skill(from, to)
    }

    /// Applies each status's per-turn HP change, counts durations down and
    /// drops expired statuses.
    pub fn tick_statuses(&mut self) -> StatusReport {
        let StatusTick {
            hp_delta,
            applied,
            expired,
        } = self.statuses.tick();

        let mut lines: Vec<String> = applied
            .into_iter()
            .map(|(name, delta)| match delta {
                d if d < 0 => format!("{name} deals {} damage.", -i64::from(d)),
                d => format!("{name} restores {d} HP."),
            })
            .collect();
        if hp_delta != 0 {
            self.adjust_hp(hp_delta);
        }
        lines.extend(expired.into_iter().map(|name| format!("{name} wore off.")));

        let defeated = hp_delta < 0 && self.hp == 0;
        if defeated {
            lines.push("You succumbed to your wounds.".to_string());
        }
        StatusReport { lines, defeated }
    }

    /// Counts cooldowns down; returns the ids of skills that just became ready.
    pub fn tick_skill_cooldowns(&mut self) -> Vec<String> {
        self.skills.tick()
    }
}

/// Default-gear policy: fills an empty weapon or armor slot with the starting
/// kit's gear.
///
/// Applied to new runs and to restored snapshots whose equipment is missing
/// or unknown. Returns the names of the substituted items.
pub struct StartingGear;

impl StartingGear {
    pub fn fill_missing<O>(state: &mut ActorState, kit: &StartingKit, content: &O) -> Vec<String>
    where
        O: ContentOracle + ?Sized,
    {
        let mut filled = Vec::new();
        if state.weapon.is_none() {
            match content.weapon(&kit.weapon) {
                Some(weapon) => {
                    filled.push(weapon.name.clone());
                    state.acquire_weapon(weapon.clone());
                }
                None => tracing::warn!(weapon = %kit.weapon, "starting weapon not in content"),
            }
        }
        if state.armor.is_none() {
            match content.armor(&kit.armor) {
                Some(armor) => {
                    filled.push(armor.name.clone());
                    state.acquire_armor(armor.clone());
                }
                None => tracing::warn!(armor = %kit.armor, "starting armor not in content"),
            }
        }
        filled
    }
}

pub(crate) fn stash_insert<T: Clone>(stash: &mut Vec<T>, item: &T, id: impl Fn(&T) -> &String) {
    if !stash.iter().any(|existing| id(existing) == id(item)) {
        stash.push(item.clone());
    }
}

fn clamp_add(value: u32, delta: i64) -> u32 {
    (i64::from(value) + delta).clamp(0, i64::from(u32::MAX)) as u32
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ContentTables, StatusDefinition, StatusKind};

    fn sword(id: &str, attributes: &[&str]) -> WeaponDefinition {
        WeaponDefinition {
            id: id.into(),
            name: id.into(),
            attack: 10,
            attributes: attributes.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn tunic(id: &str) -> ArmorDefinition {
        ArmorDefinition {
            id: id.into(),
            name: id.into(),
            defense: 3,
            shield: 0,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn acquiring_weapon_stashes_and_resets_charges() {
        let mut actor = ActorState::new(100, 0);
        assert_eq!(actor.acquire_weapon(sword("blade", &["pierce"])), None);
        actor.charges.insert("pierce".into(), 2);

        let replaced = actor.acquire_weapon(sword("axe", &["cleave"]));
        assert_eq!(replaced.map(|w| w.id), Some("blade".into()));
        assert_eq!(actor.charges().get("cleave"), Some(&0));
        assert_eq!(actor.charges().get("pierce"), None);

        let ids: Vec<_> = actor.weapon_stash().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, ["blade", "axe"]);
    }

    #[test]
    fn stash_is_deduplicated() {
        let mut actor = ActorState::new(100, 0);
        actor.acquire_armor(tunic("tunic"));
        actor.acquire_armor(tunic("mail"));
        actor.acquire_armor(tunic("tunic"));
        assert_eq!(actor.armor_stash().len(), 2);
    }

    #[test]
    fn equip_by_index_from_stash() {
        let mut actor = ActorState::new(100, 0);
        actor.acquire_weapon(sword("blade", &[]));
        actor.acquire_weapon(sword("axe", &[]));

        let replaced = actor.equip_weapon_by_index(0);
        assert_eq!(replaced.map(|w| w.id), Some("axe".into()));
        assert_eq!(actor.weapon().map(|w| w.id.as_str()), Some("blade"));
        assert_eq!(actor.equip_weapon_by_index(9), None);
        assert_eq!(actor.weapon().map(|w| w.id.as_str()), Some("blade"));
        assert_eq!(actor.equip_armor_by_index(0), None);
    }

    #[test]
    fn reequipping_same_weapon_keeps_charge() {
        let mut actor = ActorState::new(100, 0);
        actor.acquire_weapon(sword("blade", &["pierce"]));
        actor.charges.insert("pierce".into(), 2);
        actor.equip_weapon_by_index(0);
        assert_eq!(actor.charges().get("pierce"), Some(&2));
    }

    #[test]
    fn hp_and_coins_clamp_at_zero() {
        let mut actor = ActorState::new(10, 5);
        assert_eq!(actor.adjust_hp(-25), 0);
        assert!(actor.is_defeated());
        assert_eq!(actor.adjust_coins(-3), 0);
        assert_eq!(actor.adjust_mp(4), 9);
    }

    #[test]
    fn key_grants_are_idempotent() {
        let mut actor = ActorState::new(10, 0);
        assert!(actor.grant_key());
        assert!(!actor.grant_key());
        assert!(actor.take_key());
        assert!(!actor.take_key());
    }

    #[test]
    fn status_damage_can_defeat() {
        let content = ContentTables::new().with_status(StatusDefinition {
            id: "burn".into(),
            name: "Burn".into(),
            duration: 2,
            attack: 0,
            defense: 0,
            hp_per_turn: -6,
            kind: StatusKind::Debuff,
        });
        let mut actor = ActorState::new(10, 0);
        actor.apply_status_grants(&[StatusGrant::new("burn")], &content);

        let first = actor.tick_statuses();
        assert!(!first.defeated);
        assert_eq!(actor.hp(), 4);

        let second = actor.tick_statuses();
        assert!(second.defeated);
        assert_eq!(actor.hp(), 0);
        assert!(actor.statuses().is_empty());
        assert!(second.lines.iter().any(|line| line == "Burn wore off."));
    }

    #[test]
    fn unknown_status_grant_is_reported() {
        let mut actor = ActorState::new(10, 0);
        let lines = actor.apply_status_grants(&[StatusGrant::new("doom")], &ContentTables::new());
        assert_eq!(lines, vec!["Unknown status: doom".to_string()]);
        assert!(actor.statuses().is_empty());
    }
}
