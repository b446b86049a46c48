//! Save/restore contract for [`ActorState`].
//!
//! An [`ActorSnapshot`] stores every field of the actor by id. Decoding is
//! lenient field by field: a malformed field falls back to its default
//! without affecting its neighbours, malformed list entries are skipped, and
//! negative or fractional numbers are clamped to non-negative integers.
//! [`ActorState::restore`] then resolves ids against the content tables,
//! dropping anything unknown, and applies [`StartingGear`] to empty slots.
//!
//! Lenient decoding goes through `serde_json::Value`, so it requires a
//! self-describing format (JSON, RON, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::env::{ContentOracle, resolve_weapon_attributes};

use super::actor::stash_insert;
use super::{ActorState, GrantResult, StartingGear};

/// Persisted shape of the actor state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActorSnapshot {
    /// `None` restores the starting kit's HP.
    #[serde(deserialize_with = "lenient::opt_count")]
    pub hp: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_count")]
    pub mp: Option<u32>,
    #[serde(deserialize_with = "lenient::id")]
    pub weapon_id: Option<String>,
    #[serde(deserialize_with = "lenient::id")]
    pub armor_id: Option<String>,
    #[serde(deserialize_with = "lenient::count_map")]
    pub weapon_charges: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient::ids")]
    pub weapon_stash: Vec<String>,
    #[serde(deserialize_with = "lenient::ids")]
    pub armor_stash: Vec<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub coins: u32,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_key: bool,
    #[serde(deserialize_with = "lenient::entries")]
    pub inventory: Vec<InventorySnapshot>,
    #[serde(deserialize_with = "lenient::entries")]
    pub statuses: Vec<StatusSnapshot>,
    #[serde(deserialize_with = "lenient::ids")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::count_map")]
    pub skill_cooldowns: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub item_id: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status_id: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub remaining: u32,
}

impl ActorSnapshot {
    /// Decodes a snapshot from JSON, never failing.
    ///
    /// Text that is not a JSON object yields the default snapshot (a fresh
    /// run once restored).
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Self::from_value(value),
            Err(error) => {
                tracing::warn!(%error, "snapshot is not valid JSON");
                Self::default()
            }
        }
    }

    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            tracing::warn!("snapshot is not an object");
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_else(|error| {
            tracing::warn!(%error, "snapshot could not be decoded");
            Self::default()
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl ActorState {
    /// Captures every field by id.
    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            hp: Some(self.hp),
            mp: Some(self.mp),
            weapon_id: self.weapon.as_ref().map(|w| w.id.clone()),
            armor_id: self.armor.as_ref().map(|a| a.id.clone()),
            weapon_charges: self.charges.clone(),
            weapon_stash: self.weapon_stash.iter().map(|w| w.id.clone()).collect(),
            armor_stash: self.armor_stash.iter().map(|a| a.id.clone()).collect(),
            coins: self.coins,
            has_key: self.has_key,
            inventory: self
                .inventory
                .entries()
                .iter()
                .map(|entry| InventorySnapshot {
                    item_id: entry.item.id.clone(),
                    quantity: entry.quantity,
                })
                .collect(),
            statuses: self
                .statuses
                .iter()
                .map(|status| StatusSnapshot {
                    status_id: status.definition.id.clone(),
                    remaining: status.remaining,
                })
                .collect(),
            skills: self.skills.known().iter().map(|s| s.id.clone()).collect(),
            skill_cooldowns: self.skills.cooldowns().clone(),
        }
    }

    /// Rebuilds actor state from a snapshot. Never fails.
    ///
    /// Unknown ids are dropped with a warning, zero quantities and durations
    /// are dropped, charges and cooldowns are clamped to their definitions,
    /// and empty equipment slots get the starting gear.
    pub fn restore<O>(snapshot: &ActorSnapshot, content: &O, config: &GameConfig) -> Self
    where
        O: ContentOracle + ?Sized,
    {
        let kit = &config.starting_kit;
        let mut state = Self::new(
            snapshot.hp.unwrap_or(kit.hp),
            snapshot.mp.unwrap_or(kit.mp),
        );
        state.coins = snapshot.coins;
        state.has_key = snapshot.has_key;

        for id in &snapshot.weapon_stash {
            match content.weapon(id) {
                Some(weapon) => stash_insert(&mut state.weapon_stash, weapon, |w| &w.id),
                None => tracing::warn!(weapon = %id, "dropping unknown stashed weapon"),
            }
        }
        for id in &snapshot.armor_stash {
            match content.armor(id) {
                Some(armor) => stash_insert(&mut state.armor_stash, armor, |a| &a.id),
                None => tracing::warn!(armor = %id, "dropping unknown stashed armor"),
            }
        }

        if let Some(id) = &snapshot.weapon_id {
            match content.weapon(id) {
                Some(weapon) => {
                    state.acquire_weapon(weapon.clone());
                    for attribute in resolve_weapon_attributes(content, &weapon.attributes) {
                        let saved = snapshot.weapon_charges.get(&attribute.id).copied();
                        if let Some(charge) = state.charges.get_mut(&attribute.id) {
                            *charge = saved.unwrap_or(0).min(attribute.threshold());
                        }
                    }
                }
                None => tracing::warn!(weapon = %id, "dropping unknown equipped weapon"),
            }
        }
        if let Some(id) = &snapshot.armor_id {
            match content.armor(id) {
                Some(armor) => {
                    state.acquire_armor(armor.clone());
                }
                None => tracing::warn!(armor = %id, "dropping unknown equipped armor"),
            }
        }
        let filled = StartingGear::fill_missing(&mut state, kit, content);
        if !filled.is_empty() {
            tracing::info!(?filled, "substituted starting gear");
        }

        for entry in &snapshot.inventory {
            match content.item(&entry.item_id) {
                Some(item) if entry.quantity > 0 => {
                    state.inventory.add(item, entry.quantity);
                }
                Some(_) => {}
                None => tracing::warn!(item = %entry.item_id, "dropping unknown inventory item"),
            }
        }

        for entry in snapshot.statuses.iter().filter(|s| s.remaining > 0) {
            match content.status(&entry.status_id) {
                Some(definition) => {
                    if state.statuses.grant(definition, entry.remaining) == GrantResult::Full {
                        tracing::warn!(status = %entry.status_id, "status list full on restore");
                    }
                }
                None => tracing::warn!(status = %entry.status_id, "dropping unknown status"),
            }
        }

        for id in &snapshot.skills {
            match content.skill(id) {
                Some(skill) => {
                    state.skills.learn(skill);
                    let saved = snapshot.skill_cooldowns.get(id).copied().unwrap_or(0);
                    state.skills.set_cooldown(id, saved.min(skill.cooldown));
                }
                None => tracing::warn!(skill = %id, "dropping unknown skill"),
            }
        }

        state
    }
}

/// Field decoders that never fail on a well-formed JSON value.
mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_count(value: &Value) -> Option<u32> {
        match value {
            Value::Number(number) => {
                if let Some(unsigned) = number.as_u64() {
                    Some(u32::try_from(unsigned).unwrap_or(u32::MAX))
                } else if number.is_i64() {
                    Some(0)
                } else {
                    number.as_f64().map(clamp_float)
                }
            }
            Value::String(text) => text.trim().parse::<f64>().ok().map(clamp_float),
            _ => None,
        }
    }

    fn clamp_float(value: f64) -> u32 {
        if value.is_nan() || value <= 0.0 {
            0
        } else {
            value.min(f64::from(u32::MAX)) as u32
        }
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_count(&value).unwrap_or(0))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(to_count(&value))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Bool(flag) => flag,
            other => to_count(&other).is_some_and(|n| n > 0),
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(id) if !id.trim().is_empty() => Some(id),
            _ => None,
        })
    }

    pub fn ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(values) => values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(id) if !id.trim().is_empty() => Some(id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn count_map<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(fields) => fields
                .into_iter()
                .filter_map(|(key, value)| to_count(&value).map(|count| (key, count)))
                .collect(),
            _ => BTreeMap::new(),
        })
    }

    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(values) => values
                .into_iter()
                .filter_map(|value| T::deserialize(value).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
