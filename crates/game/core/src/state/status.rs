//! Status effect system for actors.
//!
//! Status effects are timed buffs/debuffs that add attack or defense and may
//! change HP every tick. Durations count down in turns; an effect is dropped
//! on the tick its remaining count reaches zero.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::StatusDefinition;

/// Active status effects on an actor, in the order they were first granted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatus, { GameConfig::MAX_STATUS_EFFECTS }>,
}

/// A status effect with the number of turns it has left (always ≥ 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveStatus {
    pub definition: StatusDefinition,
    pub remaining: u32,
}

/// What [`StatusEffects::grant`] did with a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantResult {
    /// Newly active with this many turns.
    Added(u32),
    /// Already active; remaining is now this value (unchanged if the request was shorter).
    Refreshed(u32),
    /// No free slot.
    Full,
}

/// HP changes and expirations produced by one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Sum of the per-turn HP deltas of every active status.
    pub hp_delta: i64,
    /// Statuses with their per-turn delta, for log lines.
    pub applied: Vec<(String, i32)>,
    /// Names of statuses that ran out on this tick.
    pub expired: Vec<String>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.effects.iter().any(|e| e.definition.id == id)
    }

    pub fn remaining(&self, id: &str) -> Option<u32> {
        self.effects
            .iter()
            .find(|e| e.definition.id == id)
            .map(|e| e.remaining)
    }

    /// Grants a status for `duration` turns (minimum one).
    ///
    /// If the status is already active its remaining count becomes the larger
    /// of the current and requested values; effects never stack.
    pub fn grant(&mut self, definition: &StatusDefinition, duration: u32) -> GrantResult {
        let duration = duration.max(1);
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.definition.id == definition.id)
        {
            existing.remaining = existing.remaining.max(duration);
            return GrantResult::Refreshed(existing.remaining);
        }

        match self.effects.try_push(ActiveStatus {
            definition: definition.clone(),
            remaining: duration,
        }) {
            Ok(()) => GrantResult::Added(duration),
            Err(_) => GrantResult::Full,
        }
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, id: &str) {
        self.effects.retain(|e| e.definition.id != id);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Counts every effect down by one turn and drops the ones that expire.
    ///
    /// The returned HP delta is not applied here; the owner clamps it.
    pub fn tick(&mut self) -> StatusTick {
        let mut tick = StatusTick::default();
        for effect in self.effects.iter_mut() {
            if effect.definition.hp_per_turn != 0 {
                tick.hp_delta += i64::from(effect.definition.hp_per_turn);
                tick.applied
                    .push((effect.definition.name.clone(), effect.definition.hp_per_turn));
            }
            effect.remaining -= 1;
            if effect.remaining == 0 {
                tick.expired.push(effect.definition.name.clone());
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        tick
    }

    pub fn attack_bonus(&self) -> i32 {
        self.effects.iter().map(|e| e.definition.attack).sum()
    }

    pub fn defense_bonus(&self) -> i32 {
        self.effects.iter().map(|e| e.definition.defense).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
