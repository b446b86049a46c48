//! Known skills and their cooldowns.

use std::collections::BTreeMap;

use crate::env::SkillDefinition;
use crate::error::{ErrorSeverity, GameError};

/// Ordered known skills plus a cooldown entry for each of them.
///
/// The order is the player's arrangement for menus; it has no effect on
/// resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillBook {
    known: Vec<SkillDefinition>,
    cooldowns: BTreeMap<String, u32>,
}

/// Reasons a skill cast is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    #[error("Skill {0} is not known")]
    NotKnown(String),

    #[error("Skill {id} is cooling down ({remaining} turns left)")]
    CoolingDown { id: String, remaining: u32 },
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SkillError::NotKnown(_) => ErrorSeverity::Validation,
            SkillError::CoolingDown { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SkillError::NotKnown(_) => "SKILL_NOT_KNOWN",
            SkillError::CoolingDown { .. } => "SKILL_COOLING_DOWN",
        }
    }
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill once; returns false if it was already known.
    pub fn learn(&mut self, skill: &SkillDefinition) -> bool {
        if self.knows(&skill.id) {
            return false;
        }
        self.known.push(skill.clone());
        self.cooldowns.entry(skill.id.clone()).or_insert(0);
        true
    }

    pub fn knows(&self, id: &str) -> bool {
        self.known.iter().any(|skill| skill.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&SkillDefinition> {
        self.known.iter().find(|skill| skill.id == id)
    }

    pub fn known(&self) -> &[SkillDefinition] {
        &self.known
    }

    /// Remaining cooldown; zero for ready or unknown skills.
    pub fn cooldown(&self, id: &str) -> u32 {
        self.cooldowns.get(id).copied().unwrap_or(0)
    }

    pub fn cooldowns(&self) -> &BTreeMap<String, u32> {
        &self.cooldowns
    }

    pub(crate) fn set_cooldown(&mut self, id: &str, turns: u32) {
        if self.knows(id) {
            self.cooldowns.insert(id.to_string(), turns);
        }
    }

    /// Returns the skill if it is known and off cooldown.
    pub fn ready(&self, id: &str) -> Result<&SkillDefinition, SkillError> {
        let skill = self
            .get(id)
            .ok_or_else(|| SkillError::NotKnown(id.to_string()))?;
        match self.cooldown(id) {
            0 => Ok(skill),
            remaining => Err(SkillError::CoolingDown {
                id: id.to_string(),
                remaining,
            }),
        }
    }

    /// Decrements every running cooldown; returns the ids that became ready.
    pub fn tick(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        for (id, turns) in self.cooldowns.iter_mut() {
            if *turns > 0 {
                *turns -= 1;
                if *turns == 0 {
                    ready.push(id.clone());
                }
            }
        }
        ready
    }

    /// Moves the skill at `from` to position `to`. Out-of-range indices are ignored.
    pub fn move_skill(&mut self, from: usize, to: usize) -> bool {
        if from >= self.known.len() || to >= self.known.len() {
            return false;
        }
        let skill = self.known.remove(from);
        self.known.insert(to, skill);
        true
    }
}
