//! Unified application of effect payloads (items, events, skills, NPC rewards).

use crate::env::{ContentOracle, EventOutcome};

use super::{ActorState, SkillError};

/// Result of applying an [`EventOutcome`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeReport {
    /// The outcome's own message followed by every effect line.
    pub message: String,
    /// One line per applied (or rejected) effect.
    pub effects: Vec<String>,
}

impl OutcomeReport {
    fn compose(headline: &str, effects: Vec<String>) -> Self {
        let message = std::iter::once(headline)
            .filter(|line| !line.is_empty())
            .chain(effects.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n");
        Self { message, effects }
    }
}

impl ActorState {
    /// Applies an effect payload.
    ///
    /// Order: HP (set wins over delta), MP, key, items, coins, statuses,
    /// skills. Numeric changes clamp at zero; unknown ids become warning lines.
    pub fn apply_event_outcome<O>(&mut self, outcome: &EventOutcome, content: &O) -> OutcomeReport
    where
        O: ContentOracle + ?Sized,
    {
        let mut effects = Vec::new();

        if let Some(hp) = outcome.hp_set {
            self.set_hp(hp);
            effects.push(format!("HP set to {hp}."));
        } else if let Some(delta) = outcome.hp_delta.filter(|d| *d != 0) {
            let hp = self.adjust_hp(i64::from(delta));
            effects.push(format!("HP {delta:+} (now {hp})."));
        }

        if let Some(delta) = outcome.mp_delta.filter(|d| *d != 0) {
            let mp = self.adjust_mp(i64::from(delta));
            effects.push(format!("MP {delta:+} (now {mp})."));
        }

        if outcome.grant_key {
            if self.grant_key() {
                effects.push("You obtained the key.".to_string());
            } else {
                effects.push("You already have the key.".to_string());
            }
        }

        for grant in &outcome.items {
            match content.item(&grant.id) {
                Some(item) => effects.push(self.add_item_to_inventory(item, grant.quantity)),
                None => {
                    tracing::warn!(item = %grant.id, "unknown item in grant");
                    effects.push(format!("Unknown item: {}", grant.id));
                }
            }
        }

        if outcome.coins != 0 {
            let coins = self.adjust_coins(i64::from(outcome.coins));
            effects.push(format!("Coins {:+} (now {coins}).", outcome.coins));
        }

        effects.extend(self.apply_status_grants(&outcome.statuses, content));
        effects.extend(self.apply_skill_grants(&outcome.skills, content));

        OutcomeReport::compose(&outcome.message, effects)
    }

    /// Consumes one unit from inventory slot `index` and applies its effect.
    pub fn use_inventory_slot<O>(&mut self, index: usize, content: &O) -> Option<OutcomeReport>
    where
        O: ContentOracle + ?Sized,
    {
        let item = self.consume_inventory_slot(index)?;
        let mut report = self.apply_event_outcome(&item.effect, content);
        let headline = format!("Used {}.", item.name);
        report.message = if report.message.is_empty() {
            headline
        } else {
            format!("{headline}\n{}", report.message)
        };
        Some(report)
    }

    /// Casts a known, ready skill: applies its effect and starts its cooldown.
    ///
    /// # Errors
    ///
    /// [`SkillError::NotKnown`] or [`SkillError::CoolingDown`]; state is untouched.
    pub fn cast_skill<O>(&mut self, id: &str, content: &O) -> Result<OutcomeReport, SkillError>
    where
        O: ContentOracle + ?Sized,
    {
        let skill = self.skills.ready(id)?.clone();
        self.skills.set_cooldown(&skill.id, skill.cooldown);
        tracing::debug!(skill = %skill.id, cooldown = skill.cooldown, "skill cast");
        Ok(self.apply_event_outcome(&skill.effect, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{
        ContentTables, ItemDefinition, ItemGrant, SkillDefinition, StatusDefinition, StatusGrant,
        StatusKind,
    };

    fn content() -> ContentTables {
        ContentTables::new()
            .with_item(ItemDefinition {
                id: "potion".into(),
                name: "Potion".into(),
                stackable: true,
                effect: EventOutcome {
                    hp_delta: Some(30),
                    ..EventOutcome::default()
                },
            })
            .with_status(StatusDefinition {
                id: "guard".into(),
                name: "Guard".into(),
                duration: 3,
                attack: 0,
                defense: 4,
                hp_per_turn: 0,
                kind: StatusKind::Buff,
            })
            .with_skill(SkillDefinition {
                id: "mend".into(),
                name: "Mend".into(),
                cooldown: 3,
                effect: EventOutcome {
                    message: "Wounds close.".into(),
                    hp_delta: Some(15),
                    ..EventOutcome::default()
                },
            })
    }

    #[test]
    fn applies_effects_in_order() {
        let mut actor = ActorState::new(50, 10);
        let outcome = EventOutcome {
            message: "A shrine hums.".into(),
            hp_delta: Some(-60),
            grant_key: true,
            items: vec![
                ItemGrant {
                    id: "potion".into(),
                    quantity: 2,
                },
                ItemGrant {
                    id: "relic".into(),
                    quantity: 1,
                },
            ],
            coins: -5,
            statuses: vec![StatusGrant::new("guard")],
            skills: vec!["mend".into()],
            ..EventOutcome::default()
        };

        let report = actor.apply_event_outcome(&outcome, &content());
        assert_eq!(actor.hp(), 0);
        assert!(actor.has_key());
        assert_eq!(actor.inventory().count("potion"), 2);
        assert_eq!(actor.coins(), 0);
        assert!(actor.statuses().has("guard"));
        assert!(actor.skills().knows("mend"));
        assert_eq!(
            report.effects,
            vec![
                "HP -60 (now 0).",
                "You obtained the key.",
                "Received Potion x2.",
                "Unknown item: relic",
                "Coins -5 (now 0).",
                "Guard applied (3 turns).",
                "Learned Mend.",
            ]
        );
        assert!(report.message.starts_with("A shrine hums.\nHP -60"));
    }

    #[test]
    fn hp_set_wins_over_delta() {
        let mut actor = ActorState::new(50, 0);
        let outcome = EventOutcome {
            hp_set: Some(7),
            hp_delta: Some(100),
            ..EventOutcome::default()
        };
        actor.apply_event_outcome(&outcome, &content());
        assert_eq!(actor.hp(), 7);
    }

    #[test]
    fn second_key_is_reported_not_doubled() {
        let mut actor = ActorState::new(50, 0);
        actor.grant_key();
        let outcome = EventOutcome {
            grant_key: true,
            ..EventOutcome::default()
        };
        let report = actor.apply_event_outcome(&outcome, &content());
        assert_eq!(report.effects, vec!["You already have the key."]);
    }

    #[test]
    fn using_a_potion_heals_and_consumes() {
        let content = content();
        let mut actor = ActorState::new(20, 0);
        actor.add_item_to_inventory(content.items.get("potion").unwrap(), 1);

        let report = actor.use_inventory_slot(0, &content).unwrap();
        assert_eq!(actor.hp(), 50);
        assert!(actor.inventory().is_empty());
        assert!(report.message.starts_with("Used Potion."));
        assert!(actor.use_inventory_slot(0, &content).is_none());
    }

    #[test]
    fn casting_starts_cooldown() {
        let content = content();
        let mut actor = ActorState::new(20, 0);
        actor.apply_skill_grants(&["mend".to_string()], &content);

        let report = actor.cast_skill("mend", &content).unwrap();
        assert_eq!(actor.hp(), 35);
        assert_eq!(report.effects, vec!["HP +15 (now 35)."]);
        assert!(matches!(
            actor.cast_skill("mend", &content),
            Err(SkillError::CoolingDown { remaining: 3, .. })
        ));

        for _ in 0..2 {
            assert!(actor.tick_skill_cooldowns().is_empty());
        }
        assert_eq!(actor.tick_skill_cooldowns(), vec!["mend".to_string()]);
        assert!(actor.cast_skill("mend", &content).is_ok());
    }
}
