//! Live combat against one enemy, committed round by round.

use crate::env::{ContentOracle, EnemyDefinition};
use crate::state::{ActorState, Position};

use super::forecast::{BattleForecast, simulate};
use super::round::{RoundEvents, RoundResult, RoundState, resolve_round};

/// An enemy engagement in progress.
///
/// The shield pool is refilled from the equipped armor when the encounter
/// begins and only drains afterwards. Lifesteal is capped at the HP the actor
/// had at that moment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encounter {
    enemy: EnemyDefinition,
    enemy_hp: u32,
    shield: u32,
    start_hp: u32,
    rounds: u32,
    position: Option<Position>,
    result: RoundResult,
}

/// What one committed round did, with log lines for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub events: RoundEvents,
    pub actor_hp: u32,
    pub enemy_hp: u32,
    pub shield: u32,
    /// Coins awarded on victory.
    pub coins: u32,
    pub lines: Vec<String>,
}

impl RoundReport {
    pub fn result(&self) -> RoundResult {
        self.events.result
    }
}

impl Encounter {
    pub fn begin(enemy: EnemyDefinition, actor: &ActorState) -> Self {
        tracing::info!(enemy = %enemy.id, hp = enemy.hp, "encounter started");
        Self {
            enemy_hp: enemy.hp,
            shield: actor.armor().map_or(0, |armor| armor.shield),
            start_hp: actor.hp(),
            rounds: 0,
            position: None,
            result: RoundResult::Continue,
            enemy,
        }
    }

    /// Records where on the grid the enemy stands.
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn enemy(&self) -> &EnemyDefinition {
        &self.enemy
    }

    pub fn enemy_hp(&self) -> u32 {
        self.enemy_hp
    }

    pub fn shield(&self) -> u32 {
        self.shield
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn result(&self) -> RoundResult {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_over()
    }

    /// Previews the rest of this fight from its current state.
    pub fn forecast<O>(&self, actor: &ActorState, content: &O) -> BattleForecast
    where
        O: ContentOracle + ?Sized,
    {
        let profile = actor.combat_profile(content);
        let state = RoundState {
            actor_hp: actor.hp(),
            enemy_hp: self.enemy_hp,
            shield: self.shield,
            charges: actor.charges().clone(),
        };
        simulate(state, &profile.context(&self.enemy, self.start_hp))
    }

    /// Resolves one round and writes HP, charges and coins back to `actor`.
    ///
    /// Once the encounter is over further calls change nothing and report the
    /// final result again.
    pub fn fight_round<O>(&mut self, actor: &mut ActorState, content: &O) -> RoundReport
    where
        O: ContentOracle + ?Sized,
    {
        if self.is_over() {
            return self.report(
                RoundEvents {
                    dealt: 0,
                    triggered: Vec::new(),
                    healed: 0,
                    received: None,
                    absorbed: 0,
                    result: self.result,
                },
                actor,
                0,
                Vec::new(),
            );
        }

        let profile = actor.combat_profile(content);
        let state = RoundState {
            actor_hp: actor.hp(),
            enemy_hp: self.enemy_hp,
            shield: self.shield,
            charges: actor.charges().clone(),
        };
        let (next, events) = resolve_round(state, &profile.context(&self.enemy, self.start_hp));

        self.rounds += 1;
        self.enemy_hp = next.enemy_hp;
        self.shield = next.shield;
        self.result = events.result;
        actor.set_hp(next.actor_hp);
        actor.charges = next.charges;

        let name = &self.enemy.name;
        let mut lines = Vec::new();
        for id in &events.triggered {
            let label = profile
                .attributes
                .iter()
                .find(|a| &a.id == id)
                .map_or(id.as_str(), |a| a.name.as_str());
            lines.push(format!("{label} activates!"));
        }
        lines.push(format!("You hit {name} for {} damage.", events.dealt));
        if events.healed > 0 {
            lines.push(format!("You drain {} HP.", events.healed));
        }
        if let Some(received) = events.received {
            if events.absorbed > 0 {
                lines.push(format!(
                    "{name} hits you for {received} damage ({} absorbed).",
                    events.absorbed
                ));
            } else {
                lines.push(format!("{name} hits you for {received} damage."));
            }
        }

        let mut coins = 0;
        match events.result {
            RoundResult::Victory => {
                coins = self.enemy.coins;
                actor.adjust_coins(i64::from(coins));
                lines.push(format!("{name} is defeated! You gain {coins} coins."));
                tracing::info!(
                    enemy = %self.enemy.id,
                    rounds = self.rounds,
                    coins,
                    "encounter won"
                );
            }
            RoundResult::Defeat => {
                lines.push(format!("You were defeated by {name}."));
                tracing::info!(enemy = %self.enemy.id, rounds = self.rounds, "encounter lost");
            }
            RoundResult::Continue => {
                tracing::debug!(
                    round = self.rounds,
                    enemy_hp = self.enemy_hp,
                    actor_hp = actor.hp(),
                    "combat round"
                );
            }
        }

        self.report(events, actor, coins, lines)
    }

    /// Fights rounds until one side falls.
    pub fn fight_to_end<O>(&mut self, actor: &mut ActorState, content: &O) -> Vec<RoundReport>
    where
        O: ContentOracle + ?Sized,
    {
        let mut reports = Vec::new();
        while !self.is_over() {
            reports.push(self.fight_round(actor, content));
        }
        reports
    }

    fn report(
        &self,
        events: RoundEvents,
        actor: &ActorState,
        coins: u32,
        lines: Vec<String>,
    ) -> RoundReport {
        RoundReport {
            round: self.rounds,
            events,
            actor_hp: actor.hp(),
            enemy_hp: self.enemy_hp,
            shield: self.shield,
            coins,
            lines,
        }
    }
}

impl ActorState {
    /// Fights one round of `encounter` with this actor.
    pub fn fight_round<O>(&mut self, encounter: &mut Encounter, content: &O) -> RoundReport
    where
        O: ContentOracle + ?Sized,
    {
        encounter.fight_round(self, content)
    }
}
