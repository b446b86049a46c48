//! Floor-by-floor play: movement, tile resolution, encounters and stairs.
//!
//! A [`Session`] ties the other modules together for one run. It owns the
//! current [`Grid`], the [`ActorState`] and the encounter in progress, and it
//! regenerates floors from the run seed so that floor `n` of a run always has
//! the same layout.

use crate::combat::{BattleForecast, Encounter, RoundReport, RoundResult};
use crate::config::GameConfig;
use crate::env::{ContentOracle, ContentTables, EventOutcome, RngSource, derive_seed};
use crate::error::{ErrorSeverity, GameError};
use crate::level::{GenerationError, GenerationRequest, Grid, GridError, Tile, generate};
use crate::state::{
    ActorSnapshot, ActorState, CardinalDirection, OutcomeReport, Position, SkillError, StatusReport,
};

/// The first floor of every run.
pub const FIRST_FLOOR: u32 = 1;

/// What a step resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved onto an empty cell.
    Moved,
    /// Picked up the floor key.
    KeyTaken,
    /// Bumped into the door without a key; the player did not move.
    DoorLocked,
    /// Used the key; the door is gone.
    DoorOpened,
    /// Standing on the up-stairs. `sealed` while the door is still closed.
    StairsUp { sealed: bool },
    StairsDown,
    /// Bumped into an enemy; an encounter has begun and the player did not move.
    Encounter {
        enemy: String,
        forecast: BattleForecast,
    },
    /// Bumped into an enemy whose template is not in the content tables. The
    /// placement is removed.
    EnemyVanished { template: String },
    /// Took whatever a loot tile held.
    Loot { lines: Vec<String> },
    /// Standing on an event, NPC, shop or ending tile; the host decides what
    /// it offers.
    Interaction { tile: Tile },
}

/// Result of [`Session::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub outcome: StepOutcome,
    /// Player position after the step.
    pub position: Position,
    /// Status tick for this turn; empty when the player did not move.
    pub status: StatusReport,
    /// Skills whose cooldown finished this turn.
    pub ready_skills: Vec<String>,
    /// Status damage ended the run and the session restarted.
    pub restarted: bool,
}

/// Errors returned by [`Session`] operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error("An encounter with {enemy} is in progress")]
    InCombat { enemy: String },

    #[error("No encounter is in progress")]
    NoEncounter,

    #[error("Player is standing on {tile}, not on {expected}")]
    NotOnStairs { tile: Tile, expected: Tile },

    #[error("The stairs are sealed until the door is opened")]
    StairsSealed,

    #[error("Cannot descend below the first floor")]
    LowestFloor,
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        use SessionError::*;
        match self {
            Grid(e) => e.severity(),
            Generation(e) => e.severity(),
            Skill(e) => e.severity(),
            InCombat { .. } | NoEncounter | NotOnStairs { .. } | StairsSealed | LowestFloor => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use SessionError::*;
        match self {
            Grid(e) => e.error_code(),
            Generation(e) => e.error_code(),
            Skill(e) => e.error_code(),
            InCombat { .. } => "SESSION_IN_COMBAT",
            NoEncounter => "SESSION_NO_ENCOUNTER",
            NotOnStairs { .. } => "SESSION_NOT_ON_STAIRS",
            StairsSealed => "SESSION_STAIRS_SEALED",
            LowestFloor => "SESSION_LOWEST_FLOOR",
        }
    }
}

/// One run through the dungeon.
pub struct Session<C = ContentTables> {
    config: GameConfig,
    content: C,
    run_seed: u32,
    floor: u32,
    grid: Grid,
    actor: ActorState,
    encounter: Option<Encounter>,
}

impl<C> Session<C>
where
    C: ContentOracle,
{
    /// Starts a new run on the first floor.
    pub fn new(config: GameConfig, content: C, run_seed: u32) -> Result<Self, SessionError> {
        let actor = ActorState::new_run(&config, &content);
        Self::with_actor(config, content, run_seed, FIRST_FLOOR, actor)
    }

    /// Resumes a run on `floor` with a restored actor.
    pub fn resume(
        config: GameConfig,
        content: C,
        run_seed: u32,
        floor: u32,
        snapshot: &ActorSnapshot,
    ) -> Result<Self, SessionError> {
        let actor = ActorState::restore(snapshot, &content, &config);
        Self::with_actor(config, content, run_seed, floor.max(FIRST_FLOOR), actor)
    }

    fn with_actor(
        config: GameConfig,
        content: C,
        run_seed: u32,
        floor: u32,
        actor: ActorState,
    ) -> Result<Self, SessionError> {
        let grid = build_floor(&config, run_seed, floor)?;
        Ok(Self {
            config,
            content,
            run_seed,
            floor,
            grid,
            actor,
            encounter: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn run_seed(&self) -> u32 {
        self.run_seed
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut ActorState {
        &mut self.actor
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        self.actor.snapshot()
    }

    /// Moves the player one cell and resolves the tile it lands on.
    ///
    /// Doors without a key and enemies stop the player in place. Every step
    /// that actually moves ticks statuses and skill cooldowns once.
    ///
    /// # Errors
    ///
    /// [`SessionError::InCombat`] while an encounter is unresolved, and
    /// [`GridError`] for walls and out-of-bounds targets.
    pub fn step(&mut self, direction: CardinalDirection) -> Result<StepReport, SessionError> {
        self.ensure_idle()?;
        let origin = self.grid.player().ok_or(GridError::PlayerDetached)?;
        let target = origin.step(direction);

        match self.grid.tile(target) {
            Some(Tile::Door) if !self.actor.has_key() => {
                return Ok(self.stay(origin, StepOutcome::DoorLocked));
            }
            Some(Tile::Enemy) => {
                let outcome = self.engage(target);
                return Ok(self.stay(origin, outcome));
            }
            _ => {}
        }

        let landed = self.grid.move_player(direction)?;
        let outcome = match landed {
            Tile::Floor | Tile::Player | Tile::Wall | Tile::Enemy => StepOutcome::Moved,
            Tile::Key => {
                self.grid.clear_under_player();
                self.actor.grant_key();
                StepOutcome::KeyTaken
            }
            Tile::Door => {
                self.actor.take_key();
                self.grid.clear_under_player();
                tracing::info!(floor = self.floor, "door opened");
                StepOutcome::DoorOpened
            }
            Tile::StairsUp => StepOutcome::StairsUp {
                sealed: self.grid.door().is_some(),
            },
            Tile::StairsDown => StepOutcome::StairsDown,
            Tile::Weapon | Tile::Armor | Tile::Item => {
                self.grid.clear_under_player();
                StepOutcome::Loot {
                    lines: self.take_loot(landed),
                }
            }
            Tile::Event | Tile::Npc | Tile::Shop | Tile::Ending => {
                StepOutcome::Interaction { tile: landed }
            }
        };

        self.end_turn(outcome)
    }

    /// Fights one round of the current encounter.
    ///
    /// A won encounter removes the enemy from the floor. A lost one restarts
    /// the run from the first floor with a fresh actor.
    pub fn fight_round(&mut self) -> Result<RoundReport, SessionError> {
        let encounter = self.encounter.as_mut().ok_or(SessionError::NoEncounter)?;
        let report = encounter.fight_round(&mut self.actor, &self.content);

        match report.result() {
            RoundResult::Continue => {}
            RoundResult::Victory => {
                if let Some(position) = encounter.position() {
                    self.grid.remove_enemy(position);
                }
                self.encounter = None;
            }
            RoundResult::Defeat => {
                self.encounter = None;
                self.restart()?;
            }
        }
        Ok(report)
    }

    /// Fights the current encounter to its end.
    pub fn fight_to_end(&mut self) -> Result<Vec<RoundReport>, SessionError> {
        let mut reports = vec![self.fight_round()?];
        while self.encounter.is_some() {
            reports.push(self.fight_round()?);
        }
        Ok(reports)
    }

    /// Applies an event or NPC payload chosen by the host. An event tile under
    /// the player is used up.
    pub fn resolve_event(&mut self, outcome: &EventOutcome) -> OutcomeReport {
        if self.grid.under_player() == Tile::Event {
            self.grid.clear_under_player();
        }
        self.actor.apply_event_outcome(outcome, &self.content)
    }

    pub fn use_item(&mut self, slot: usize) -> Option<OutcomeReport> {
        self.actor.use_inventory_slot(slot, &self.content)
    }

    pub fn cast_skill(&mut self, id: &str) -> Result<OutcomeReport, SessionError> {
        Ok(self.actor.cast_skill(id, &self.content)?)
    }

    /// Climbs to the next floor. The player must stand on the up-stairs of a
    /// floor whose door has been opened.
    pub fn ascend(&mut self) -> Result<u32, SessionError> {
        self.ensure_idle()?;
        self.ensure_on(Tile::StairsUp)?;
        if self.grid.door().is_some() {
            return Err(SessionError::StairsSealed);
        }
        self.change_floor(self.floor + 1)
    }

    /// Returns to the previous floor, regenerated from its seed.
    pub fn descend(&mut self) -> Result<u32, SessionError> {
        self.ensure_idle()?;
        self.ensure_on(Tile::StairsDown)?;
        if self.floor <= FIRST_FLOOR {
            return Err(SessionError::LowestFloor);
        }
        self.change_floor(self.floor - 1)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match &self.encounter {
            Some(encounter) => Err(SessionError::InCombat {
                enemy: encounter.enemy().name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn ensure_on(&self, expected: Tile) -> Result<(), SessionError> {
        let tile = self.grid.under_player();
        if self.grid.player().is_none() || tile != expected {
            return Err(SessionError::NotOnStairs { tile, expected });
        }
        Ok(())
    }

    fn change_floor(&mut self, floor: u32) -> Result<u32, SessionError> {
        let grid = build_floor(&self.config, self.run_seed, floor)?;
        self.grid.detach_player();
        self.grid = grid;
        self.floor = floor;
        tracing::info!(floor, "entered floor");
        Ok(floor)
    }

    fn restart(&mut self) -> Result<(), SessionError> {
        tracing::info!(floor = self.floor, "run ended, restarting");
        self.actor.reset(&self.config, &self.content);
        self.encounter = None;
        self.change_floor(FIRST_FLOOR)?;
        Ok(())
    }

    fn engage(&mut self, position: Position) -> StepOutcome {
        let template = self
            .grid
            .enemy_at(position)
            .and_then(|spawn| spawn.template.clone())
            .unwrap_or_else(|| self.config.default_enemy.clone());

        let Some(enemy) = self.content.enemy(&template) else {
            tracing::warn!(%template, %position, "unknown enemy template, removing placement");
            self.grid.remove_enemy(position);
            return StepOutcome::EnemyVanished { template };
        };

        let encounter = Encounter::begin(enemy.clone(), &self.actor).at(position);
        let forecast = encounter.forecast(&self.actor, &self.content);
        let name = enemy.name.clone();
        self.encounter = Some(encounter);
        StepOutcome::Encounter {
            enemy: name,
            forecast,
        }
    }

    fn take_loot(&mut self, tile: Tile) -> Vec<String> {
        let loot = &self.config.loot;
        let pool = match tile {
            Tile::Weapon => &loot.weapons,
            Tile::Armor => &loot.armors,
            _ => &loot.items,
        };
        let Some(id) = self.grid.rng_mut().pick(pool).cloned() else {
            return vec!["There is nothing here.".to_string()];
        };

        let line = match tile {
            Tile::Weapon => self.content.weapon(&id).map(|weapon| {
                self.actor.acquire_weapon(weapon.clone());
                format!("Equipped {}.", weapon.name)
            }),
            Tile::Armor => self.content.armor(&id).map(|armor| {
                self.actor.acquire_armor(armor.clone());
                format!("Equipped {}.", armor.name)
            }),
            _ => self
                .content
                .item(&id)
                .map(|item| self.actor.add_item_to_inventory(item, 1)),
        };

        match line {
            Some(line) => vec![line],
            None => {
                tracing::warn!(%tile, %id, "unknown loot id");
                vec![format!("Unknown {tile}: {id}")]
            }
        }
    }

    fn stay(&self, position: Position, outcome: StepOutcome) -> StepReport {
        StepReport {
            outcome,
            position,
            status: StatusReport::default(),
            ready_skills: Vec::new(),
            restarted: false,
        }
    }

    fn end_turn(&mut self, outcome: StepOutcome) -> Result<StepReport, SessionError> {
        let status = self.actor.tick_statuses();
        let ready_skills = self.actor.tick_skill_cooldowns();
        let restarted = status.defeated;
        if restarted {
            self.restart()?;
        }
        let position = self.grid.player().unwrap_or(self.grid.start());
        Ok(StepReport {
            outcome,
            position,
            status,
            ready_skills,
            restarted,
        })
    }
}

/// Generates floor `floor` of the run seeded with `run_seed`.
///
/// The first floor has no down-stairs.
pub fn build_floor(
    config: &GameConfig,
    run_seed: u32,
    floor: u32,
) -> Result<Grid, GenerationError> {
    let request = GenerationRequest::new(
        config.floor_width,
        config.floor_height,
        derive_seed(run_seed, floor),
    )
    .with_downstairs(floor > FIRST_FLOOR);
    generate(&request, &config.generator)
}
