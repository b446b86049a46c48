//! Deterministic simulation core for a floor-based roguelike.
//!
//! `delve-core` holds the rules and nothing else: a seeded floor generator,
//! the player's actor state (equipment, inventory, statuses, skills), and a
//! combat engine that can both preview an encounter and play it round by
//! round. Content tables are injected through [`env::ContentOracle`]; the
//! `delve-content` crate loads them from data files. Rendering, input and
//! persistence belong to the host, which only exchanges
//! [`state::ActorSnapshot`]s with the core.
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod level;
pub mod session;
pub mod state;

pub use combat::{
    BattleForecast, CombatProfile, Encounter, RoundReport, RoundResult, forecast, resolve_round,
};
pub use config::{GameConfig, GeneratorConfig, LootConfig, StartingKit};
pub use env::{ContentOracle, ContentTables, RngSource, SeededRng, derive_seed};
pub use error::{ErrorSeverity, GameError};
pub use level::{GenerationError, GenerationRequest, Grid, GridError, Tile, generate};
pub use session::{Session, SessionError, StepOutcome, StepReport, build_floor};
pub use state::{ActorSnapshot, ActorState, CardinalDirection, Position, StartingGear};
