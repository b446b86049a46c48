//! Actor state owned by a running game session.
//!
//! [`ActorState`] is created once per run, mutated through the operations in
//! this module, and converted to and from an [`ActorSnapshot`] for saving.
//! It has a single owner; nothing in here is shared or locked.
mod actor;
mod common;
mod inventory;
mod outcome;
mod skills;
mod snapshot;
mod status;

pub use actor::{ActorState, StartingGear, StatusReport};
pub use common::{CardinalDirection, Position};
pub use inventory::{InventoryEntry, InventoryState};
pub use outcome::OutcomeReport;
pub use skills::{SkillBook, SkillError};
pub use snapshot::{ActorSnapshot, InventorySnapshot, StatusSnapshot};
pub use status::{ActiveStatus, GrantResult, StatusEffects, StatusTick};
