//! Turn-based combat between the actor and a single enemy.
//!
//! Combat logic is pure: [`resolve_round`] maps a [`RoundState`] to the next
//! one. [`forecast`] runs that function to completion on copied numbers for a
//! battle preview, and [`Encounter`] runs it one round at a time and commits
//! the results to the [`ActorState`](crate::state::ActorState). Because both
//! paths share the same round function, a preview always agrees with the
//! fight it describes.
//!
//! # Round order
//!
//! 1. Weapon attributes gain a charge; those at threshold trigger and reset
//! 2. The actor strikes (`max(1, attack - defense)`, modified by triggers)
//! 3. A defeated enemy ends the round as a victory
//! 4. The enemy strikes back through the shield pool

pub mod damage;
mod encounter;
mod forecast;
mod round;

pub use damage::{Absorption, MINIMUM_DAMAGE, absorb, apply_damage, calculate_damage};
pub use encounter::{Encounter, RoundReport};
pub use forecast::{BattleForecast, CombatProfile, forecast};
pub use round::{RoundContext, RoundEvents, RoundResult, RoundState, resolve_round};
