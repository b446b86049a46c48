//! Floor layout: tiles, the grid, and the seeded generator.
//!
//! A [`Grid`] is created once per floor by [`generate`] and discarded on
//! floor transition. Generation guarantees wall borders and corridors linking
//! the player start, key, door and stairs.

mod error;
mod generator;
mod grid;
mod tile;

pub use error::{GenerationError, GridError};
pub use generator::{GenerationRequest, MAX_SIDE, MIN_SIDE, generate};
pub use grid::{EnemySpawn, Grid};
pub use tile::Tile;
