//! Seeded floor generation.
//!
//! # Algorithm
//!
//! 1. Wall the border, then scatter `obstacles` interior walls.
//! 2. Rejection-place the player start, key, door, up-stairs, the optional
//!    down-stairs and the enemies.
//! 3. Carve L-shaped corridors start → key → door → up-stairs, plus
//!    down-stairs → key when present.
//! 4. Rejection-place loot, events, NPCs and shops.
//!
//! Every draw comes from the floor's own [`SeededRng`](crate::env::SeededRng),
//! so the same request always yields the same grid.

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::env::RngSource;
use crate::state::Position;

use super::{GenerationError, Grid, Tile};

/// Smallest accepted width or height (a 5x5 interior).
pub const MIN_SIDE: u32 = 7;

/// Largest accepted width or height.
pub const MAX_SIDE: u32 = 1024;

/// Parameters identifying one floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub width: u32,
    pub height: u32,
    pub seed: u32,
    /// Place a down-stairs tile (the floor was entered by climbing up).
    pub include_downstairs: bool,
}

impl GenerationRequest {
    pub fn new(width: u32, height: u32, seed: u32) -> Self {
        Self {
            width,
            height,
            seed,
            include_downstairs: false,
        }
    }

    pub fn with_downstairs(mut self, include_downstairs: bool) -> Self {
        self.include_downstairs = include_downstairs;
        self
    }

    fn validate(&self, config: &GeneratorConfig) -> Result<(), GenerationError> {
        if self.width < MIN_SIDE || self.height < MIN_SIDE {
            return Err(GenerationError::TooSmall {
                width: self.width,
                height: self.height,
                min: MIN_SIDE,
            });
        }

        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(GenerationError::TooLarge {
                width: self.width,
                height: self.height,
                max: MAX_SIDE,
            });
        }

        // Both sides are bounded by MAX_SIDE, so the product fits.
        let interior = (self.width - 2) * (self.height - 2);
        let required = config
            .obstacles
            .saturating_add(config.special_count(self.include_downstairs))
            .saturating_add(1);
        if required > interior {
            return Err(GenerationError::Crowded { interior, required });
        }
        Ok(())
    }
}

/// Generates a floor for `request`.
///
/// # Errors
///
/// Returns [`GenerationError::TooSmall`], [`GenerationError::TooLarge`] or
/// [`GenerationError::Crowded`] when the request cannot hold the configured
/// content.
pub fn generate(
    request: &GenerationRequest,
    config: &GeneratorConfig,
) -> Result<Grid, GenerationError> {
    request.validate(config)?;

    let mut grid = Grid::walled(request.width, request.height, request.seed);
    let attempts = config.placement_attempts.max(1);
    let (max_x, max_y) = (request.width as i32 - 2, request.height as i32 - 2);

    for _ in 0..config.obstacles {
        let rng = grid.rng_mut();
        let x = rng.int(1, max_x);
        let y = rng.int(1, max_y);
        grid.set_tile(Position::new(x, y), Tile::Wall);
    }

    let start = place(&mut grid, Tile::Player, attempts)?;
    grid.set_tile(start, Tile::Floor);
    grid.set_start(start);
    // The start cell is empty floor, so this cannot fail.
    let _ = grid.set_player_position(start);

    let key = place(&mut grid, Tile::Key, attempts)?;
    let door = place(&mut grid, Tile::Door, attempts)?;
    let stairs_up = place(&mut grid, Tile::StairsUp, attempts)?;
    let stairs_down = if request.include_downstairs {
        Some(place(&mut grid, Tile::StairsDown, attempts)?)
    } else {
        None
    };

    for _ in 0..config.enemies {
        let position = place(&mut grid, Tile::Enemy, attempts)?;
        let template = grid.rng_mut().pick(&config.enemy_roster).cloned();
        grid.set_enemy_template(position, template);
    }

    grid.carve(start, key);
    grid.carve(key, door);
    grid.carve(door, stairs_up);
    if let Some(stairs_down) = stairs_down {
        grid.carve(stairs_down, key);
    }

    let extras = [
        (Tile::Weapon, config.weapons),
        (Tile::Armor, config.armors),
        (Tile::Item, config.items),
        (Tile::Event, config.events),
        (Tile::Npc, config.npcs),
        (Tile::Shop, config.shops),
    ];
    for (tile, count) in extras {
        for _ in 0..count {
            place(&mut grid, tile, attempts)?;
        }
    }

    tracing::info!(
        seed = request.seed,
        width = request.width,
        height = request.height,
        enemies = grid.enemies().len(),
        "generated floor"
    );
    Ok(grid)
}

fn place(grid: &mut Grid, tile: Tile, attempts: u32) -> Result<Position, GenerationError> {
    let position = grid
        .place(tile, attempts)
        .ok_or(GenerationError::NoFloorLeft { tile })?;
    tracing::debug!(%tile, %position, "placed tile");
    Ok(position)
}
