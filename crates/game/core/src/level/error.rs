//! Level generation and grid movement errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Position;

use super::Tile;

/// Errors returned by [`super::generate`] for requests that cannot produce a
/// valid floor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Width or height below the minimum side length.
    #[error("Floor {width}x{height} is too small (minimum side: {min})")]
    TooSmall {
        width: u32,
        height: u32,
        min: u32,
    },

    /// Width or height above the maximum side length.
    #[error("Floor {width}x{height} is too large (maximum side: {max})")]
    TooLarge {
        width: u32,
        height: u32,
        max: u32,
    },

    /// Interior cannot hold every obstacle and special tile.
    #[error("Floor interior has {interior} cells but {required} are required")]
    Crowded {
        /// Number of interior (non-border) cells.
        interior: u32,
        /// Obstacles plus special tiles plus the player start.
        required: u32,
    },

    /// No floor cell was left for a special tile.
    #[error("No free floor cell left to place {tile}")]
    NoFloorLeft { tile: Tile },
}

impl GameError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        use GenerationError::*;
        match self {
            TooSmall { .. } | TooLarge { .. } | Crowded { .. } => ErrorSeverity::Validation,
            // Validation rules out this case; reaching it means the counts drifted.
            NoFloorLeft { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use GenerationError::*;
        match self {
            TooSmall { .. } => "LEVEL_TOO_SMALL",
            TooLarge { .. } => "LEVEL_TOO_LARGE",
            Crowded { .. } => "LEVEL_CROWDED",
            NoFloorLeft { .. } => "LEVEL_NO_FLOOR_LEFT",
        }
    }
}

/// Errors returned when placing or moving the player marker.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Position {position} is out of bounds (grid size: {width}x{height})")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("Position {position} is blocked by a wall")]
    Blocked { position: Position },

    #[error("Player is not on the grid")]
    PlayerDetached,
}

impl GameError for GridError {
    fn severity(&self) -> ErrorSeverity {
        use GridError::*;
        match self {
            Blocked { .. } => ErrorSeverity::Recoverable,
            OutOfBounds { .. } | PlayerDetached => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use GridError::*;
        match self {
            OutOfBounds { .. } => "GRID_OUT_OF_BOUNDS",
            Blocked { .. } => "GRID_BLOCKED",
            PlayerDetached => "GRID_PLAYER_DETACHED",
        }
    }
}
