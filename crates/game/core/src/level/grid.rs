//! Tile grid for a single floor.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::env::{RngSource, SeededRng};
use crate::state::{CardinalDirection, Position};

use super::{GridError, Tile};

/// Enemy placement with the template it resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: Position,
    /// Template id drawn from the generator's roster. `None` means the floor's
    /// default enemy.
    pub template: Option<String>,
}

/// Rectangular floor: tile array, the floor's PRNG and cached special positions.
///
/// The player marker lives in the tile array like any other tile, but the
/// tile it covers is remembered in `under_player` and put back when the
/// player moves off the cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    rng: SeededRng,
    tiles: Vec<Tile>,
    key: Option<Position>,
    door: Option<Position>,
    stairs_up: Option<Position>,
    stairs_down: Option<Position>,
    enemies: Vec<EnemySpawn>,
    start: Position,
    player: Option<Position>,
    under_player: Tile,
}

/// Borrowed view hashed by [`Grid::layout_root`].
#[derive(Serialize)]
struct LayoutView<'a> {
    width: u32,
    height: u32,
    tiles: &'a [Tile],
    key: Option<Position>,
    door: Option<Position>,
    stairs_up: Option<Position>,
    stairs_down: Option<Position>,
    enemies: &'a [EnemySpawn],
    player: Option<Position>,
}

impl Grid {
    /// Creates a floor with wall borders and an open interior.
    pub(crate) fn walled(width: u32, height: u32, seed: u32) -> Self {
        let mut tiles = vec![Tile::Floor; width as usize * height as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    tiles[y as usize * width as usize + x as usize] = Tile::Wall;
                }
            }
        }

        Self {
            width,
            height,
            rng: SeededRng::new(seed),
            tiles,
            key: None,
            door: None,
            stairs_up: None,
            stairs_down: None,
            enemies: Vec::new(),
            start: Position::ORIGIN,
            player: None,
            under_player: Tile::Floor,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn key(&self) -> Option<Position> {
        self.key
    }

    pub fn door(&self) -> Option<Position> {
        self.door
    }

    pub fn stairs_up(&self) -> Option<Position> {
        self.stairs_up
    }

    pub fn stairs_down(&self) -> Option<Position> {
        self.stairs_down
    }

    pub fn enemies(&self) -> &[EnemySpawn] {
        &self.enemies
    }

    /// Where the player entered this floor.
    pub fn start(&self) -> Position {
        self.start
    }

    pub fn player(&self) -> Option<Position> {
        self.player
    }

    /// Tile covered by the player marker (floor when detached).
    pub fn under_player(&self) -> Tile {
        self.under_player
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.index(position).map(|index| self.tiles[index])
    }

    pub(crate) fn set_tile(&mut self, position: Position, tile: Tile) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = tile;
        }
    }

    /// True for every in-bounds tile kind except wall.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_walkable)
    }

    pub fn enemy_at(&self, position: Position) -> Option<&EnemySpawn> {
        self.enemies.iter().find(|spawn| spawn.position == position)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut SeededRng {
        &mut self.rng
    }

    pub(crate) fn set_start(&mut self, start: Position) {
        self.start = start;
    }

    /// Samples interior floor cells until a free one is found and writes `tile` there.
    ///
    /// After `attempts` misses the interior is scanned row by row, so placement
    /// stays deterministic and always terminates. Returns `None` only when no
    /// floor cell is left.
    pub(crate) fn place(&mut self, tile: Tile, attempts: u32) -> Option<Position> {
        let position = self.sample_floor(attempts)?;
        self.set_tile(position, tile);
        self.record(position, tile);
        Some(position)
    }

    fn sample_floor(&mut self, attempts: u32) -> Option<Position> {
        let (max_x, max_y) = (self.width as i32 - 2, self.height as i32 - 2);
        for _ in 0..attempts {
            let x = self.rng.int(1, max_x);
            let y = self.rng.int(1, max_y);
            let candidate = Position::new(x, y);
            if self.tile(candidate).is_some_and(|tile| !tile.is_occupied()) {
                return Some(candidate);
            }
        }

        (1..=max_y)
            .flat_map(|y| (1..=max_x).map(move |x| Position::new(x, y)))
            .find(|candidate| self.tile(*candidate).is_some_and(|tile| !tile.is_occupied()))
    }

    fn record(&mut self, position: Position, tile: Tile) {
        match tile {
            Tile::Key => self.key = Some(position),
            Tile::Door => self.door = Some(position),
            Tile::StairsUp => self.stairs_up = Some(position),
            Tile::StairsDown => self.stairs_down = Some(position),
            Tile::Enemy => self.enemies.push(EnemySpawn {
                position,
                template: None,
            }),
            _ => {}
        }
    }

    /// Places a special tile on a random free floor cell.
    ///
    /// Never overwrites a non-floor tile. Enemies placed this way carry no
    /// template.
    pub fn place_special(&mut self, tile: Tile) -> Option<Position> {
        self.place(tile, 1000)
    }

    /// Assigns a template to the enemy at `position`.
    pub(crate) fn set_enemy_template(&mut self, position: Position, template: Option<String>) {
        if let Some(spawn) = self.enemies.iter_mut().find(|s| s.position == position) {
            spawn.template = template;
        }
    }

    /// Turns every wall on the L-shaped route `from` → `to` into floor.
    ///
    /// Walks the x-axis first (on `from.y`), then the y-axis (on `to.x`).
    /// Special tiles along the route are left untouched.
    pub(crate) fn carve(&mut self, from: Position, to: Position) {
        let mut cursor = from;
        while cursor.x != to.x {
            cursor.x += (to.x - cursor.x).signum();
            self.open(cursor);
        }
        while cursor.y != to.y {
            cursor.y += (to.y - cursor.y).signum();
            self.open(cursor);
        }
    }

    fn open(&mut self, position: Position) {
        if self.tile(position) == Some(Tile::Wall) {
            self.set_tile(position, Tile::Floor);
        }
    }

    /// Puts the player marker on `position`, restoring the tile it covered before.
    ///
    /// Returns the tile now underneath the player.
    pub fn set_player_position(&mut self, position: Position) -> Result<Tile, GridError> {
        let Some(target) = self.tile(position) else {
            return Err(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        };
        if !target.is_walkable() {
            return Err(GridError::Blocked { position });
        }
        if self.player == Some(position) {
            return Ok(self.under_player);
        }

        self.detach_player();
        self.under_player = target;
        self.set_tile(position, Tile::Player);
        self.player = Some(position);
        Ok(target)
    }

    /// Moves the player one step in `direction`.
    pub fn move_player(&mut self, direction: CardinalDirection) -> Result<Tile, GridError> {
        let origin = self.player.ok_or(GridError::PlayerDetached)?;
        self.set_player_position(origin.step(direction))
    }

    /// Removes the player marker without placing it elsewhere.
    pub fn detach_player(&mut self) {
        if let Some(previous) = self.player.take() {
            let restored = std::mem::replace(&mut self.under_player, Tile::Floor);
            self.set_tile(previous, restored);
        }
    }

    /// Consumes whatever the player stands on (key picked up, loot taken,
    /// enemy defeated), leaving floor behind. Returns the consumed tile.
    pub fn clear_under_player(&mut self) -> Tile {
        let Some(position) = self.player else {
            return Tile::Floor;
        };
        let cleared = std::mem::replace(&mut self.under_player, Tile::Floor);
        self.forget(position, cleared);
        cleared
    }

    /// Removes the enemy at `position`, leaving floor behind.
    pub fn remove_enemy(&mut self, position: Position) -> Option<EnemySpawn> {
        let index = self.enemies.iter().position(|s| s.position == position)?;
        if self.player == Some(position) {
            self.under_player = Tile::Floor;
        } else {
            self.set_tile(position, Tile::Floor);
        }
        Some(self.enemies.remove(index))
    }

    fn forget(&mut self, position: Position, tile: Tile) {
        match tile {
            Tile::Key if self.key == Some(position) => self.key = None,
            Tile::Door if self.door == Some(position) => self.door = None,
            Tile::Enemy => self.enemies.retain(|spawn| spawn.position != position),
            _ => {}
        }
    }

    /// Every cell reachable from `origin` through walkable tiles (4-connected).
    pub fn reachable_from(&self, origin: Position) -> BTreeSet<Position> {
        let mut seen = BTreeSet::new();
        if !self.is_walkable(origin) {
            return seen;
        }

        let mut queue = VecDeque::from([origin]);
        seen.insert(origin);
        while let Some(current) = queue.pop_front() {
            for direction in CardinalDirection::ALL {
                let next = current.step(direction);
                if self.is_walkable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Text dump of the floor, one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|tile| tile.glyph()).collect())
            .collect()
    }

    /// SHA-256 commitment to the tile array and cached positions.
    ///
    /// Two grids with the same root have identical layouts; used to check that
    /// a seed reproduces its floor.
    pub fn layout_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let view = LayoutView {
            width: self.width,
            height: self.height,
            tiles: &self.tiles,
            key: self.key,
            door: self.door,
            stairs_up: self.stairs_up,
            stairs_down: self.stairs_down,
            enemies: &self.enemies,
            player: self.player,
        };

        let mut hasher = Sha256::new();
        if let Ok(bytes) = bincode::serialize(&view) {
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}
