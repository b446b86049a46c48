use serde::{Deserialize, Serialize};

/// Contents of a single grid cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Key,
    Door,
    StairsUp,
    StairsDown,
    Enemy,
    Player,
    Weapon,
    Armor,
    Event,
    Shop,
    Npc,
    Item,
    Ending,
}

impl Tile {
    /// Every kind except walls can be entered.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Anything other than bare floor counts as occupied for placement.
    pub fn is_occupied(self) -> bool {
        !matches!(self, Tile::Floor)
    }

    /// Single-character glyph used by text dumps of a floor.
    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Key => 'k',
            Tile::Door => '+',
            Tile::StairsUp => '<',
            Tile::StairsDown => '>',
            Tile::Enemy => 'e',
            Tile::Player => '@',
            Tile::Weapon => '/',
            Tile::Armor => '[',
            Tile::Event => '?',
            Tile::Shop => '$',
            Tile::Npc => 'n',
            Tile::Item => '!',
            Tile::Ending => '*',
        }
    }
}
