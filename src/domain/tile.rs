/// Tile types and their level-file symbols.
/// Tile semantics are queried via methods so the symbol table lives here only.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Floor,
    PlayerStart,
    Goal,
    Coin,
    Enemy,
}

impl Tile {
    /// Map a level-file character to a tile. Unknown characters are floor.
    pub fn from_symbol(ch: char) -> Tile {
        match ch {
            'W' => Tile::Wall,
            'P' => Tile::PlayerStart,
            'G' => Tile::Goal,
            'C' => Tile::Coin,
            'E' => Tile::Enemy,
            _ => Tile::Floor,
        }
    }

    /// Canonical character for this tile (floor renders as a space).
    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => 'W',
            Tile::Floor => ' ',
            Tile::PlayerStart => 'P',
            Tile::Goal => 'G',
            Tile::Coin => 'C',
            Tile::Enemy => 'E',
        }
    }

    /// Blocks the player and turns enemies around.
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Can an entity occupy this cell?
    /// Spawn markers are floor once the level is running.
    pub fn is_passable(self) -> bool {
        !self.is_wall()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table() {
        assert_eq!(Tile::from_symbol('W'), Tile::Wall);
        assert_eq!(Tile::from_symbol('P'), Tile::PlayerStart);
        assert_eq!(Tile::from_symbol('G'), Tile::Goal);
        assert_eq!(Tile::from_symbol('C'), Tile::Coin);
        assert_eq!(Tile::from_symbol('E'), Tile::Enemy);
    }

    #[test]
    fn anything_else_is_floor() {
        for ch in [' ', '.', '#', 'w', 'x', '0'] {
            assert_eq!(Tile::from_symbol(ch), Tile::Floor, "{ch:?}");
        }
    }

    #[test]
    fn only_walls_block() {
        assert!(!Tile::Wall.is_passable());
        for t in [Tile::Floor, Tile::PlayerStart, Tile::Goal, Tile::Coin, Tile::Enemy] {
            assert!(t.is_passable());
        }
    }
}
