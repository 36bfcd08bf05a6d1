/// MazeGrid: a level's text layout parsed into tiles, plus the one-pass scan
/// that seeds the entities.
///
/// ## Layout rules
///   - One line per row, one character per tile (see `Tile::from_symbol`).
///   - Trailing whitespace is dropped, then short rows are padded with floor
///     up to the widest row, so the grid is always rectangular.
///   - Trailing blank rows are dropped.
///   - Anything outside the rectangle reads as `Wall`.

use crate::domain::entity::Pos;
use crate::domain::tile::Tile;
use crate::error::LevelError;

/// Read-only tile grid for one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
    width: usize,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Tile at (x, y). Out of bounds = wall.
    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> Tile {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    #[inline]
    pub fn tile(&self, pos: Pos) -> Tile {
        self.tile_at(pos.x, pos.y)
    }

    /// Is `pos` enterable? `None` (stepped off the top/left edge) is not.
    #[inline]
    pub fn is_open(&self, pos: Option<Pos>) -> bool {
        pos.map_or(false, |p| self.tile(p).is_passable())
    }

    /// Render back to level-file text.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }
}

/// Initial entity positions found while parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelScan {
    pub player_start: Pos,
    pub goals: Vec<Pos>,
    pub coins: Vec<Pos>,
    pub enemies: Vec<Pos>,
}

/// A parsed level: grid plus its spawn scan.
#[derive(Clone, Debug)]
pub struct MazeGrid {
    pub name: String,
    pub grid: Grid,
    pub scan: LevelScan,
}

impl MazeGrid {
    /// Parse level text. `name` is only used in error messages and the HUD.
    pub fn parse<S: AsRef<str>>(name: &str, lines: &[S]) -> Result<MazeGrid, LevelError> {
        let mut raw: Vec<&str> = lines.iter().map(|l| l.as_ref().trim_end()).collect();
        while raw.last().map_or(false, |r| r.is_empty()) {
            raw.pop();
        }

        let width = raw.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err(LevelError::EmptyOrMalformedGrid { name: name.to_string() });
        }

        let mut rows = Vec::with_capacity(raw.len());
        let mut player_start = None;
        let mut scan = LevelScan::default();

        for (y, line) in raw.iter().enumerate() {
            let mut row = Vec::with_capacity(width);
            for (x, ch) in line.chars().enumerate() {
                let tile = Tile::from_symbol(ch);
                let pos = Pos::new(x, y);
                match tile {
                    Tile::PlayerStart => {
                        if player_start.is_none() {
                            player_start = Some(pos);
                        }
                    }
                    Tile::Goal => scan.goals.push(pos),
                    Tile::Coin => scan.coins.push(pos),
                    Tile::Enemy => scan.enemies.push(pos),
                    Tile::Wall | Tile::Floor => {}
                }
                row.push(tile);
            }
            row.resize(width, Tile::Floor);
            rows.push(row);
        }

        scan.player_start = player_start
            .ok_or_else(|| LevelError::NoPlayerStart { name: name.to_string() })?;
        if scan.goals.is_empty() {
            return Err(LevelError::NoGoal { name: name.to_string() });
        }

        Ok(MazeGrid {
            name: name.to_string(),
            grid: Grid { rows, width },
            scan,
        })
    }

    /// Parse a whole file's contents.
    pub fn parse_str(name: &str, content: &str) -> Result<MazeGrid, LevelError> {
        let lines: Vec<&str> = content.lines().collect();
        MazeGrid::parse(name, &lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rows: &[&str]) -> MazeGrid {
        MazeGrid::parse("test", rows).unwrap()
    }

    #[test]
    fn scan_finds_every_entity() {
        let m = parse(&[
            "WWWWWW",
            "WP C W",
            "W E CW",
            "WG  GW",
            "WWWWWW",
        ]);
        assert_eq!(m.scan.player_start, Pos::new(1, 1));
        assert_eq!(m.scan.coins, vec![Pos::new(3, 1), Pos::new(4, 2)]);
        assert_eq!(m.scan.enemies, vec![Pos::new(2, 2)]);
        assert_eq!(m.scan.goals, vec![Pos::new(1, 3), Pos::new(4, 3)]);
        assert_eq!(m.grid.width(), 6);
        assert_eq!(m.grid.height(), 5);
    }

    #[test]
    fn round_trip_through_text() {
        let m = parse(&[
            "WWWWWWW",
            "WP  . W",
            "W CEC",
            "W  G  W",
            "WWWWWWW",
        ]);
        let text = m.grid.to_lines();
        let again = MazeGrid::parse("again", &text).unwrap();
        assert_eq!(again.grid, m.grid);
        assert_eq!(again.scan, m.scan);
    }

    #[test]
    fn short_rows_are_padded_with_floor() {
        let m = parse(&["WWWW", "WPG", "W"]);
        assert_eq!(m.grid.width(), 4);
        assert_eq!(m.grid.tile_at(3, 1), Tile::Floor);
        assert_eq!(m.grid.tile_at(1, 2), Tile::Floor);
    }

    #[test]
    fn leading_spaces_keep_their_column() {
        let m = parse(&["  PG"]);
        assert_eq!(m.scan.player_start, Pos::new(2, 0));
        assert_eq!(m.scan.goals, vec![Pos::new(3, 0)]);
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let m = parse(&["PG"]);
        assert_eq!(m.grid.tile_at(2, 0), Tile::Wall);
        assert_eq!(m.grid.tile_at(0, 1), Tile::Wall);
        assert!(!m.grid.is_open(None));
    }

    #[test]
    fn first_player_marker_wins() {
        let m = parse(&["P P G"]);
        assert_eq!(m.scan.player_start, Pos::new(0, 0));
    }

    #[test]
    fn trailing_blank_lines_ignored() {
        let m = MazeGrid::parse_str("t", "WWW\r\nWPW\r\nWGW\r\n\r\n   \n").unwrap();
        assert_eq!(m.grid.height(), 3);
    }

    #[test]
    fn empty_grid_rejected() {
        let err = MazeGrid::parse::<&str>("blank", &[]).unwrap_err();
        assert!(matches!(err, LevelError::EmptyOrMalformedGrid { .. }));
        let err = MazeGrid::parse("blank", &["", "   "]).unwrap_err();
        assert!(matches!(err, LevelError::EmptyOrMalformedGrid { .. }));
    }

    #[test]
    fn missing_player_rejected() {
        let err = MazeGrid::parse("nop", &["WWW", "W G", "WWW"]).unwrap_err();
        assert!(matches!(err, LevelError::NoPlayerStart { ref name } if name == "nop"));
    }

    #[test]
    fn missing_goal_rejected() {
        let err = MazeGrid::parse("nog", &["WWW", "WPW", "WWW"]).unwrap_err();
        assert!(matches!(err, LevelError::NoGoal { .. }));
    }
}
