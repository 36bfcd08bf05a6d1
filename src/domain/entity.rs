/// Entities: Player, Enemy, and the tile coordinates they live on.
/// Coins and goals are plain position sets owned by the session.

/// Integer tile coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }

    /// Neighbour one tile away. `None` when that would leave the grid
    /// through the top or left edge.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Pos> {
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(Pos { x, y })
    }

    pub fn step(self, dir: MoveDir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }
}

/// Horizontal heading of a patrolling enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn dx(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// One discrete player move (one key press = one tile).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Player { pos }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub id: usize,
    pub pos: Pos,
    pub facing: Facing,
    pub move_counter: u32, // ticks since the last move attempt
}

impl Enemy {
    /// Every enemy starts out heading right.
    pub fn new(id: usize, pos: Pos) -> Self {
        Enemy {
            id,
            pos,
            facing: Facing::Right,
            move_counter: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stops_at_top_left_edge() {
        assert_eq!(Pos::new(0, 3).offset(-1, 0), None);
        assert_eq!(Pos::new(3, 0).offset(0, -1), None);
        assert_eq!(Pos::new(1, 1).offset(-1, -1), Some(Pos::new(0, 0)));
    }

    #[test]
    fn step_follows_direction() {
        let p = Pos::new(4, 4);
        assert_eq!(p.step(MoveDir::Left), Some(Pos::new(3, 4)));
        assert_eq!(p.step(MoveDir::Right), Some(Pos::new(5, 4)));
        assert_eq!(p.step(MoveDir::Up), Some(Pos::new(4, 3)));
        assert_eq!(p.step(MoveDir::Down), Some(Pos::new(4, 5)));
    }

    #[test]
    fn facing_flip() {
        assert_eq!(Facing::Right.flipped(), Facing::Left);
        assert_eq!(Facing::Left.flipped().dx(), 1);
    }

    #[test]
    fn enemy_spawns_heading_right() {
        let e = Enemy::new(0, Pos::new(2, 3));
        assert_eq!(e.facing, Facing::Right);
        assert_eq!(e.move_counter, 0);
    }
}
