/// Enemy patrol: back and forth along a row, bouncing off walls.
///
/// An enemy only acts every `interval` ticks. When it acts it looks one tile
/// ahead: a wall turns it around (it stays put that tick), anything else is
/// walked into. Enemies never look at each other, coins, goals or the player.

use crate::domain::entity::Enemy;
use crate::domain::grid::Grid;

/// What an enemy did on a given tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PatrolMove {
    Waiting,
    Moved,
    Turned,
}

/// Advance one enemy by one tick.
pub fn advance(enemy: &mut Enemy, grid: &Grid, interval: u32) -> PatrolMove {
    enemy.move_counter += 1;
    if enemy.move_counter < interval.max(1) {
        return PatrolMove::Waiting;
    }
    enemy.move_counter = 0;

    let ahead = enemy.pos.offset(enemy.facing.dx(), 0);
    match ahead {
        Some(next) if grid.is_open(ahead) => {
            enemy.pos = next;
            PatrolMove::Moved
        }
        _ => {
            enemy.facing = enemy.facing.flipped();
            PatrolMove::Turned
        }
    }
}
