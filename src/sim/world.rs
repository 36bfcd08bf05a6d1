/// GameSession: the complete state of a running game.
///
/// ## Ownership
///   - `grid` is the level as loaded. **Never mutated** after load.
///   - `player`, `enemies`, `coins`, `goals` are rebuilt from the grid's scan
///     every time a level is entered.
///   - `score` and `coins_collected` survive level changes.
///
/// Nothing here is global: the step function and the level controller take
/// `&mut GameSession` and report what happened through `GameOutcome`.

use std::time::Duration;

use crate::domain::entity::{Enemy, Player, Pos};
use crate::domain::grid::{Grid, MazeGrid};

/// Where the game stands after a step or a level transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOutcome {
    Playing,
    /// Player stepped onto an enemy. Terminal.
    Caught,
    /// Level budget ran out. Terminal.
    TimeUp,
    /// A goal was reached; waiting for the player to continue.
    LevelComplete,
    /// The last level was completed. Terminal.
    FinalWin,
}

impl GameOutcome {
    /// Does the game end here?
    pub fn is_terminal(self) -> bool {
        matches!(self, GameOutcome::Caught | GameOutcome::TimeUp | GameOutcome::FinalWin)
    }
}

pub struct GameSession {
    // ── Level ──
    pub grid: Grid,
    pub level_index: usize,
    pub total_levels: usize,
    pub level_name: String,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Pos>,
    pub goals: Vec<Pos>,

    // ── Game tracking ──
    pub outcome: GameOutcome,
    pub score: u32,
    pub coins_collected: u32,
    /// Time spent in the current level (sum of step deltas).
    pub elapsed: Duration,
    pub tick: u64,
}

impl GameSession {
    /// Fresh game positioned on level 0 of `total_levels`.
    pub fn new(first: MazeGrid, total_levels: usize) -> Self {
        let mut session = GameSession {
            grid: first.grid.clone(),
            level_index: 0,
            total_levels,
            level_name: String::new(),
            player: Player::new(Pos::default()),
            enemies: vec![],
            coins: vec![],
            goals: vec![],
            outcome: GameOutcome::Playing,
            score: 0,
            coins_collected: 0,
            elapsed: Duration::ZERO,
            tick: 0,
        };
        session.enter_level(0, first);
        session
    }

    /// Replace all per-level state with the scan of `maze`.
    /// Score and coin count carry over; the level timer restarts.
    pub fn enter_level(&mut self, index: usize, maze: MazeGrid) {
        let MazeGrid { name, grid, scan } = maze;
        self.level_index = index;
        self.level_name = name;
        self.grid = grid;
        self.player = Player::new(scan.player_start);
        self.enemies = scan.enemies.iter()
            .enumerate()
            .map(|(id, &pos)| Enemy::new(id, pos))
            .collect();
        self.coins = scan.coins;
        self.goals = scan.goals;
        self.outcome = GameOutcome::Playing;
        self.elapsed = Duration::ZERO;
        self.tick = 0;
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index + 1 >= self.total_levels
    }

    /// Whole seconds left in the level, floored at zero.
    pub fn time_left(&self, budget: Duration) -> u64 {
        budget.as_secs().saturating_sub(self.elapsed.as_secs())
    }

    pub fn enemy_at(&self, pos: Pos) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.pos == pos)
    }

    pub fn has_coin_at(&self, pos: Pos) -> bool {
        self.coins.contains(&pos)
    }

    pub fn is_goal(&self, pos: Pos) -> bool {
        self.goals.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze(name: &str, rows: &[&str]) -> MazeGrid {
        MazeGrid::parse(name, rows).unwrap()
    }

    #[test]
    fn new_session_seeds_from_scan() {
        let s = GameSession::new(maze("one", &["WWWWW", "WPCEW", "WCG W", "WWWWW"]), 5);
        assert_eq!(s.level_index, 0);
        assert_eq!(s.level_name, "one");
        assert_eq!(s.player.pos, Pos::new(1, 1));
        assert_eq!(s.coins, vec![Pos::new(2, 1), Pos::new(1, 2)]);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].pos, Pos::new(3, 1));
        assert_eq!(s.goals, vec![Pos::new(2, 2)]);
        assert_eq!(s.outcome, GameOutcome::Playing);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn enter_level_keeps_score_and_resets_the_rest() {
        let mut s = GameSession::new(maze("one", &["PCG"]), 2);
        s.score = 30;
        s.coins_collected = 3;
        s.elapsed = Duration::from_secs(12);
        s.tick = 700;
        s.outcome = GameOutcome::LevelComplete;

        s.enter_level(1, maze("two", &["GEP", "CC "]));
        assert_eq!(s.level_index, 1);
        assert_eq!(s.score, 30);
        assert_eq!(s.coins_collected, 3);
        assert_eq!(s.elapsed, Duration::ZERO);
        assert_eq!(s.tick, 0);
        assert_eq!(s.outcome, GameOutcome::Playing);
        assert_eq!(s.player.pos, Pos::new(2, 0));
        assert_eq!(s.coins.len(), 2);
        assert_eq!(s.enemies.len(), 1);
        assert!(s.is_final_level());
    }

    #[test]
    fn time_left_floors_at_zero() {
        let mut s = GameSession::new(maze("t", &["PG"]), 1);
        let budget = Duration::from_secs(60);
        assert_eq!(s.time_left(budget), 60);
        s.elapsed = Duration::from_millis(59_500);
        assert_eq!(s.time_left(budget), 1);
        s.elapsed = Duration::from_secs(75);
        assert_eq!(s.time_left(budget), 0);
    }

    #[test]
    fn terminal_outcomes() {
        assert!(GameOutcome::Caught.is_terminal());
        assert!(GameOutcome::TimeUp.is_terminal());
        assert!(GameOutcome::FinalWin.is_terminal());
        assert!(!GameOutcome::Playing.is_terminal());
        assert!(!GameOutcome::LevelComplete.is_terminal());
    }
}
