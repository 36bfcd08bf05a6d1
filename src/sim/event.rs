/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { x: usize, y: usize },
    PlayerBlocked,
    CoinCollected { x: usize, y: usize, score: u32 },
    EnemyTurned { id: usize },
    PlayerCaught { id: usize },
    GoalReached { x: usize, y: usize },
    TimeUp,
}
