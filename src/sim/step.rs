/// The step function: advances the session by one frame.
///
/// Processing order:
///   1. Queued player moves, in the order they were pressed
///      (stops at the first move that ends the level or the game)
///   2. Level timer
///   3. Enemy patrol
///
/// A player move resolves, in order: wall check → commit → coin pickup →
/// enemy contact → goal contact. Enemies walking into the player do not
/// count; only the player's own move checks for contact.

use std::time::Duration;

use log::{debug, info};

use crate::config::RulesConfig;
use crate::domain::entity::MoveDir;
use crate::domain::patrol::{self, PatrolMove};
use super::event::GameEvent;
use super::world::{GameOutcome, GameSession};

/// Result of one step.
#[derive(Clone, Debug)]
pub struct Tick {
    pub outcome: GameOutcome,
    pub events: Vec<GameEvent>,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(
    session: &mut GameSession,
    moves: &[MoveDir],
    dt: Duration,
    rules: &RulesConfig,
) -> Tick {
    let mut events = Vec::new();
    if session.outcome != GameOutcome::Playing {
        return Tick { outcome: session.outcome, events };
    }
    session.tick += 1;

    for &dir in moves {
        let outcome = move_player(session, dir, rules, &mut events);
        if outcome != GameOutcome::Playing {
            return Tick { outcome, events };
        }
    }

    if resolve_timer(session, dt, rules, &mut events) {
        return Tick { outcome: session.outcome, events };
    }

    resolve_enemy_patrol(session, rules, &mut events);

    Tick { outcome: session.outcome, events }
}

// ══════════════════════════════════════════════════════════════
// Player movement
// ══════════════════════════════════════════════════════════════

/// Move the player one tile. Walls (and the grid edge) reject the move
/// with no side effects.
pub fn move_player(
    session: &mut GameSession,
    dir: MoveDir,
    rules: &RulesConfig,
    events: &mut Vec<GameEvent>,
) -> GameOutcome {
    if session.outcome != GameOutcome::Playing {
        return session.outcome;
    }

    let target = session.player.pos.step(dir);
    let pos = match target {
        Some(p) if session.grid.is_open(target) => p,
        _ => {
            events.push(GameEvent::PlayerBlocked);
            return session.outcome;
        }
    };
    session.player.pos = pos;
    events.push(GameEvent::PlayerMoved { x: pos.x, y: pos.y });
    debug!("player -> ({}, {})", pos.x, pos.y);

    // Coins
    let before = session.coins.len();
    session.coins.retain(|&c| c != pos);
    for _ in session.coins.len()..before {
        session.score += rules.coin_value;
        session.coins_collected += 1;
        events.push(GameEvent::CoinCollected { x: pos.x, y: pos.y, score: session.score });
        debug!("coin collected, score {}", session.score);
    }

    // Enemy contact
    if let Some(enemy) = session.enemy_at(pos) {
        let id = enemy.id;
        events.push(GameEvent::PlayerCaught { id });
        info!("caught by enemy {id} at ({}, {})", pos.x, pos.y);
        session.outcome = GameOutcome::Caught;
        return session.outcome;
    }

    // Goal
    if session.is_goal(pos) {
        events.push(GameEvent::GoalReached { x: pos.x, y: pos.y });
        info!("level {} complete, score {}", session.level_index + 1, session.score);
        session.outcome = GameOutcome::LevelComplete;
    }

    session.outcome
}

// ══════════════════════════════════════════════════════════════
// Timer
// ══════════════════════════════════════════════════════════════

/// Returns true if the level budget ran out.
fn resolve_timer(
    session: &mut GameSession,
    dt: Duration,
    rules: &RulesConfig,
    events: &mut Vec<GameEvent>,
) -> bool {
    session.elapsed += dt;
    if session.elapsed < rules.level_time {
        return false;
    }
    events.push(GameEvent::TimeUp);
    info!("time up on level {}", session.level_index + 1);
    session.outcome = GameOutcome::TimeUp;
    true
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn resolve_enemy_patrol(session: &mut GameSession, rules: &RulesConfig, events: &mut Vec<GameEvent>) {
    let grid = &session.grid;
    for enemy in &mut session.enemies {
        if patrol::advance(enemy, grid, rules.enemy_move_interval) == PatrolMove::Turned {
            events.push(GameEvent::EnemyTurned { id: enemy.id });
        }
    }
}
