/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use domain::entity::MoveDir;
use sim::level::{advance_level, start_game, LevelSet};
use sim::step;
use sim::world::{GameOutcome, GameSession};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{play_events, Sfx, SoundEngine};

fn main() {
    // Diagnostics go to stderr; run with `2>tilemaze.log` to keep them off the board.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();
    let levels = LevelSet::from_config(&config);

    let mut session = match start_game(&levels) {
        Ok(s) => s,
        Err(e) => {
            log::error!("cannot start: {e}");
            eprintln!("Failed to load the first level: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &levels, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game aborted: {e}");
        eprintln!("Game error: {e}");
    }

    if !session.outcome.is_terminal() {
        log::info!("left during level {}", session.level_index + 1);
    }

    println!();
    println!("Thanks for playing Tile Maze!");
    println!(
        "Final Score: {}  (level {}/{}, {} coins)",
        session.score,
        session.level_index + 1,
        session.total_levels,
        session.coins_collected
    );
}

fn game_loop(
    session: &mut GameSession,
    levels: &LevelSet,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad connected");
    }

    let mut last_tick = Instant::now();
    // When a Caught/TimeUp screen went up.
    let mut ended_at: Option<Instant> = None;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.quit_pressed() || gp.cancel_pressed() {
            log::info!("quit requested");
            break;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick);
        last_tick = now;

        match session.outcome {
            GameOutcome::Playing => {
                let moves = collect_moves(&kb, &gp);
                let tick = step::step(session, &moves, dt, &config.rules);
                play_events(sound, &tick.events);
                if tick.outcome != GameOutcome::Playing {
                    log::info!("level {} ended: {:?}", session.level_index + 1, tick.outcome);
                }
            }
            GameOutcome::LevelComplete => {
                if kb.confirm_pressed() || gp.confirm_pressed() {
                    if advance_level(session, levels)? == GameOutcome::FinalWin {
                        if let Some(sfx) = sound {
                            sfx.play(Sfx::FinalWin);
                        }
                    }
                }
            }
            GameOutcome::Caught | GameOutcome::TimeUp => {
                let since = *ended_at.get_or_insert(now);
                if now.duration_since(since) >= config.end_screen {
                    break;
                }
            }
            GameOutcome::FinalWin => {}
        }

        renderer.render(session, &config.rules)?;
        std::thread::sleep(frame_sleep(config.frame, now.elapsed()));
    }

    Ok(())
}

/// Keyboard moves first, then gamepad, each in press order.
fn collect_moves(kb: &InputState, gp: &GamepadState) -> Vec<MoveDir> {
    let mut moves = kb.moves();
    moves.extend_from_slice(gp.moves());
    moves
}

/// Remaining frame budget after `spent`, never negative.
fn frame_sleep(frame: Duration, spent: Duration) -> Duration {
    frame.saturating_sub(spent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sleep_saturates() {
        let frame = Duration::from_millis(16);
        assert_eq!(frame_sleep(frame, Duration::from_millis(4)), Duration::from_millis(12));
        assert_eq!(frame_sleep(frame, Duration::from_millis(40)), Duration::ZERO);
    }
}
