/// Keyboard input.
///
/// Movement is discrete: every key press (or terminal auto-repeat) is one
/// move, queued in arrival order so fast typists don't lose steps between
/// frames. Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Key presses collected during the most recent `drain_events()`.
    pub pressed: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            pressed: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.pressed.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Release {
                    self.pressed.push(key);
                }
            }
        }
    }

    /// Moves pressed this frame, oldest first.
    pub fn moves(&self) -> Vec<MoveDir> {
        self.pressed.iter().filter_map(|k| key_to_move(k.code)).collect()
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.pressed.iter().any(|k| codes.contains(&k.code))
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(KEYS_CONFIRM)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_pressed(KEYS_QUIT)
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.pressed.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

fn key_to_move(code: KeyCode) -> Option<MoveDir> {
    if KEYS_LEFT.contains(&code) {
        Some(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(MoveDir::Right)
    } else if KEYS_UP.contains(&code) {
        Some(MoveDir::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(MoveDir::Down)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn moves_keep_press_order() {
        let mut input = InputState::new();
        input.pressed = vec![
            press(KeyCode::Right),
            press(KeyCode::Char('s')),
            press(KeyCode::Char('x')),
            press(KeyCode::Left),
            press(KeyCode::Char('W')),
        ];
        assert_eq!(
            input.moves(),
            vec![MoveDir::Right, MoveDir::Down, MoveDir::Left, MoveDir::Up]
        );
    }

    #[test]
    fn confirm_and_quit_keys() {
        let mut input = InputState::new();
        input.pressed = vec![press(KeyCode::Enter)];
        assert!(input.confirm_pressed());
        assert!(!input.quit_pressed());
        input.pressed = vec![press(KeyCode::Esc)];
        assert!(input.quit_pressed());
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.pressed = vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)];
        assert!(input.ctrl_c_pressed());
        input.pressed = vec![press(KeyCode::Char('c'))];
        assert!(!input.ctrl_c_pressed());
    }
}
