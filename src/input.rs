//! Turns terminal key events into per-frame input.
//!
//! Most terminals only report presses, never releases, so a held key is
//! emulated: each press keeps its action "held" for a few frames and
//! auto-repeat presses extend it. Terminals that do report releases end the
//! hold immediately.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::sim::platformer::WalkInput;
use crate::sim::rocket::Controls;

/// Frames a fresh press stays held. Long enough to bridge the terminal's
/// delay before auto-repeat starts.
const INITIAL_HOLD: u8 = 24;
/// Frames each auto-repeat press extends the hold.
const REPEAT_HOLD: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Confirm,
    Escape,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Fire,
        Action::Confirm,
        Action::Escape,
    ];

    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::Right),
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Down),
            KeyCode::Char(' ') => Some(Action::Fire),
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Escape),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Fire => 4,
            Action::Confirm => 5,
            Action::Escape => 6,
        }
    }
}

/// Everything the simulation reads about the keyboard for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    held: [bool; 7],
    /// Discrete presses since the previous frame, oldest first.
    pub pressed: Vec<Action>,
}

impl InputSnapshot {
    pub fn held(&self, action: Action) -> bool {
        self.held[action.slot()]
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn controls(&self) -> Controls {
        Controls {
            rotate_left: self.held(Action::Left),
            rotate_right: self.held(Action::Right),
            thrust_forward: self.held(Action::Up),
            thrust_backward: self.held(Action::Down),
            fire: self.held(Action::Fire),
        }
    }

    /// Enter, Space and Up all jump.
    pub fn walk(&self) -> WalkInput {
        WalkInput {
            left: self.held(Action::Left),
            right: self.held(Action::Right),
            jump: self.held(Action::Up) || self.held(Action::Fire) || self.was_pressed(Action::Confirm),
        }
    }

    #[cfg(test)]
    pub fn holding(actions: &[Action]) -> Self {
        let mut snapshot = Self::default();
        for a in actions {
            snapshot.held[a.slot()] = true;
        }
        snapshot
    }

    #[cfg(test)]
    pub fn pressing(actions: &[Action]) -> Self {
        Self {
            pressed: actions.to_vec(),
            ..Self::default()
        }
    }
}

/// Emulates held keys from press, repeat and release events.
#[derive(Debug, Clone, Default)]
pub struct KeyLatch {
    frames: [u8; 7],
    pressed: Vec<Action>,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let Some(action) = Action::from_key(key.code) else {
            return;
        };
        let slot = &mut self.frames[action.slot()];
        match key.kind {
            KeyEventKind::Release => *slot = 0,
            KeyEventKind::Repeat => *slot = (*slot).max(REPEAT_HOLD),
            KeyEventKind::Press => {
                if *slot > 0 {
                    // Auto-repeat on terminals that report it as a press.
                    *slot = (*slot).max(REPEAT_HOLD);
                } else {
                    *slot = INITIAL_HOLD;
                    self.pressed.push(action);
                }
            }
        }
    }

    /// Snapshot for this frame, then age every hold by one frame.
    pub fn frame(&mut self) -> InputSnapshot {
        let mut held = [false; 7];
        for action in Action::ALL {
            held[action.slot()] = self.frames[action.slot()] > 0;
        }
        for f in &mut self.frames {
            *f = f.saturating_sub(1);
        }
        InputSnapshot {
            held,
            pressed: std::mem::take(&mut self.pressed),
        }
    }

    pub fn clear(&mut self) {
        self.frames = [0; 7];
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_press_holds_then_expires() {
        let mut latch = KeyLatch::new();
        latch.on_key(key(KeyCode::Up, KeyEventKind::Press));
        let first = latch.frame();
        assert!(first.held(Action::Up));
        assert!(first.was_pressed(Action::Up));
        assert!(first.controls().thrust_forward);
        for _ in 1..INITIAL_HOLD {
            let snap = latch.frame();
            assert!(snap.held(Action::Up));
            assert!(snap.pressed.is_empty());
        }
        assert!(!latch.frame().held(Action::Up));
    }

    #[test]
    fn test_release_ends_hold() {
        let mut latch = KeyLatch::new();
        latch.on_key(key(KeyCode::Char('a'), KeyEventKind::Press));
        latch.frame();
        latch.on_key(key(KeyCode::Char('a'), KeyEventKind::Release));
        assert!(!latch.frame().held(Action::Left));
    }

    #[test]
    fn test_repeat_press_is_not_a_new_press() {
        let mut latch = KeyLatch::new();
        latch.on_key(key(KeyCode::Enter, KeyEventKind::Press));
        latch.frame();
        latch.on_key(key(KeyCode::Enter, KeyEventKind::Press));
        assert!(!latch.frame().was_pressed(Action::Confirm));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let mut latch = KeyLatch::new();
        latch.on_key(key(KeyCode::Char('z'), KeyEventKind::Press));
        assert_eq!(latch.frame(), InputSnapshot::default());
    }

    #[test]
    fn test_walk_jump_keys() {
        assert!(InputSnapshot::holding(&[Action::Fire]).walk().jump);
        assert!(InputSnapshot::pressing(&[Action::Confirm]).walk().jump);
        assert!(!InputSnapshot::holding(&[Action::Left]).walk().jump);
    }
}
