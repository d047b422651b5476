use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::KeyLatch;
use crate::sim::{GameEvent, Mode, World};

pub struct App {
    pub should_quit: bool,
    pub world: World,
    latch: KeyLatch,
}

impl App {
    pub fn new(world: World) -> Self {
        Self {
            should_quit: false,
            world,
            latch: KeyLatch::new(),
        }
    }

    pub fn on_tick(&mut self) {
        let input = self.latch.frame();
        let events = self.world.step(&input);
        for event in events {
            match event {
                GameEvent::QuitRequested => self.should_quit = true,
                GameEvent::ModeChanged(mode) => {
                    // Holds from the previous screen would carry into the new one.
                    self.latch.clear();
                    log::debug!("Now in {:?}", mode);
                }
                _ => {}
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            && key.kind == KeyEventKind::Press
            && self.world.mode == Mode::Menu
        {
            self.should_quit = true;
            return;
        }

        self.latch.on_key(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::content::Catalog;
    use crossterm::event::KeyEventState;

    fn app() -> App {
        App::new(World::new(WorldConfig::default(), Catalog::builtin(), Some(11)))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = app();
        app.world.enter(Mode::SolarSystem);
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_q_only_quits_from_menu() {
        let mut app = app();
        app.world.enter(Mode::SolarSystem);
        app.on_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.world.enter(Mode::Menu);
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_launch_from_menu_keys() {
        let mut app = app();
        app.on_key(press(KeyCode::Enter));
        app.on_tick();
        assert_eq!(app.world.mode, Mode::SolarSystem);
    }

    #[test]
    fn test_quit_menu_item() {
        let mut app = app();
        app.on_key(press(KeyCode::Up));
        app.on_tick();
        app.on_key(press(KeyCode::Enter));
        app.on_tick();
        assert!(app.should_quit);
    }
}
