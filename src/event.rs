use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Input pump thread. Key events of every kind are forwarded; a `Tick` is
/// sent whenever a full tick has elapsed, even while keys keep arriving.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(event::Event::Key(key)) = event::read() {
                        if tx.send(Event::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
