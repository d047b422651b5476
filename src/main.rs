mod app;
mod config;
mod content;
mod event;
mod input;
mod render;
mod sim;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::WorldConfig;
use content::Catalog;
use event::{Event, EventHandler};
use sim::World;

/// Fly a rocket around the solar system, land on planets, take quizzes and
/// explore their surfaces on foot.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file overriding world tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file replacing the built-in planet catalog
    #[arg(long)]
    content: Option<PathBuf>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    let catalog = match &args.content {
        Some(path) => Catalog::load_or_builtin(path),
        None => Catalog::builtin(),
    };
    let tick_ms = 1000 / u64::from(config.fps.max(1));
    let mut app = App::new(World::new(config, catalog, args.seed));

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("entering alternate screen")?;
    // Release events end held keys at once where the terminal supports them.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("enabling key release events")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app, tick_ms);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    log::info!("Session over, score {}", app.world.score);
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, tick_ms: u64) -> Result<()> {
    let event_handler = EventHandler::new(tick_ms);
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
