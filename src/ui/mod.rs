pub mod menu;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::render::braille::BrailleCanvas;
use crate::render::scenes::{self, BACKGROUND};
use crate::sim::quiz::Feedback;
use crate::sim::{Mode, World};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_breadcrumb(frame, &app.world, chunks[0]);

    match app.world.mode {
        Mode::Menu => {
            render_canvas(frame, chunks[1], &app.world);
            menu::render_menu(frame, chunks[1], &app.world);
        }
        _ => render_game(frame, chunks[1], &app.world),
    }
}

fn render_canvas(frame: &mut Frame, area: Rect, world: &World) {
    let (w, h) = (area.width as usize, area.height as usize);
    if w == 0 || h == 0 {
        return;
    }
    let mut canvas = BrailleCanvas::new(w, h, world.size(), BACKGROUND);
    scenes::draw(&mut canvas, world);
    let lines = canvas.into_lines(scenes::fade_brightness(world.fade));
    frame.render_widget(Paragraph::new(lines), area);
}

fn separator() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::DarkGray))
}

fn status_line(world: &World) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!(" Score: {} ", world.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            format!("Speed: {:.1}/{:.0} ", world.rocket.speed, world.rocket.max_speed()),
            Style::default().fg(Color::Cyan),
        ),
        separator(),
        Span::styled(
            format!("Rocks: {} ", world.hazards.asteroids.len()),
            Style::default().fg(Color::Rgb(160, 140, 120)),
        ),
        separator(),
        Span::styled(
            format!("Comets: {} ", world.hazards.comets.len()),
            Style::default().fg(Color::Rgb(150, 200, 255)),
        ),
    ];
    if let Some(quiz) = world.quiz.as_ref().filter(|_| matches!(world.mode, Mode::Quiz { .. })) {
        spans.push(separator());
        let feedback = match quiz.feedback {
            Feedback::None => "Fly into an answer",
            Feedback::Correct { .. } => "Correct!",
            Feedback::Wrong { .. } | Feedback::Reveal { .. } => "Wrong",
        };
        spans.push(Span::styled(
            format!("Right: {}/{} ", quiz.right, quiz.asked),
            Style::default().fg(Color::Green),
        ));
        spans.push(separator());
        spans.push(Span::styled(feedback, Style::default().fg(Color::Gray)));
    }
    if let Mode::DevGallery = world.mode {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Slide {}/{}", world.gallery + 1, world.catalog.history.len().max(1)),
            Style::default().fg(Color::Rgb(200, 120, 255)),
        ));
    }
    Line::from(spans)
}

fn help_line(mode: Mode) -> Line<'static> {
    let key = |s: &'static str| Span::styled(s, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let text = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
    let bar = || Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60)));
    let mut spans = match mode {
        Mode::Platformer { .. } => vec![
            key(" ←→ "),
            text("Walk "),
            bar(),
            key("↑/Space "),
            text("Jump "),
            bar(),
            text("Stand on a switch to read it "),
            bar(),
        ],
        Mode::InfoPanel { .. } => vec![key(" Enter "), text("Back "), bar()],
        _ => vec![
            key(" ←→ "),
            text("Rotate "),
            bar(),
            key("↑↓ "),
            text("Thrust "),
            bar(),
            key("Space "),
            text("Shoot "),
            bar(),
        ],
    };
    spans.push(key("Esc "));
    spans.push(text("Back"));
    Line::from(spans)
}

fn render_game(frame: &mut Frame, area: Rect, world: &World) {
    let title = match world.mode.planet().and_then(|i| world.planet_entry(i)) {
        Some(planet) => format!(" {} · {} ", world.mode.kind().title(), planet.name),
        None => format!(" {} ", world.mode.kind().title()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(title)
        .title_style(Style::default().fg(Color::Rgb(130, 220, 255)).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(world)), chunks[0]);
    render_canvas(frame, chunks[1], world);
    frame.render_widget(Paragraph::new(help_line(world.mode)), chunks[2]);
}
