use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::sim::world::MenuItem;
use crate::sim::World;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════╗
 ║       ███  ███  █     ███  ███        ║
 ║       █    █ █  █     █ █  █  █       ║
 ║       ███  █ █  █     ███  ███        ║
 ║         █  █ █  █     █ █  █ █        ║
 ║       ███  ███  ████  █ █  █  █       ║
 ║                                       ║
 ║         E  X  P  L  O  R  E  R        ║
 ╚═══════════════════════════════════════╝"#;

struct MenuTile {
    icon: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

fn tile(item: MenuItem) -> MenuTile {
    match item {
        MenuItem::Launch => MenuTile {
            icon: "🚀",
            desc: "Fly among the planets\nand land on them",
            color: Color::Rgb(100, 200, 255),
            border_color: Color::Rgb(50, 100, 140),
        },
        MenuItem::Development => MenuTile {
            icon: "📜",
            desc: "How this game\ncame together",
            color: Color::Rgb(200, 120, 255),
            border_color: Color::Rgb(100, 60, 140),
        },
        MenuItem::Quit => MenuTile {
            icon: "🛑",
            desc: "Leave the\nsolar system",
            color: Color::Rgb(220, 80, 80),
            border_color: Color::Rgb(120, 40, 40),
        },
    }
}

fn render_tile(frame: &mut Frame, area: Rect, item: MenuItem, selected: bool) {
    let tile = tile(item);
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(item.label(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(desc_line, Style::default().fg(desc_color))));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to choose",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_line(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {keys:<17}"), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(what, Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

/// Menu screen drawn over the starfield already in `area`.
pub fn render_menu(frame: &mut Frame, area: Rect, world: &World) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(2),
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(255, 180, 60)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ☀ A tour of the solar system ☀  ",
        Style::default()
            .fg(Color::Rgb(255, 220, 80))
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[2]);
    let selected = world.menu_item();
    for (i, item) in MenuItem::ALL.into_iter().enumerate() {
        render_tile(frame, cols[i], item, item == selected);
    }

    let controls = Paragraph::new(vec![
        Line::from(""),
        key_line("↑ ↓", "Choose"),
        key_line("Enter / Space", "Confirm"),
        key_line("← → / A D", "Rotate the rocket"),
        key_line("↑ ↓ / W S", "Thrust forward / back"),
        key_line("Space", "Fire"),
        key_line("Esc", "Back"),
        key_line("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Controls ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, chunks[3]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled(
            format!("Score {}", world.score),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
