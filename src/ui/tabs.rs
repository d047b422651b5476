use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::sim::{Mode, ModeKind, World};

/// Screens from the menu down to the current one.
pub fn breadcrumb(world: &World) -> Vec<String> {
    let mut path = vec![ModeKind::Menu.title().to_string()];
    let planet = world
        .mode
        .planet()
        .and_then(|i| world.planet_entry(i))
        .map(|p| p.name.clone());
    match world.mode {
        Mode::Menu => {}
        Mode::DevGallery => path.push(ModeKind::DevGallery.title().to_string()),
        Mode::SolarSystem => path.push(ModeKind::SolarSystem.title().to_string()),
        Mode::PlanetSurface { .. } => {
            path.push(ModeKind::SolarSystem.title().to_string());
            path.extend(planet);
        }
        Mode::Quiz { .. } | Mode::Platformer { .. } | Mode::InfoPanel { .. } => {
            path.push(ModeKind::SolarSystem.title().to_string());
            path.extend(planet);
            path.push(world.mode.kind().title().to_string());
        }
    }
    path
}

pub fn render_breadcrumb(frame: &mut Frame, world: &World, area: Rect) {
    let path = breadcrumb(world);
    let last = path.len().saturating_sub(1);
    let titles: Vec<Line> = path
        .into_iter()
        .map(|t| Line::from(Span::styled(format!(" {t} "), Style::default().fg(Color::Rgb(120, 120, 140)))))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(" ☀ Solar Explorer ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(255, 180, 60))
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(last)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" › ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::content::Catalog;

    #[test]
    fn test_breadcrumb_follows_mode() {
        let mut world = World::new(WorldConfig::default(), Catalog::builtin(), Some(1));
        assert_eq!(breadcrumb(&world), vec!["Menu"]);
        let earth = world.planets.iter().position(|p| p.name == "Earth").unwrap();
        world.enter(Mode::Quiz { planet: earth });
        assert_eq!(breadcrumb(&world), vec!["Menu", "Solar System", "Earth", "Quiz"]);
        world.enter(Mode::DevGallery);
        assert_eq!(breadcrumb(&world), vec!["Menu", "Development"]);
    }
}
