//! Per-mode drawing of the world onto a [`Canvas`].

use glam::Vec2;
use ratatui::style::Color;

use super::{blend, scale_color, shade, Canvas, Font, Sprite};
use crate::sim::button::{wrap_words, InfoBubble, SurfaceButton, BUBBLE_COLUMNS, GLOW_STEPS};
use crate::sim::collision::Rect;
use crate::sim::hazards::HazardField;
use crate::sim::planet::Planet;
use crate::sim::platformer::{PlatformerLevel, WalkerState};
use crate::sim::quiz::{answer_rects, Feedback, QuizSession};
use crate::sim::rocket::{Rocket, ThrustStage};
use crate::sim::world::{Star, World, SURFACE_SCALE};
use crate::sim::Mode;

pub const BACKGROUND: Color = Color::Rgb(5, 5, 15);
const TEXT: Color = Color::Rgb(230, 230, 240);
const DIM_TEXT: Color = Color::Rgb(120, 120, 140);
const ANSWER_BOX: Color = Color::Rgb(60, 60, 140);
const RIGHT: Color = Color::Rgb(80, 200, 100);
const WRONG: Color = Color::Rgb(220, 80, 80);
const HIGHLIGHT: Color = Color::Rgb(255, 220, 80);
/// Planet-view stars drift this much slower than the rocket.
const STAR_PARALLAX: f32 = 8.0;
/// Names shown in the solar system when the rocket is this close.
const LABEL_RANGE: f32 = 120.0;
const SLIDE_COLUMNS: usize = 60;
const FACT_COLUMNS: usize = 70;

const ASTRONAUT_IDLE: [&str; 10] = [
    "..####..",
    ".######.",
    ".###..#.",
    ".######.",
    "..####..",
    "########",
    "#.####.#",
    "..####..",
    "..#..#..",
    "..#..#..",
];

const ASTRONAUT_RUN: [&str; 10] = [
    "..####..",
    ".######.",
    ".###..#.",
    ".######.",
    "..####..",
    ".######.",
    "#.####.#",
    "..####..",
    ".#....#.",
    "#......#",
];

const ASTRONAUT_JUMP: [&str; 10] = [
    "#.####.#",
    "#######.",
    ".###..#.",
    ".######.",
    "..####..",
    "..####..",
    "..####..",
    "..####..",
    ".##..##.",
    "........",
];

pub fn draw(canvas: &mut impl Canvas, world: &World) {
    match world.mode {
        Mode::Menu => draw_stars(canvas, &world.stars, world.frame, 0.0),
        Mode::SolarSystem => draw_solar_system(canvas, world),
        Mode::PlanetSurface { planet } => draw_planet_view(canvas, world, planet),
        Mode::Quiz { .. } => draw_quiz(canvas, world),
        Mode::InfoPanel { planet } => draw_info_panel(canvas, world, planet),
        Mode::Platformer { .. } => {
            if let Some(level) = &world.level {
                draw_platformer(canvas, world, level);
            }
        }
        Mode::DevGallery => draw_gallery(canvas, world),
    }
}

/// Brightness for the fade-in after a mode change.
pub fn fade_brightness(fade: u8) -> f32 {
    1.0 - fade as f32 / 255.0
}

fn draw_stars(canvas: &mut impl Canvas, stars: &[Star], frame: u64, shift: f32) {
    let width = canvas.size().x;
    for star in stars {
        let pos = Vec2::new((star.pos.x - shift).rem_euclid(width), star.pos.y);
        canvas.fill_circle(pos, star.size, star.rgb(frame));
    }
}

fn draw_hazards(canvas: &mut impl Canvas, hazards: &HazardField) {
    for asteroid in &hazards.asteroids {
        canvas.polygon(&asteroid.vertices(), asteroid.color, false);
    }
    for comet in &hazards.comets {
        let n = comet.trail.len().max(1) as f32;
        for (i, p) in comet.trail.iter().enumerate() {
            let t = (i + 1) as f32 / n;
            canvas.fill_circle(*p, comet.radius * t, scale_color(Color::Rgb(150, 200, 255), t));
        }
        canvas.fill_circle(comet.pos, comet.radius, Color::Rgb(220, 240, 255));
    }
}

fn draw_rocket(canvas: &mut impl Canvas, rocket: &Rocket) {
    for particle in &rocket.particles {
        canvas.fill_circle(particle.pos, particle.size, scale_color(particle.color, particle.fade()));
    }
    for bullet in &rocket.bullets {
        canvas.fill_circle(bullet.pos, bullet.radius, Color::Rgb(255, 255, 120));
    }
    let hull = match rocket.stage() {
        ThrustStage::Idle => Color::Rgb(220, 220, 235),
        ThrustStage::Ignition => Color::Rgb(150, 220, 255),
        ThrustStage::FullBurn => Color::Rgb(100, 230, 255),
    };
    canvas.polygon(&rocket.hull(), hull, true);
}

fn draw_body(canvas: &mut impl Canvas, center: Vec2, radius: f32, planet: &Planet, frame: u64) {
    if planet.is_star {
        let pulse = (frame as f32 * 0.05).sin() * radius * 0.08;
        for ring in 1..=3 {
            let r = radius + ring as f32 * radius * 0.15 + pulse;
            canvas.circle(center, r, scale_color(planet.color, 1.0 - ring as f32 * 0.25));
        }
    }
    canvas.fill_circle(center, radius, planet.color);

    if planet.name == "Jupiter" {
        let spacing = (radius / 5.0).max(2.0);
        let mut dy = -radius + spacing;
        while dy < radius {
            let half = (radius * radius - dy * dy).sqrt();
            let y = center.y + dy;
            canvas.line(Vec2::new(center.x - half, y), Vec2::new(center.x + half, y), shade(planet.color, -35));
            dy += spacing;
        }
    }
    if !planet.is_star {
        let spot = center + Vec2::from_angle(planet.spin.to_radians()) * radius * 0.5;
        canvas.fill_circle(spot, radius * 0.2, shade(planet.color, -25));
    }
    if planet.has_rings {
        draw_rings(canvas, center, radius, planet.spin);
    }
}

fn draw_rings(canvas: &mut impl Canvas, center: Vec2, radius: f32, spin: f32) {
    let tilt = 0.25 + (spin.to_radians()).sin() * 0.05;
    for ring in 0..4 {
        let rx = radius * (1.4 + ring as f32 * 0.12);
        let ry = rx * tilt;
        let points: Vec<Vec2> = (0..48)
            .map(|i| {
                let a = i as f32 / 48.0 * std::f32::consts::TAU;
                center + Vec2::new(a.cos() * rx, a.sin() * ry)
            })
            .collect();
        canvas.polygon(&points, shade(Color::Rgb(210, 190, 140), -(ring as i16) * 15), false);
    }
}

fn draw_solar_system(canvas: &mut impl Canvas, world: &World) {
    draw_stars(canvas, &world.stars, world.frame, 0.0);
    for planet in &world.planets {
        if planet.orbit_radius > 0.0 {
            canvas.polygon(&planet.orbit_outline(96), Color::Rgb(40, 40, 60), false);
        }
    }
    for planet in world.planets.iter().filter(|p| !p.trail.is_empty()) {
        let n = planet.trail.len() as f32;
        for (i, p) in planet.trail.iter().enumerate() {
            canvas.fill_circle(*p, 1.0, scale_color(planet.color, (i + 1) as f32 / n * 0.6));
        }
    }
    for planet in &world.planets {
        draw_body(canvas, planet.pos, planet.radius, planet, world.frame);
    }
    draw_hazards(canvas, &world.hazards);
    draw_rocket(canvas, &world.rocket);

    let near = world
        .planets
        .iter()
        .filter(|p| p.pos.distance(world.rocket.pos) < p.radius + LABEL_RANGE)
        .min_by(|a, b| {
            a.pos
                .distance(world.rocket.pos)
                .total_cmp(&b.pos.distance(world.rocket.pos))
        });
    if let Some(planet) = near {
        let label = Vec2::new(planet.pos.x, planet.pos.y + planet.radius + 14.0);
        canvas.text_centered(&planet.name, Font::Body, TEXT, label);
    }
}

fn draw_buttons(canvas: &mut impl Canvas, buttons: &[SurfaceButton]) {
    for button in buttons {
        canvas.fill_rect(button.rect, button.color);
        canvas.text_centered(&button.label, Font::Title, Color::White, button.rect.center());
    }
}

fn draw_planet_view(canvas: &mut impl Canvas, world: &World, index: usize) {
    let size = canvas.size();
    draw_stars(canvas, &world.stars, world.frame, world.rocket.pos.x / STAR_PARALLAX);
    if let Some(planet) = world.planets.get(index) {
        let center = size / 2.0;
        let radius = planet.radius * SURFACE_SCALE;
        for glow in 1..=2 {
            canvas.circle(center, radius + glow as f32 * 6.0, scale_color(planet.color, 0.5 / glow as f32));
        }
        canvas.fill_circle(center, radius, planet.color);
        for blotch in &world.blotches {
            if blotch.offset.length() + blotch.radius <= radius {
                canvas.fill_circle(center + blotch.offset, blotch.radius, shade(planet.color, blotch.shade));
            }
        }
        if planet.has_rings {
            draw_rings(canvas, center, radius, planet.spin);
        }
        canvas.text_centered(&planet.name, Font::Title, TEXT, Vec2::new(center.x, 40.0));
    }
    draw_buttons(canvas, &world.buttons);
    draw_hazards(canvas, &world.hazards);
    draw_rocket(canvas, &world.rocket);
}

fn draw_quiz(canvas: &mut impl Canvas, world: &World) {
    let size = canvas.size();
    draw_stars(canvas, &world.stars, world.frame, 0.0);
    let Some(quiz) = &world.quiz else {
        return;
    };
    canvas.text_centered(&format!("{} Quiz", quiz.planet), Font::Title, HIGHLIGHT, Vec2::new(size.x / 2.0, 60.0));
    draw_question(canvas, quiz, size);
    draw_buttons(canvas, &world.buttons);
    draw_hazards(canvas, &world.hazards);
    draw_rocket(canvas, &world.rocket);
}

fn draw_question(canvas: &mut impl Canvas, quiz: &QuizSession, size: Vec2) {
    let question = quiz.question();
    let reveal = matches!(quiz.feedback, Feedback::Reveal { .. });
    canvas.text_centered(&question.prompt, Font::Body, TEXT, Vec2::new(size.x / 2.0, size.y / 4.0));

    for (i, (rect, answer)) in answer_rects(size).iter().zip(&question.answers).enumerate() {
        let color = if reveal && i == question.correct {
            RIGHT
        } else {
            ANSWER_BOX
        };
        canvas.fill_rect(*rect, color);
        canvas.stroke_rect(*rect, shade(color, 40));
        canvas.text_centered(answer, Font::Body, Color::White, rect.center());
    }

    let message = match quiz.feedback {
        Feedback::None => None,
        Feedback::Correct { .. } => Some(("Correct!".to_string(), RIGHT)),
        Feedback::Wrong { .. } => Some(("Not quite...".to_string(), WRONG)),
        Feedback::Reveal { .. } => Some((format!("The answer was: {}", question.correct_answer()), HIGHLIGHT)),
    };
    if let Some((text, color)) = message {
        canvas.text_centered(&text, Font::Title, color, Vec2::new(size.x / 2.0, size.y / 2.0 - 10.0));
    }
}

fn draw_info_panel(canvas: &mut impl Canvas, world: &World, index: usize) {
    let size = canvas.size();
    draw_stars(canvas, &world.stars, world.frame, 0.0);
    let Some(entry) = world.planet_entry(index) else {
        return;
    };
    let panel = Rect::new(60.0, 80.0, size.x - 120.0, size.y - 200.0);
    canvas.stroke_rect(panel, entry.rgb());

    let mut facts = entry.facts.iter();
    let title = facts.next().map_or(entry.name.as_str(), String::as_str);
    canvas.text_centered(title, Font::Title, entry.rgb(), Vec2::new(size.x / 2.0, 40.0));

    let step = canvas.line_height() * 1.5;
    let mut y = panel.top() + step;
    for fact in facts {
        for line in wrap_words(fact, FACT_COLUMNS) {
            if y > panel.bottom() - step {
                break;
            }
            canvas.text(&line, Font::Body, TEXT, Vec2::new(panel.left() + 20.0, y));
            y += canvas.line_height();
        }
        y += step - canvas.line_height();
    }
    draw_buttons(canvas, &world.buttons);
    canvas.text_centered(
        "Press ENTER to go back",
        Font::Body,
        DIM_TEXT,
        Vec2::new(size.x / 2.0, size.y - 90.0),
    );
}

fn draw_platformer(canvas: &mut impl Canvas, world: &World, level: &PlatformerLevel) {
    let size = canvas.size();
    let camera = level.camera;
    let tint = world
        .planet_entry(world.mode.planet().unwrap_or_default())
        .map_or(Color::Rgb(120, 120, 120), |p| p.rgb());
    draw_stars(canvas, &world.stars, world.frame, camera.parallax());

    let on_screen = |r: &Rect| r.right() >= camera.x && r.left() <= camera.x + size.x;
    let offset = Vec2::new(-camera.x, 0.0);
    for tile in level.ground.iter().filter(|r| on_screen(r)) {
        canvas.fill_rect(tile.translated(offset), shade(tint, -60));
    }
    for ledge in level.ledges.iter().filter(|r| on_screen(r)) {
        canvas.fill_rect(ledge.translated(offset), shade(tint, -20));
    }
    for button in level.buttons.iter().filter(|b| on_screen(&b.rect)) {
        let color = if button.cooldown > 0 || button.player_on {
            let step = button.glow as f32 / (GLOW_STEPS - 1).max(1) as f32;
            blend(Color::Rgb(255, 180, 60), HIGHLIGHT, (step * 255.0) as u8)
        } else {
            Color::Rgb(255, 140, 40)
        };
        canvas.fill_rect(button.rect.translated(offset), color);
    }
    let exit = level.exit.translated(offset);
    canvas.stroke_rect(exit, RIGHT);
    canvas.text_centered("EXIT", Font::Title, RIGHT, exit.center());

    let walker = &level.walker;
    let rows: &[&str] = match walker.state() {
        WalkerState::Idle => &ASTRONAUT_IDLE,
        WalkerState::Running if (world.frame / 8) % 2 == 0 => &ASTRONAUT_RUN,
        WalkerState::Running => &ASTRONAUT_IDLE,
        WalkerState::Jumping => &ASTRONAUT_JUMP,
    };
    let body = walker.rect.translated(offset);
    canvas.sprite(&Sprite::new(rows).flipped(!walker.facing_right), body, 0.0, Color::White);

    if let Some(bubble) = &level.bubble {
        draw_bubble(canvas, bubble, body);
    }
}

fn draw_bubble(canvas: &mut impl Canvas, bubble: &InfoBubble, anchor: Rect) {
    let size = canvas.size();
    let pad = 12.0;
    let width = canvas.measure(&"M".repeat(BUBBLE_COLUMNS), Font::Body) + pad * 2.0;
    let height = bubble.lines.len() as f32 * canvas.line_height() + pad * 2.0;
    let x = (anchor.center().x - width / 2.0).clamp(10.0, (size.x - width - 10.0).max(10.0));
    let y = (anchor.top() - height - 20.0).max(10.0);
    let frame = Rect::new(x, y, width, height);

    canvas.stroke_rect(frame, blend(BACKGROUND, TEXT, bubble.alpha));
    let text = blend(BACKGROUND, Color::White, bubble.alpha);
    for (i, line) in bubble.visible_lines().iter().enumerate() {
        let pos = Vec2::new(x + pad, y + pad + i as f32 * canvas.line_height());
        canvas.text(line, Font::Body, text, pos);
    }
}

fn draw_gallery(canvas: &mut impl Canvas, world: &World) {
    let size = canvas.size();
    draw_stars(canvas, &world.stars, world.frame, 0.0);
    canvas.text_centered("Development History", Font::Title, HIGHLIGHT, Vec2::new(size.x / 2.0, 60.0));

    let slides = &world.catalog.history;
    match slides.get(world.gallery) {
        None => {
            canvas.text_centered(
                "No history entries found",
                Font::Body,
                DIM_TEXT,
                Vec2::new(size.x / 2.0, size.y / 3.0),
            );
        }
        Some(slide) => {
            let mut y = size.y / 3.0;
            for line in slide.lines().flat_map(|l| wrap_words(l, SLIDE_COLUMNS)) {
                canvas.text_centered(&line, Font::Body, TEXT, Vec2::new(size.x / 2.0, y));
                y += canvas.line_height();
            }
            let page = format!("{} / {}", world.gallery + 1, slides.len());
            canvas.text_centered(&page, Font::Body, DIM_TEXT, Vec2::new(size.x / 2.0, size.y - 60.0));
        }
    }
    canvas.text("<", Font::Title, DIM_TEXT, Vec2::new(10.0, size.y / 2.0));
    canvas.text(">", Font::Title, DIM_TEXT, Vec2::new(size.x - 30.0, size.y / 2.0));
    draw_hazards(canvas, &world.hazards);
    draw_rocket(canvas, &world.rocket);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::content::Catalog;
    use crate::render::braille::BrailleCanvas;
    use ratatui::text::Line;

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(world: &World) -> String {
        let mut canvas = BrailleCanvas::new(150, 50, world.size(), BACKGROUND);
        draw(&mut canvas, world);
        text_of(&canvas.into_lines(1.0))
    }

    fn world(catalog: Catalog) -> World {
        World::new(WorldConfig::default(), catalog, Some(5))
    }

    #[test]
    fn test_every_mode_draws() {
        let mut w = world(Catalog::builtin());
        let earth = w.planets.iter().position(|p| p.name == "Earth").unwrap();
        for mode in [
            Mode::Menu,
            Mode::SolarSystem,
            Mode::PlanetSurface { planet: 0 },
            Mode::PlanetSurface { planet: earth },
            Mode::Quiz { planet: earth },
            Mode::InfoPanel { planet: earth },
            Mode::Platformer { planet: earth },
            Mode::DevGallery,
        ] {
            w.enter(mode);
            let text = render(&w);
            assert!(text.chars().any(|c| c != ' ' && c != '\n'), "{mode:?} drew nothing");
        }
    }

    #[test]
    fn test_quiz_shows_prompt_and_buttons() {
        let mut w = world(Catalog::builtin());
        w.enter(Mode::Quiz { planet: 3 });
        let prompt = w.quiz.as_ref().unwrap().question().prompt.clone();
        let text = render(&w);
        assert!(text.contains(&prompt));
        assert!(text.contains("BACK"));
    }

    #[test]
    fn test_empty_gallery_message() {
        let mut catalog = Catalog::builtin();
        catalog.history.clear();
        let mut w = world(catalog);
        w.enter(Mode::DevGallery);
        assert!(render(&w).contains("No history entries found"));
    }

    #[test]
    fn test_fade_brightness() {
        assert_eq!(fade_brightness(255), 0.0);
        assert_eq!(fade_brightness(0), 1.0);
    }
}
