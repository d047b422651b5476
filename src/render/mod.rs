//! Drawing boundary between the simulation and the terminal.
//!
//! Scenes are written against [`Canvas`] in world pixels; [`braille::BrailleCanvas`]
//! is the terminal implementation.

pub mod braille;
pub mod scenes;

use glam::Vec2;
use ratatui::style::Color;

use crate::sim::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Body,
    Title,
}

/// A one-bit bitmap. Each `#` in `rows` is a lit pixel.
#[derive(Debug, Clone, Copy)]
pub struct Sprite<'a> {
    pub rows: &'a [&'a str],
    pub flip_x: bool,
}

impl<'a> Sprite<'a> {
    pub const fn new(rows: &'a [&'a str]) -> Self {
        Self { rows, flip_x: false }
    }

    pub fn flipped(self, flip_x: bool) -> Self {
        Self { flip_x, ..self }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether the pixel at column `x`, row `y` is lit.
    pub fn lit(&self, x: usize, y: usize) -> bool {
        let width = self.width();
        if x >= width {
            return false;
        }
        let x = if self.flip_x { width - 1 - x } else { x };
        self.rows
            .get(y)
            .and_then(|row| row.chars().nth(x))
            .is_some_and(|c| c == '#')
    }
}

pub trait Canvas {
    /// World size the canvas maps onto its surface.
    fn size(&self) -> Vec2;
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn polygon(&mut self, points: &[Vec2], color: Color, filled: bool);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Draw `sprite` scaled into `dest`, rotated by `rotation` degrees about its centre.
    fn sprite(&mut self, sprite: &Sprite, dest: Rect, rotation: f32, color: Color);
    /// Draw `text` with its top-left corner at `pos`.
    fn text(&mut self, text: &str, font: Font, color: Color, pos: Vec2);
    /// Width `text` occupies in world pixels.
    fn measure(&self, text: &str, font: Font) -> f32;
    /// Height of one text line in world pixels.
    fn line_height(&self) -> f32;

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let segments = 48;
        let points: Vec<Vec2> = (0..segments)
            .map(|i| center + Vec2::from_angle(i as f32 / segments as f32 * std::f32::consts::TAU) * radius)
            .collect();
        self.polygon(&points, color, false);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.polygon(&corners(rect), color, true);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.polygon(&corners(rect), color, false);
    }

    fn text_centered(&mut self, text: &str, font: Font, color: Color, center: Vec2) {
        let w = self.measure(text, font);
        let h = self.line_height();
        self.text(text, font, color, Vec2::new(center.x - w / 2.0, center.y - h / 2.0));
    }
}

fn corners(rect: Rect) -> [Vec2; 4] {
    [
        Vec2::new(rect.left(), rect.top()),
        Vec2::new(rect.right(), rect.top()),
        Vec2::new(rect.right(), rect.bottom()),
        Vec2::new(rect.left(), rect.bottom()),
    ]
}

/// Multiply an RGB color by `factor`, saturating at white.
pub fn scale_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}

/// Shift every channel of an RGB color by `delta`.
pub fn shade(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = |c: u8| (c as i16 + delta).clamp(0, 255) as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}

/// Blend `over` onto `under` with opacity `alpha` (0 shows only `under`).
pub fn blend(under: Color, over: Color, alpha: u8) -> Color {
    match (under, over) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let a = alpha as f32 / 255.0;
            let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * a).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if alpha >= 128 => over,
        _ => under,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_flip() {
        let rows = ["#..", "..#"];
        let s = Sprite::new(&rows);
        assert_eq!((s.width(), s.height()), (3, 2));
        assert!(s.lit(0, 0));
        assert!(!s.lit(2, 0));
        let f = s.flipped(true);
        assert!(f.lit(2, 0));
        assert!(f.lit(0, 1));
        assert!(!f.lit(5, 0));
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(scale_color(Color::Rgb(100, 200, 50), 2.0), Color::Rgb(200, 255, 100));
        assert_eq!(shade(Color::Rgb(10, 250, 100), 20), Color::Rgb(30, 255, 120));
        assert_eq!(blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 0), 0), Color::Rgb(0, 0, 0));
        assert_eq!(blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 0), 255), Color::Rgb(200, 100, 0));
        assert_eq!(scale_color(Color::Red, 0.5), Color::Red);
    }
}
