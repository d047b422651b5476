use glam::Vec2;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::{scale_color, Canvas, Font, Sprite};
use crate::sim::collision::Rect;

const BRAILLE_BASE: u32 = 0x2800;

#[derive(Debug, Clone, Copy)]
struct Cell {
    bits: u8,
    fg: Color,
    glyph: Option<(char, Style)>,
}

/// Canvas over a grid of terminal cells, each holding a 2×4 braille dot block.
///
/// World pixels are scaled so the whole world fits the grid. Dots drawn into
/// the same cell merge; the cell takes the color of the last dot.
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    world: Vec2,
    /// Dots per world pixel on each axis.
    scale: Vec2,
    bg: Color,
    cells: Vec<Cell>,
}

impl BrailleCanvas {
    pub fn new(cols: usize, rows: usize, world: Vec2, bg: Color) -> Self {
        let scale = Vec2::new(
            (cols * 2) as f32 / world.x.max(1.0),
            (rows * 4) as f32 / world.y.max(1.0),
        );
        let empty = Cell {
            bits: 0,
            fg: bg,
            glyph: None,
        };
        Self {
            cols,
            rows,
            world,
            scale,
            bg,
            cells: vec![empty; cols * rows],
        }
    }

    fn dots(&self) -> (i32, i32) {
        ((self.cols * 2) as i32, (self.rows * 4) as i32)
    }

    fn to_dot(&self, p: Vec2) -> (i32, i32) {
        ((p.x * self.scale.x).floor() as i32, (p.y * self.scale.y).floor() as i32)
    }

    /// World position of the centre of dot (`bx`, `by`).
    fn dot_center(&self, bx: i32, by: i32) -> Vec2 {
        Vec2::new(
            (bx as f32 + 0.5) / self.scale.x,
            (by as f32 + 0.5) / self.scale.y,
        )
    }

    fn set_dot(&mut self, bx: i32, by: i32, color: Color) {
        let (bw, bh) = self.dots();
        if bx < 0 || by < 0 || bx >= bw || by >= bh {
            return;
        }
        let (cx, cy) = (bx as usize / 2, by as usize / 4);
        let cell = &mut self.cells[cy * self.cols + cx];
        if cell.glyph.take().is_some() {
            cell.bits = 0;
        }
        cell.bits |= braille_bit(bx as usize % 2, by as usize % 4);
        cell.fg = color;
    }

    /// Fill dot row `by` from `bx0` to `bx1` inclusive.
    fn span(&mut self, by: i32, bx0: i32, bx1: i32, color: Color) {
        let (bw, _) = self.dots();
        for bx in bx0.max(0)..=bx1.min(bw - 1) {
            self.set_dot(bx, by, color);
        }
    }

    fn row_range(&self, top: f32, bottom: f32) -> std::ops::RangeInclusive<i32> {
        let (_, bh) = self.dots();
        let first = ((top * self.scale.y).floor() as i32).max(0);
        let last = ((bottom * self.scale.y).ceil() as i32).min(bh - 1);
        first..=last
    }

    pub fn into_lines(self, brightness: f32) -> Vec<Line<'static>> {
        let base = Style::default().bg(self.bg);
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| match cell.glyph {
                        Some((ch, style)) => {
                            let fg = style.fg.map(|c| scale_color(c, brightness));
                            Span::styled(String::from(ch), Style { fg, ..style })
                        }
                        None if cell.bits == 0 => Span::styled(" ", base),
                        None => {
                            let ch = char::from_u32(BRAILLE_BASE + cell.bits as u32).unwrap_or(' ');
                            Span::styled(String::from(ch), base.fg(scale_color(cell.fg, brightness)))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    #[cfg(test)]
    fn char_at(&self, col: usize, row: usize) -> char {
        let cell = &self.cells[row * self.cols + col];
        match cell.glyph {
            Some((ch, _)) => ch,
            None if cell.bits == 0 => ' ',
            None => char::from_u32(BRAILLE_BASE + cell.bits as u32).unwrap_or(' '),
        }
    }

    #[cfg(test)]
    fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.bits != 0 || c.glyph.is_some()).count()
    }
}

impl Canvas for BrailleCanvas {
    fn size(&self) -> Vec2 {
        self.world
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        for by in self.row_range(center.y - radius, center.y + radius) {
            let dy = self.dot_center(0, by).y - center.y;
            if dy.abs() > radius {
                continue;
            }
            let half = (radius * radius - dy * dy).sqrt();
            let (bx0, _) = self.to_dot(Vec2::new(center.x - half, 0.0));
            let (bx1, _) = self.to_dot(Vec2::new(center.x + half, 0.0));
            self.span(by, bx0, bx1, color);
        }
        // Anything smaller than a dot still shows up.
        let (bx, by) = self.to_dot(center);
        self.set_dot(bx, by, color);
    }

    fn polygon(&mut self, points: &[Vec2], color: Color, filled: bool) {
        if points.is_empty() {
            return;
        }
        if filled && points.len() > 2 {
            let top = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
            let bottom = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
            let mut crossings = Vec::new();
            for by in self.row_range(top, bottom) {
                let y = self.dot_center(0, by).y;
                crossings.clear();
                for (i, a) in points.iter().enumerate() {
                    let b = points[(i + 1) % points.len()];
                    if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                        crossings.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                    }
                }
                crossings.sort_by(f32::total_cmp);
                for pair in crossings.chunks_exact(2) {
                    let (bx0, _) = self.to_dot(Vec2::new(pair[0], y));
                    let (bx1, _) = self.to_dot(Vec2::new(pair[1], y));
                    self.span(by, bx0, bx1, color);
                }
            }
        }
        for (i, &a) in points.iter().enumerate() {
            self.line(a, points[(i + 1) % points.len()], color);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (bw, bh) = self.dots();
        let (x0, y0) = self.to_dot(from);
        let (x1, y1) = self.to_dot(to);
        // Skip segments entirely off one side so huge shapes stay cheap.
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= bw && x1 >= bw) || (y0 >= bh && y1 >= bh) {
            return;
        }
        for (bx, by) in line_dots(x0, y0, x1, y1) {
            self.set_dot(bx, by, color);
        }
    }

    fn sprite(&mut self, sprite: &Sprite, dest: Rect, rotation: f32, color: Color) {
        let (sw, sh) = (sprite.width(), sprite.height());
        if sw == 0 || sh == 0 || dest.w <= 0.0 || dest.h <= 0.0 {
            return;
        }
        let center = dest.center();
        let reach = Vec2::new(dest.w, dest.h).length() / 2.0;
        let (bx0, by0) = self.to_dot(center - Vec2::splat(reach));
        let (bx1, by1) = self.to_dot(center + Vec2::splat(reach));
        let (bw, bh) = self.dots();
        let unrotate = Vec2::from_angle(-rotation.to_radians());
        for by in by0.max(0)..=by1.min(bh - 1) {
            for bx in bx0.max(0)..=bx1.min(bw - 1) {
                let local = unrotate.rotate(self.dot_center(bx, by) - center);
                let u = (local.x + dest.w / 2.0) / dest.w * sw as f32;
                let v = (local.y + dest.h / 2.0) / dest.h * sh as f32;
                if u < 0.0 || v < 0.0 {
                    continue;
                }
                if sprite.lit(u as usize, v as usize) {
                    self.set_dot(bx, by, color);
                }
            }
        }
    }

    fn text(&mut self, text: &str, font: Font, color: Color, pos: Vec2) {
        let (bx, by) = self.to_dot(pos);
        let (col, row) = (bx.div_euclid(2), by.div_euclid(4));
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let mut style = Style::default().fg(color);
        if font == Font::Title {
            style = style.add_modifier(Modifier::BOLD);
        }
        let chars: Box<dyn Iterator<Item = char>> = match font {
            Font::Title => Box::new(text.chars().flat_map(char::to_uppercase)),
            Font::Body => Box::new(text.chars()),
        };
        for (i, ch) in chars.enumerate() {
            let c = col + i as i32;
            if c < 0 {
                continue;
            }
            if c as usize >= self.cols {
                break;
            }
            let cell = &mut self.cells[row as usize * self.cols + c as usize];
            // Text over a solid block reads as a label on that block.
            let bg = if cell.glyph.is_none() && cell.bits.count_ones() >= 6 {
                cell.fg
            } else {
                self.bg
            };
            cell.glyph = Some((ch, style.bg(bg)));
            cell.bits = 0;
        }
    }

    fn measure(&self, text: &str, _font: Font) -> f32 {
        text.chars().count() as f32 * 2.0 / self.scale.x
    }

    fn line_height(&self) -> f32 {
        4.0 / self.scale.y
    }
}

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// Bresenham line from (`x0`, `y0`) to (`x1`, `y1`), endpoints included.
fn line_dots(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut dots = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        dots.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    dots
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::Rgb(5, 5, 15);

    /// 10×5 cells = 20×20 dots over a 200×200 world, so one dot is 10 px.
    fn canvas() -> BrailleCanvas {
        BrailleCanvas::new(10, 5, Vec2::new(200.0, 200.0), BG)
    }

    #[test]
    fn test_braille_bits_are_distinct() {
        let mut all = 0u8;
        for x in 0..2 {
            for y in 0..4 {
                let bit = braille_bit(x, y);
                assert_eq!(all & bit, 0);
                all |= bit;
            }
        }
        assert_eq!(all, 0xFF);
    }

    #[test]
    fn test_line_dots_endpoints() {
        let dots = line_dots(0, 0, 5, 2);
        assert_eq!(dots.first(), Some(&(0, 0)));
        assert_eq!(dots.last(), Some(&(5, 2)));
        assert_eq!(dots.len(), 6);
    }

    #[test]
    fn test_horizontal_line_fills_top_dot_row() {
        let mut c = canvas();
        c.line(Vec2::new(0.0, 0.0), Vec2::new(199.0, 0.0), Color::White);
        for col in 0..10 {
            assert_eq!(c.char_at(col, 0), '\u{2809}');
        }
        assert_eq!(c.char_at(0, 1), ' ');
    }

    #[test]
    fn test_filled_circle_stays_inside() {
        let mut c = canvas();
        c.fill_circle(Vec2::new(100.0, 100.0), 40.0, Color::Yellow);
        assert_eq!(c.char_at(5, 2), '\u{28FF}');
        assert_eq!(c.char_at(0, 0), ' ');
        assert_eq!(c.char_at(9, 4), ' ');
    }

    #[test]
    fn test_offscreen_shapes_draw_nothing() {
        let mut c = canvas();
        c.fill_circle(Vec2::new(-500.0, -500.0), 30.0, Color::Red);
        c.polygon(
            &[Vec2::new(1e6, 1e6), Vec2::new(2e6, 1e6), Vec2::new(2e6, 2e6)],
            Color::Red,
            true,
        );
        c.line(Vec2::new(-10.0, 300.0), Vec2::new(500.0, 300.0), Color::Red);
        assert_eq!(c.lit_cells(), 0);
    }

    #[test]
    fn test_huge_shape_clips_to_grid() {
        let mut c = canvas();
        c.fill_circle(Vec2::new(100.0, 100.0), 5000.0, Color::Blue);
        assert_eq!(c.lit_cells(), 50);
        let lines = c.into_lines(1.0);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.spans.len() == 10));
    }

    #[test]
    fn test_filled_polygon() {
        let mut c = canvas();
        c.fill_rect(Rect::new(40.0, 40.0, 80.0, 80.0), Color::Green);
        assert_eq!(c.char_at(3, 2), '\u{28FF}');
        assert_eq!(c.char_at(8, 0), ' ');
    }

    #[test]
    fn test_text_on_block_takes_block_color() {
        let mut c = canvas();
        c.fill_rect(Rect::new(0.0, 0.0, 200.0, 40.0), Color::Rgb(200, 100, 100));
        c.text("quiz", Font::Title, Color::White, Vec2::new(20.0, 0.0));
        assert_eq!(c.char_at(1, 0), 'Q');
        assert_eq!(c.char_at(4, 0), 'Z');
        let cell = c.cells[1];
        assert_eq!(cell.glyph.and_then(|(_, s)| s.bg), Some(Color::Rgb(200, 100, 100)));
        // Text past the right edge is cut off.
        c.text("overflowing", Font::Body, Color::White, Vec2::new(180.0, 80.0));
        assert_eq!(c.char_at(9, 2), 'o');
    }

    #[test]
    fn test_sprite_rotation() {
        let rows = ["####", "....", "....", "...."];
        let sprite = Sprite::new(&rows);
        let mut c = canvas();
        c.sprite(&sprite, Rect::new(60.0, 60.0, 80.0, 80.0), 0.0, Color::White);
        // Unrotated: lit band along the top of the rect.
        assert_ne!(c.char_at(3, 1), ' ');
        assert_eq!(c.char_at(3, 3), ' ');

        let mut c = canvas();
        c.sprite(&sprite, Rect::new(60.0, 60.0, 80.0, 80.0), 180.0, Color::White);
        assert_eq!(c.char_at(3, 1), ' ');
        assert_ne!(c.char_at(3, 3), ' ');
    }

    #[test]
    fn test_measure_matches_cells() {
        let c = canvas();
        assert!((c.measure("abc", Font::Body) - 60.0).abs() < 1e-3);
        assert!((c.line_height() - 40.0).abs() < 1e-3);
    }
}
