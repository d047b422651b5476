use glam::Vec2;
use ratatui::style::Color;

use crate::sim::collision::Rect;

/// Characters revealed per frame by the typewriter effect.
const REVEAL_PER_FRAME: usize = 2;
const FADE_STEP: u8 = 5;
/// Frames a finished bubble stays up after the player steps off its button.
const DISPLAY_FRAMES: u32 = 90;
/// Frames between glow animation steps.
const GLOW_PERIOD: u32 = 5;
pub const GLOW_STEPS: usize = 5;
/// Wrap width of bubble text, in characters.
pub const BUBBLE_COLUMNS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Facts,
    Quiz,
    Explore,
    Back,
}

/// A rectangle the rocket flies into to press it.
#[derive(Debug, Clone)]
pub struct SurfaceButton {
    pub rect: Rect,
    pub kind: ButtonKind,
    pub label: String,
    pub color: Color,
}

impl SurfaceButton {
    pub fn new(rect: Rect, kind: ButtonKind, label: &str, color: Color) -> Self {
        Self {
            rect,
            kind,
            label: label.to_string(),
            color,
        }
    }
}

pub fn back_button(size: Vec2) -> SurfaceButton {
    SurfaceButton::new(
        Rect::new(size.x / 2.0 - 100.0, size.y - 60.0, 200.0, 40.0),
        ButtonKind::Back,
        "BACK",
        Color::Rgb(100, 100, 200),
    )
}

/// Buttons on a planet view. Stars cannot be explored on foot.
pub fn surface_buttons(size: Vec2, is_star: bool) -> Vec<SurfaceButton> {
    let mut buttons = vec![
        SurfaceButton::new(
            Rect::new(20.0, 20.0, 100.0, 40.0),
            ButtonKind::Facts,
            "FACTS",
            Color::Rgb(100, 200, 100),
        ),
        SurfaceButton::new(
            Rect::new(size.x - 120.0, 20.0, 100.0, 40.0),
            ButtonKind::Quiz,
            "QUIZ",
            Color::Rgb(200, 100, 100),
        ),
    ];
    if !is_star {
        buttons.push(SurfaceButton::new(
            Rect::new(20.0, size.y - 60.0, 120.0, 40.0),
            ButtonKind::Explore,
            "EXPLORE",
            Color::Rgb(200, 160, 60),
        ));
    }
    buttons.push(back_button(size));
    buttons
}

/// A floor switch in the platformer that shows one paragraph when stepped on.
#[derive(Debug, Clone)]
pub struct InfoButton {
    pub rect: Rect,
    /// Index of the paragraph this button shows.
    pub fact: usize,
    pub cooldown: u32,
    pub player_on: bool,
    pub glow: usize,
    glow_timer: u32,
}

impl InfoButton {
    pub fn new(rect: Rect, fact: usize) -> Self {
        Self {
            rect,
            fact,
            cooldown: 0,
            player_on: false,
            glow: 0,
            glow_timer: 0,
        }
    }

    pub fn update(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.glow_timer += 1;
        if self.glow_timer > GLOW_PERIOD {
            self.glow_timer = 0;
            self.glow = (self.glow + 1) % GLOW_STEPS;
        }
    }
}

/// Typewriter text bubble raised by an [`InfoButton`].
#[derive(Debug, Clone)]
pub struct InfoBubble {
    pub lines: Vec<String>,
    /// Characters shown so far, counted across all lines.
    pub revealed: usize,
    pub alpha: u8,
    pub source: usize,
    pub active: bool,
    total: usize,
    fading: bool,
    display_timer: u32,
}

impl InfoBubble {
    pub fn new(text: &str, source: usize) -> Self {
        let lines = wrap_words(text, BUBBLE_COLUMNS);
        let total = lines.iter().map(|l| l.chars().count()).sum();
        Self {
            lines,
            revealed: 0,
            alpha: 0,
            source,
            active: true,
            total,
            fading: false,
            display_timer: 0,
        }
    }

    pub fn done_typing(&self) -> bool {
        self.revealed >= self.total
    }

    /// `player_on_source` is whether the player still stands on the button
    /// that raised this bubble.
    pub fn update(&mut self, player_on_source: bool) {
        if !self.active {
            return;
        }
        if !self.fading {
            self.alpha = self.alpha.saturating_add(FADE_STEP);
        }
        if !self.done_typing() {
            self.revealed = (self.revealed + REVEAL_PER_FRAME).min(self.total);
            return;
        }
        if !player_on_source {
            self.fading = true;
        }
        if self.fading {
            if self.display_timer < DISPLAY_FRAMES {
                self.display_timer += 1;
            } else {
                self.alpha = self.alpha.saturating_sub(FADE_STEP);
                if self.alpha == 0 {
                    self.active = false;
                }
            }
        }
    }

    /// Lines with only the revealed prefix of text.
    pub fn visible_lines(&self) -> Vec<String> {
        let mut budget = self.revealed;
        let mut out = Vec::new();
        for line in &self.lines {
            if budget == 0 {
                break;
            }
            let n = line.chars().count().min(budget);
            out.push(line.chars().take(n).collect());
            budget -= n;
        }
        out
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_has_no_explore() {
        let size = Vec2::new(1200.0, 800.0);
        let star = surface_buttons(size, true);
        assert!(star.iter().all(|b| b.kind != ButtonKind::Explore));
        let planet = surface_buttons(size, false);
        assert!(planet.iter().any(|b| b.kind == ButtonKind::Explore));
        assert_eq!(planet.last().map(|b| b.kind), Some(ButtonKind::Back));
    }

    #[test]
    fn test_surface_buttons_clear_of_anchor() {
        let size = Vec2::new(1200.0, 800.0);
        let rocket = Rect::around(Vec2::new(600.0, 200.0), 20.0);
        for b in surface_buttons(size, false) {
            assert!(!b.rect.overlaps(&rocket), "{} overlaps the spawn point", b.label);
        }
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap_words("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(wrap_words("", 10).is_empty());
        assert_eq!(wrap_words("supercalifragilistic ok", 5), vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_bubble_types_then_fades() {
        let mut bubble = InfoBubble::new("Earth has one moon.", 0);
        bubble.update(true);
        assert_eq!(bubble.revealed, 2);
        assert_eq!(bubble.visible_lines(), vec!["Ea".to_string()]);
        for _ in 0..20 {
            bubble.update(true);
        }
        assert!(bubble.done_typing());
        // Stays up while the player stands on the button.
        for _ in 0..500 {
            bubble.update(true);
        }
        assert!(bubble.active);
        assert_eq!(bubble.alpha, 255);
        // Then holds for the display time and fades out.
        for _ in 0..DISPLAY_FRAMES {
            bubble.update(false);
        }
        assert_eq!(bubble.alpha, 255);
        for _ in 0..51 {
            bubble.update(false);
        }
        assert!(!bubble.active);
    }

    #[test]
    fn test_button_cooldown_and_glow() {
        let mut b = InfoButton::new(Rect::new(0.0, 0.0, 48.0, 24.0), 0);
        b.cooldown = 2;
        b.update();
        b.update();
        b.update();
        assert_eq!(b.cooldown, 0);
        for _ in 0..6 * GLOW_STEPS as u32 {
            b.update();
        }
        assert!(b.glow < GLOW_STEPS);
    }
}
