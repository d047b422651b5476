//! The two collision primitives used everywhere: circle-circle and
//! axis-aligned rectangle overlap. Both use strict comparisons, so shapes
//! that exactly touch do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Axis-aligned rectangle, top-left origin, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * half` centred on `center`.
    pub fn around(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

/// Index of the first candidate that satisfies `hit`, in declaration order.
/// Later matches are left for a later frame.
pub fn first_hit<T>(candidates: &[T], mut hit: impl FnMut(&T) -> bool) -> Option<usize> {
    candidates.iter().position(|c| hit(c))
}
