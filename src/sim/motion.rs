use glam::Vec2;

/// Below this distance a direction vector is treated as degenerate.
pub const MIN_HEADING_DISTANCE: f32 = 1e-3;

/// Unit vector for a heading in degrees (0° points right, 90° points down).
#[inline]
pub fn heading_vec(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(r.cos(), r.sin())
}

/// Heading in degrees from `from` toward `to`, or `fallback` when the two
/// points are closer than [`MIN_HEADING_DISTANCE`].
#[inline]
pub fn safe_heading_to(from: Vec2, to: Vec2, fallback: f32) -> f32 {
    let d = to - from;
    if d.length() < MIN_HEADING_DISTANCE || !d.is_finite() {
        return fallback;
    }
    d.y.atan2(d.x).to_degrees()
}

/// Wrap a heading into [0, 360).
#[inline]
pub fn normalize_heading(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// How a body is kept inside the world each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Toroidal: leaving one edge re-enters at the opposite edge.
    Wrap,
    /// Clamped to `[0, size]` on both axes.
    Clamp,
}

impl Bounds {
    pub fn apply(self, pos: Vec2, size: Vec2) -> Vec2 {
        match self {
            Bounds::Wrap => Vec2::new(wrap_axis(pos.x, size.x), wrap_axis(pos.y, size.y)),
            Bounds::Clamp => pos.clamp(Vec2::ZERO, size),
        }
    }
}

/// `rem_euclid` can return exactly `max` for tiny negative inputs due to
/// rounding, so fold that case back to zero.
#[inline]
pub fn wrap_axis(v: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(max);
    if w >= max {
        0.0
    } else {
        w
    }
}

/// True when `pos` is further than `margin` outside the `[0, size]` box.
#[inline]
pub fn outside(pos: Vec2, size: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.x > size.x + margin || pos.y < -margin || pos.y > size.y + margin
}
