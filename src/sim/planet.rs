use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use ratatui::style::Color;

use crate::config::OrbitTuning;
use crate::content::PlanetEntry;

/// Fixed-capacity position history. Pushing onto a full buffer evicts the
/// oldest point.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<Vec2>,
    cap: usize,
}

impl TrailBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, p: Vec2) {
        if self.cap == 0 {
            return;
        }
        if self.points.len() == self.cap {
            self.points.pop_front();
        }
        self.points.push_back(p);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub color: Color,
    pub radius: f32,
    pub orbit_radius: f32,
    /// Radians per frame.
    pub angular_speed: f32,
    pub angle: f32,
    pub tilt: f32,
    pub is_star: bool,
    pub has_rings: bool,
    /// Visual rotation in degrees.
    pub spin: f32,
    pub pos: Vec2,
    pub trail: TrailBuffer,
    orbit_center: Vec2,
    spin_rate: f32,
}

impl Planet {
    pub fn from_entry(entry: &PlanetEntry, center: Vec2, orbit: &OrbitTuning, rng: &mut impl Rng) -> Self {
        let angle = if entry.orbit > 0.0 { rng.gen_range(0.0..TAU) } else { 0.0 };
        let mut planet = Self {
            name: entry.name.clone(),
            color: entry.rgb(),
            radius: entry.radius,
            orbit_radius: entry.orbit,
            angular_speed: entry.speed,
            angle,
            tilt: orbit.tilt,
            is_star: entry.is_star,
            has_rings: entry.has_rings,
            spin: 0.0,
            pos: center,
            trail: TrailBuffer::new(orbit.trail_len),
            orbit_center: center,
            spin_rate: orbit.spin_rate,
        };
        planet.pos = planet.position_at(angle);
        planet
    }

    /// Where the planet sits for a given orbit angle.
    pub fn position_at(&self, angle: f32) -> Vec2 {
        Vec2::new(
            self.orbit_center.x + angle.cos() * self.orbit_radius,
            self.orbit_center.y + angle.sin() * self.orbit_radius * self.tilt,
        )
    }

    pub fn update(&mut self) {
        self.angle = (self.angle + self.angular_speed).rem_euclid(TAU);
        self.spin = (self.spin + self.spin_rate).rem_euclid(360.0);
        self.pos = self.position_at(self.angle);
        if self.orbit_radius > 0.0 {
            self.trail.push(self.pos);
        }
    }

    /// Points on the tilted orbit ellipse, for drawing the path.
    pub fn orbit_outline(&self, segments: usize) -> Vec<Vec2> {
        (0..segments)
            .map(|i| self.position_at(i as f32 / segments as f32 * TAU))
            .collect()
    }
}
