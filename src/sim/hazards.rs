use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use ratatui::style::Color;

use crate::config::HazardTuning;
use crate::sim::entity::{self, EntityMut, StepContext};
use crate::sim::motion::{heading_vec, outside, safe_heading_to};
use crate::sim::planet::TrailBuffer;

/// Rejection-sampling attempts for a comet target before falling back to a
/// corner.
const COMET_TARGET_ATTEMPTS: usize = 16;
/// Asteroids aim within this many pixels of the screen centre.
const ASTEROID_AIM_SPREAD: f32 = 200.0;

const ROCK_COLORS: [Color; 3] = [
    Color::Rgb(170, 150, 120),
    Color::Rgb(150, 140, 110),
    Color::Rgb(160, 145, 115),
];

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub pos: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub radius: f32,
    /// Degrees.
    pub rotation: f32,
    pub spin: f32,
    /// Vertex offsets from the centre at zero rotation.
    pub outline: Vec<Vec2>,
    pub color: Color,
}

impl Asteroid {
    pub fn spawn(size: Vec2, tuning: &HazardTuning, rng: &mut impl Rng) -> Self {
        let radius = rng.gen_range(tuning.asteroid_radius.0..=tuning.asteroid_radius.1);
        let pos = edge_point(size, radius, rng);
        let aim = size / 2.0
            + Vec2::new(
                rng.gen_range(-ASTEROID_AIM_SPREAD..=ASTEROID_AIM_SPREAD),
                rng.gen_range(-ASTEROID_AIM_SPREAD..=ASTEROID_AIM_SPREAD),
            );
        let n = rng.gen_range(6..=10);
        let outline = (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * TAU;
                Vec2::new(a.cos(), a.sin()) * radius * rng.gen_range(0.8..=1.2)
            })
            .collect();
        Self {
            pos,
            heading: safe_heading_to(pos, aim, rng.gen_range(0.0..360.0)),
            speed: rng.gen_range(tuning.asteroid_speed.0..=tuning.asteroid_speed.1),
            radius,
            rotation: rng.gen_range(0.0..360.0),
            spin: rng.gen_range(-1.0..=1.0),
            outline,
            color: ROCK_COLORS[rng.gen_range(0..ROCK_COLORS.len())],
        }
    }

    pub fn update(&mut self) {
        self.pos += heading_vec(self.heading) * self.speed;
        self.rotation = (self.rotation + self.spin).rem_euclid(360.0);
    }

    /// Outline in world space with the current rotation applied.
    pub fn vertices(&self) -> Vec<Vec2> {
        let rot = Vec2::from_angle(self.rotation.to_radians());
        self.outline.iter().map(|v| self.pos + rot.rotate(*v)).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Comet {
    pub pos: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub radius: f32,
    pub trail: TrailBuffer,
}

impl Comet {
    pub fn spawn(size: Vec2, tuning: &HazardTuning, rng: &mut impl Rng) -> Self {
        let pos = edge_point(size, 0.0, rng);
        let target = comet_target(size, tuning.comet_avoid_radius, rng);
        Self {
            pos,
            heading: safe_heading_to(pos, target, 0.0),
            speed: rng.gen_range(tuning.comet_speed.0..=tuning.comet_speed.1),
            radius: rng.gen_range(1.0..=3.0),
            trail: TrailBuffer::new(tuning.comet_trail_len),
        }
    }

    pub fn update(&mut self) {
        self.trail.push(self.pos);
        self.pos += heading_vec(self.heading) * self.speed;
    }
}

/// A random point on one of the four screen edges, pushed `inset` outside.
fn edge_point(size: Vec2, inset: f32, rng: &mut impl Rng) -> Vec2 {
    match rng.gen_range(0..4) {
        0 => Vec2::new(rng.gen_range(0.0..size.x), -inset),
        1 => Vec2::new(size.x + inset, rng.gen_range(0.0..size.y)),
        2 => Vec2::new(rng.gen_range(0.0..size.x), size.y + inset),
        _ => Vec2::new(-inset, rng.gen_range(0.0..size.y)),
    }
}

/// A point at least `avoid` pixels from the centre, so comets cross the
/// screen without grazing the Sun.
pub fn comet_target(size: Vec2, avoid: f32, rng: &mut impl Rng) -> Vec2 {
    let center = size / 2.0;
    for _ in 0..COMET_TARGET_ATTEMPTS {
        let p = Vec2::new(rng.gen_range(0.0..size.x), rng.gen_range(0.0..size.y));
        if p.distance(center) >= avoid {
            return p;
        }
    }
    let corners = [Vec2::ZERO, Vec2::new(size.x, 0.0), size, Vec2::new(0.0, size.y)];
    corners[rng.gen_range(0..corners.len())]
}

/// Asteroids and comets drifting across the sky in every mode but the menu.
#[derive(Debug, Clone, Default)]
pub struct HazardField {
    pub asteroids: Vec<Asteroid>,
    pub comets: Vec<Comet>,
    comet_timer: u32,
}

impl HazardField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.asteroids.clear();
        self.comets.clear();
    }

    pub fn update(&mut self, tuning: &HazardTuning, ctx: &mut StepContext) {
        let asteroid_roll = ctx.rng.gen_bool(tuning.asteroid_spawn_chance.clamp(0.0, 1.0));
        if self.asteroids.len() < tuning.max_asteroids && asteroid_roll {
            let asteroid = Asteroid::spawn(ctx.size, tuning, ctx.rng);
            log::debug!("Asteroid spawned at ({:.0}, {:.0})", asteroid.pos.x, asteroid.pos.y);
            self.asteroids.push(asteroid);
        }

        if self.comet_timer > 0 {
            self.comet_timer -= 1;
        } else if self.comets.len() < tuning.max_comets
            && ctx.rng.gen_bool(tuning.comet_spawn_chance.clamp(0.0, 1.0))
        {
            self.comets.push(Comet::spawn(ctx.size, tuning, ctx.rng));
            let (lo, hi) = tuning.comet_spawn_delay;
            self.comet_timer = ctx.rng.gen_range(lo..=hi.max(lo));
            log::debug!("Comet spawned, next in {} frames", self.comet_timer);
        }

        for asteroid in &mut self.asteroids {
            entity::update(EntityMut::Asteroid(asteroid), ctx);
        }
        for comet in &mut self.comets {
            entity::update(EntityMut::Comet(comet), ctx);
        }

        let size = ctx.size;
        self.asteroids.retain(|a| !outside(a.pos, size, tuning.asteroid_margin));
        self.comets.retain(|c| !outside(c.pos, size, tuning.comet_margin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIZE: Vec2 = Vec2::new(1200.0, 800.0);

    #[test]
    fn test_asteroid_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        let tuning = HazardTuning::default();
        for _ in 0..50 {
            let a = Asteroid::spawn(SIZE, &tuning, &mut rng);
            assert!((6..=10).contains(&a.outline.len()));
            assert!((15.0..=30.0).contains(&a.radius));
            for v in &a.outline {
                let r = v.length();
                assert!(r >= a.radius * 0.8 - 1e-3 && r <= a.radius * 1.2 + 1e-3);
            }
        }
    }

    #[test]
    fn test_asteroid_heads_toward_center() {
        let mut rng = StdRng::seed_from_u64(22);
        let tuning = HazardTuning::default();
        for _ in 0..50 {
            let mut a = Asteroid::spawn(SIZE, &tuning, &mut rng);
            let before = a.pos.distance(SIZE / 2.0);
            a.update();
            assert!(a.pos.distance(SIZE / 2.0) < before);
        }
    }

    #[test]
    fn test_comet_target_avoids_center() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..200 {
            let t = comet_target(SIZE, 200.0, &mut rng);
            assert!(t.distance(SIZE / 2.0) >= 200.0);
        }
        // Nothing on screen is far enough, so only the corner fallback is left.
        let t = comet_target(Vec2::new(10.0, 10.0), 1000.0, &mut rng);
        assert!(t.x == 0.0 || t.x == 10.0);
    }

    #[test]
    fn test_field_respects_caps() {
        let config = WorldConfig::default();
        let tuning = HazardTuning {
            asteroid_spawn_chance: 1.0,
            comet_spawn_chance: 1.0,
            comet_spawn_delay: (0, 0),
            ..HazardTuning::default()
        };
        let mut rng = StdRng::seed_from_u64(24);
        let mut field = HazardField::new();
        for _ in 0..300 {
            let mut ctx = StepContext::new(&config, &mut rng);
            field.update(&tuning, &mut ctx);
            assert!(field.asteroids.len() <= tuning.max_asteroids);
            assert!(field.comets.len() <= tuning.max_comets);
        }
        assert!(!field.asteroids.is_empty());
    }

    #[test]
    fn test_comet_trail_capped() {
        let mut rng = StdRng::seed_from_u64(25);
        let mut c = Comet::spawn(SIZE, &HazardTuning::default(), &mut rng);
        for _ in 0..100 {
            c.update();
        }
        assert_eq!(c.trail.len(), 20);
    }
}
