use glam::Vec2;
use rand::Rng;

use crate::config::BulletTuning;
use crate::sim::motion::{heading_vec, normalize_heading};

#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    /// Degrees.
    pub heading: f32,
    pub speed: f32,
    pub life: u32,
    pub bounces: u32,
    pub radius: f32,
    /// Set when a wall is hit after the last allowed bounce.
    pub spent: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, heading: f32, tuning: &BulletTuning) -> Self {
        Self {
            pos,
            heading,
            speed: tuning.speed,
            life: tuning.lifetime,
            bounces: 0,
            radius: tuning.radius,
            spent: false,
        }
    }

    pub fn alive(&self) -> bool {
        self.life > 0 && !self.spent
    }

    pub fn update(&mut self, size: Vec2, tuning: &BulletTuning, rng: &mut impl Rng) {
        self.pos += heading_vec(self.heading) * self.speed;
        self.life = self.life.saturating_sub(1);

        if self.pos.x <= 0.0 || self.pos.x >= size.x {
            self.pos.x = self.pos.x.clamp(0.0, size.x);
            self.bounce(180.0 - self.heading, tuning, rng);
        }
        if self.pos.y <= 0.0 || self.pos.y >= size.y {
            self.pos.y = self.pos.y.clamp(0.0, size.y);
            self.bounce(-self.heading, tuning, rng);
        }
        self.heading = normalize_heading(self.heading);
    }

    fn bounce(&mut self, reflected: f32, tuning: &BulletTuning, rng: &mut impl Rng) {
        if self.bounces >= tuning.max_bounces {
            self.spent = true;
            return;
        }
        self.bounces += 1;
        self.heading = reflected + rng.gen_range(-5.0..5.0);
        self.speed = (tuning.speed * tuning.bounce_decay.powi(self.bounces as i32)).max(tuning.min_speed);
    }
}
