use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;

use crate::config::{BulletTuning, RocketTuning};
use crate::sim::bullet::Bullet;
use crate::sim::collision::Rect;
use crate::sim::motion::{heading_vec, Bounds};

const FIRE_COLORS: [Color; 4] = [
    Color::Rgb(255, 69, 0),
    Color::Rgb(255, 165, 0),
    Color::Rgb(255, 215, 0),
    Color::Rgb(255, 255, 255),
];

/// Frames of continuous thrust before the flame switches to its third stage.
const STAGE_THREE_FRAMES: u32 = 120;

/// Held-key flags for one frame of flight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust_forward: bool,
    pub thrust_backward: bool,
    pub fire: bool,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    pub life: f32,
    pub max_life: f32,
    pub fade_rate: f32,
}

impl Particle {
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.life -= self.fade_rate;
        self.size = (self.size - 0.1).max(0.1);
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }

    /// Remaining life in 0..=1, for fading.
    pub fn fade(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Flame stage used when drawing the exhaust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrustStage {
    Idle,
    Ignition,
    FullBurn,
}

#[derive(Debug, Clone)]
pub struct Rocket {
    pub pos: Vec2,
    /// Degrees, 0 points right.
    pub heading: f32,
    pub speed: f32,
    pub size: f32,
    pub particles: Vec<Particle>,
    pub bullets: Vec<Bullet>,
    pub shoot_cooldown: u32,
    pub thrusting: bool,
    thrust_frames: u32,
    tuning: RocketTuning,
    bullet_tuning: BulletTuning,
}

impl Rocket {
    pub fn new(pos: Vec2, tuning: RocketTuning, bullet_tuning: BulletTuning) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            size: tuning.size,
            particles: Vec::new(),
            bullets: Vec::new(),
            shoot_cooldown: 0,
            thrusting: false,
            thrust_frames: 0,
            tuning,
            bullet_tuning,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.tuning.max_speed
    }

    /// Teleport and stop. Bullets and particles keep flying.
    pub fn reposition(&mut self, pos: Vec2) {
        self.pos = pos;
        self.speed = 0.0;
    }

    /// Bounding square used against buttons and quiz answers.
    pub fn bounds_rect(&self) -> Rect {
        Rect::around(self.pos, self.size)
    }

    pub fn stage(&self) -> ThrustStage {
        if !self.thrusting {
            ThrustStage::Idle
        } else if self.thrust_frames < STAGE_THREE_FRAMES {
            ThrustStage::Ignition
        } else {
            ThrustStage::FullBurn
        }
    }

    /// Steer, fire and move the hull. Bullets and exhaust are advanced
    /// separately through [`crate::sim::entity::update`].
    pub fn update(&mut self, controls: &Controls, bounds: Bounds, size: Vec2, rng: &mut impl Rng) {
        if controls.rotate_left {
            self.heading -= self.tuning.turn_rate;
        }
        if controls.rotate_right {
            self.heading += self.tuning.turn_rate;
        }

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
        if controls.fire && self.shoot_cooldown == 0 {
            self.bullets.push(Bullet::new(self.pos, self.heading, &self.bullet_tuning));
            self.shoot_cooldown = self.tuning.shoot_delay;
        }

        let max = self.tuning.max_speed;
        if controls.thrust_forward {
            self.speed = (self.speed + self.tuning.acceleration).min(max);
            self.engage_thrust();
            self.emit_exhaust(false, rng);
        } else if controls.thrust_backward {
            self.speed = (self.speed - self.tuning.acceleration).max(-max);
            self.engage_thrust();
            self.emit_exhaust(true, rng);
        } else {
            self.thrusting = false;
            self.thrust_frames = 0;
            self.speed *= self.tuning.drag;
            if self.speed.abs() < self.tuning.stop_epsilon {
                self.speed = 0.0;
            }
        }
        self.speed = self.speed.clamp(-max, max);

        self.pos = bounds.apply(self.pos + heading_vec(self.heading) * self.speed, size);
    }

    fn engage_thrust(&mut self) {
        if !self.thrusting {
            self.thrusting = true;
            self.thrust_frames = 0;
        }
        self.thrust_frames = self.thrust_frames.saturating_add(1);
    }

    fn emit_exhaust(&mut self, reverse: bool, rng: &mut impl Rng) {
        let dir = heading_vec(self.heading);
        for _ in 0..self.tuning.particles_per_frame {
            let spread = self.heading + rng.gen_range(-20.0..=20.0);
            let color = *FIRE_COLORS.choose(rng).unwrap_or(&FIRE_COLORS[0]);
            let particle = if reverse {
                let speed = rng.gen_range(3.0..6.0);
                Particle {
                    pos: self.pos + dir * self.size,
                    vel: heading_vec(spread) * speed,
                    size: rng.gen_range(0.5..2.0),
                    color,
                    life: 15.0,
                    max_life: 15.0,
                    fade_rate: rng.gen_range(0.1..0.25),
                }
            } else {
                let speed = rng.gen_range(5.0..10.0);
                Particle {
                    pos: self.pos - dir * self.size,
                    vel: -heading_vec(spread) * speed,
                    size: rng.gen_range(1.0..4.0),
                    color,
                    life: 20.0,
                    max_life: 20.0,
                    fade_rate: rng.gen_range(0.05..0.15),
                }
            };
            self.particles.push(particle);
        }
    }

    /// Nose, left wing, right wing.
    pub fn hull(&self) -> [Vec2; 3] {
        [
            self.pos + heading_vec(self.heading) * self.size,
            self.pos + heading_vec(self.heading + 140.0) * self.size,
            self.pos + heading_vec(self.heading + 220.0) * self.size,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIZE: Vec2 = Vec2::new(1200.0, 800.0);

    fn rocket() -> Rocket {
        Rocket::new(Vec2::new(600.0, 200.0), RocketTuning::default(), BulletTuning::default())
    }

    fn thrust() -> Controls {
        Controls {
            thrust_forward: true,
            ..Controls::default()
        }
    }

    #[test]
    fn test_thrust_ceiling_is_idempotent() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            r.update(&thrust(), Bounds::Wrap, SIZE, &mut rng);
            assert!(r.speed.abs() <= r.max_speed());
        }
        assert_eq!(r.speed, r.max_speed());
    }

    #[test]
    fn test_reverse_thrust_floor() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(8);
        let back = Controls {
            thrust_backward: true,
            ..Controls::default()
        };
        for _ in 0..200 {
            r.update(&back, Bounds::Wrap, SIZE, &mut rng);
        }
        assert_eq!(r.speed, -r.max_speed());
    }

    #[test]
    fn test_drag_reaches_exact_zero() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(9);
        r.speed = 5.0;
        let mut last = r.speed;
        let mut frames = 0;
        while r.speed != 0.0 {
            r.update(&Controls::default(), Bounds::Wrap, SIZE, &mut rng);
            assert!(r.speed < last);
            last = r.speed;
            frames += 1;
            assert!(frames < 400, "drag never converged");
        }
        // 5.0 * 0.98^n < 0.1 needs n = 194.
        assert!(frames <= 196);
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(10);
        let fire = Controls {
            fire: true,
            ..Controls::default()
        };
        for _ in 0..21 {
            r.update(&fire, Bounds::Wrap, SIZE, &mut rng);
        }
        // Frames 0, 10 and 20 fire.
        assert_eq!(r.bullets.len(), 3);
    }

    #[test]
    fn test_rotation_has_no_inertia() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(11);
        let left = Controls {
            rotate_left: true,
            ..Controls::default()
        };
        r.update(&left, Bounds::Wrap, SIZE, &mut rng);
        assert_eq!(r.heading, -5.0);
        r.update(&Controls::default(), Bounds::Wrap, SIZE, &mut rng);
        assert_eq!(r.heading, -5.0);
    }

    #[test]
    fn test_thrust_emits_exhaust() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(12);
        r.update(&thrust(), Bounds::Wrap, SIZE, &mut rng);
        assert_eq!(r.particles.len(), 5);
        assert_eq!(r.stage(), ThrustStage::Ignition);
        r.update(&Controls::default(), Bounds::Wrap, SIZE, &mut rng);
        assert_eq!(r.stage(), ThrustStage::Idle);
    }

    #[test]
    fn test_clamp_bounds_hold_rocket() {
        let mut r = rocket();
        let mut rng = StdRng::seed_from_u64(13);
        r.pos = Vec2::new(1198.0, 400.0);
        for _ in 0..100 {
            r.update(&thrust(), Bounds::Clamp, SIZE, &mut rng);
        }
        assert_eq!(r.pos.x, SIZE.x);
    }

    proptest! {
        #[test]
        fn position_always_wraps(x in 0.0f32..1200.0, y in 0.0f32..800.0,
                                 heading in -720.0f32..720.0, speed in -5.0f32..5.0,
                                 frames in 1usize..200) {
            let mut r = rocket();
            let mut rng = StdRng::seed_from_u64(14);
            r.pos = Vec2::new(x, y);
            r.heading = heading;
            r.speed = speed;
            for _ in 0..frames {
                r.update(&thrust(), Bounds::Wrap, SIZE, &mut rng);
                prop_assert!(r.pos.x >= 0.0 && r.pos.x < SIZE.x);
                prop_assert!(r.pos.y >= 0.0 && r.pos.y < SIZE.y);
                prop_assert!(r.speed.abs() <= r.max_speed());
            }
        }
    }
}
