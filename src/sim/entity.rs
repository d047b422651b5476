//! Single dispatch point for per-frame entity updates.

use glam::Vec2;
use rand::rngs::StdRng;

use crate::config::WorldConfig;
use crate::sim::bullet::Bullet;
use crate::sim::button::{InfoBubble, InfoButton};
use crate::sim::hazards::{Asteroid, Comet};
use crate::sim::motion::Bounds;
use crate::sim::planet::Planet;
use crate::sim::rocket::{Controls, Particle, Rocket};

/// Shared inputs of one simulation frame.
pub struct StepContext<'a> {
    pub size: Vec2,
    pub config: &'a WorldConfig,
    pub rng: &'a mut StdRng,
}

impl<'a> StepContext<'a> {
    pub fn new(config: &'a WorldConfig, rng: &'a mut StdRng) -> Self {
        Self {
            size: config.size(),
            config,
            rng,
        }
    }
}

/// Every kind of thing that moves on its own.
pub enum EntityMut<'e> {
    Rocket {
        rocket: &'e mut Rocket,
        controls: Controls,
        bounds: Bounds,
    },
    Planet(&'e mut Planet),
    Asteroid(&'e mut Asteroid),
    Comet(&'e mut Comet),
    Bullet(&'e mut Bullet),
    Particle(&'e mut Particle),
    InfoButton(&'e mut InfoButton),
    InfoBubble {
        bubble: &'e mut InfoBubble,
        player_on_source: bool,
    },
}

pub fn update(entity: EntityMut<'_>, ctx: &mut StepContext) {
    match entity {
        EntityMut::Rocket {
            rocket,
            controls,
            bounds,
        } => {
            rocket.update(&controls, bounds, ctx.size, ctx.rng);
            for bullet in &mut rocket.bullets {
                update(EntityMut::Bullet(bullet), ctx);
            }
            rocket.bullets.retain(Bullet::alive);
            for particle in &mut rocket.particles {
                update(EntityMut::Particle(particle), ctx);
            }
            rocket.particles.retain(Particle::alive);
        }
        EntityMut::Planet(planet) => planet.update(),
        EntityMut::Asteroid(asteroid) => asteroid.update(),
        EntityMut::Comet(comet) => comet.update(),
        EntityMut::Bullet(bullet) => bullet.update(ctx.size, &ctx.config.bullet, ctx.rng),
        EntityMut::Particle(particle) => particle.update(),
        EntityMut::InfoButton(button) => button.update(),
        EntityMut::InfoBubble {
            bubble,
            player_on_source,
        } => bubble.update(player_on_source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_dispatch_moves_rocket() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(41);
        let mut rocket = Rocket::new(config.center(), config.rocket.clone(), config.bullet.clone());
        let controls = Controls {
            thrust_forward: true,
            ..Controls::default()
        };
        let mut ctx = StepContext::new(&config, &mut rng);
        update(
            EntityMut::Rocket {
                rocket: &mut rocket,
                controls,
                bounds: Bounds::Wrap,
            },
            &mut ctx,
        );
        assert!(rocket.pos.x > config.center().x);
    }

    fn fly(rocket: &mut Rocket, controls: Controls, ctx: &mut StepContext) {
        update(
            EntityMut::Rocket {
                rocket,
                controls,
                bounds: Bounds::Wrap,
            },
            ctx,
        );
    }

    #[test]
    fn test_rocket_dispatch_expires_exhaust() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(43);
        let mut ctx = StepContext::new(&config, &mut rng);
        let mut rocket = Rocket::new(config.center(), config.rocket.clone(), config.bullet.clone());
        let thrust = Controls {
            thrust_forward: true,
            ..Controls::default()
        };
        fly(&mut rocket, thrust, &mut ctx);
        assert_eq!(rocket.particles.len(), config.rocket.particles_per_frame);
        let first = rocket.particles[0].pos;
        fly(&mut rocket, Controls::default(), &mut ctx);
        assert_ne!(rocket.particles[0].pos, first);
        for _ in 0..500 {
            fly(&mut rocket, Controls::default(), &mut ctx);
        }
        assert!(rocket.particles.is_empty());
    }

    #[test]
    fn test_rocket_dispatch_moves_and_expires_bullets() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(44);
        let mut ctx = StepContext::new(&config, &mut rng);
        let mut rocket = Rocket::new(config.center(), config.rocket.clone(), config.bullet.clone());
        let fire = Controls {
            fire: true,
            ..Controls::default()
        };
        fly(&mut rocket, fire, &mut ctx);
        assert_eq!(rocket.bullets.len(), 1);
        assert!(rocket.bullets[0].pos.x > config.center().x);
        for _ in 0..config.bullet.lifetime {
            fly(&mut rocket, Controls::default(), &mut ctx);
        }
        assert!(rocket.bullets.is_empty());
    }

    #[test]
    fn test_dispatch_ticks_button() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = StepContext::new(&config, &mut rng);
        let mut button = InfoButton::new(crate::sim::collision::Rect::new(0.0, 0.0, 10.0, 10.0), 0);
        button.cooldown = 5;
        update(EntityMut::InfoButton(&mut button), &mut ctx);
        assert_eq!(button.cooldown, 4);
    }
}
