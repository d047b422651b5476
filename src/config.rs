use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::mode::ModeKind;

/// World dimensions and every tuning knob of the simulation.
///
/// All fields have defaults, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    /// Frames during which collisions are ignored after a mode change.
    pub transition_cooldown: u32,
    pub rocket: RocketTuning,
    pub bullet: BulletTuning,
    pub orbit: OrbitTuning,
    pub hazards: HazardTuning,
    pub quiz: QuizTuning,
    pub platformer: PlatformerTuning,
    pub escape: EscapeRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketTuning {
    pub acceleration: f32,
    pub max_speed: f32,
    pub drag: f32,
    pub stop_epsilon: f32,
    pub turn_rate: f32,
    pub size: f32,
    pub shoot_delay: u32,
    pub particles_per_frame: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub speed: f32,
    pub min_speed: f32,
    pub lifetime: u32,
    pub max_bounces: u32,
    pub bounce_decay: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitTuning {
    pub tilt: f32,
    pub trail_len: usize,
    pub spin_rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub max_asteroids: usize,
    pub asteroid_spawn_chance: f64,
    pub asteroid_speed: (f32, f32),
    pub asteroid_radius: (f32, f32),
    pub asteroid_margin: f32,
    pub max_comets: usize,
    pub comet_spawn_chance: f64,
    pub comet_spawn_delay: (u32, u32),
    pub comet_speed: (f32, f32),
    pub comet_avoid_radius: f32,
    pub comet_margin: f32,
    pub comet_trail_len: usize,
    pub asteroid_bonus: u32,
    pub comet_bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizTuning {
    pub reward: u32,
    pub penalty: u32,
    pub correct_display: u32,
    pub wrong_display: u32,
    pub reveal_display: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformerTuning {
    pub world_width: f32,
    pub tile_size: f32,
    pub player_size: Vec2,
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
    pub button_cooldown: u32,
    pub ledges: usize,
}

/// Which modes jump straight to the menu on Escape. Every other mode treats
/// Escape like its Back action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscapeRules {
    pub to_menu: Vec<ModeKind>,
}

impl EscapeRules {
    pub fn goes_to_menu(&self, kind: ModeKind) -> bool {
        self.to_menu.contains(&kind)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            fps: 60,
            transition_cooldown: 30,
            rocket: RocketTuning::default(),
            bullet: BulletTuning::default(),
            orbit: OrbitTuning::default(),
            hazards: HazardTuning::default(),
            quiz: QuizTuning::default(),
            platformer: PlatformerTuning::default(),
            escape: EscapeRules::default(),
        }
    }
}

impl Default for RocketTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.1,
            max_speed: 5.0,
            drag: 0.98,
            stop_epsilon: 0.1,
            turn_rate: 5.0,
            size: 20.0,
            shoot_delay: 10,
            particles_per_frame: 5,
        }
    }
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            min_speed: 3.0,
            lifetime: 60,
            max_bounces: 3,
            bounce_decay: 0.8,
            radius: 3.0,
        }
    }
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            tilt: 0.5,
            trail_len: 50,
            spin_rate: 0.5,
        }
    }
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            max_asteroids: 5,
            asteroid_spawn_chance: 0.02,
            asteroid_speed: (1.0, 3.0),
            asteroid_radius: (15.0, 30.0),
            asteroid_margin: 100.0,
            max_comets: 3,
            comet_spawn_chance: 0.05,
            comet_spawn_delay: (120, 240),
            comet_speed: (3.0, 6.0),
            comet_avoid_radius: 200.0,
            comet_margin: 50.0,
            comet_trail_len: 20,
            asteroid_bonus: 2,
            comet_bonus: 5,
        }
    }
}

impl Default for QuizTuning {
    fn default() -> Self {
        Self {
            reward: 10,
            penalty: 5,
            correct_display: 60,
            wrong_display: 120,
            reveal_display: 180,
        }
    }
}

impl Default for PlatformerTuning {
    fn default() -> Self {
        Self {
            world_width: 3600.0,
            tile_size: 48.0,
            player_size: Vec2::new(64.0, 64.0),
            gravity: 0.8,
            jump_speed: -15.0,
            move_speed: 5.0,
            button_cooldown: 30,
            ledges: 6,
        }
    }
}

impl Default for EscapeRules {
    fn default() -> Self {
        Self {
            to_menu: vec![ModeKind::SolarSystem, ModeKind::DevGallery],
        }
    }
}

impl WorldConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: WorldConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with, such as empty random
    /// ranges or a zero-sized world.
    pub fn validate(&self) -> Result<()> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        if self.fps == 0 {
            return Err(anyhow!("fps must be at least 1"));
        }

        let r = &self.rocket;
        positive("rocket.max_speed", r.max_speed)?;
        positive("rocket.size", r.size)?;
        non_negative("rocket.acceleration", r.acceleration)?;
        non_negative("rocket.stop_epsilon", r.stop_epsilon)?;
        non_negative("rocket.turn_rate", r.turn_rate)?;
        unit_interval("rocket.drag", r.drag)?;

        let b = &self.bullet;
        positive("bullet.speed", b.speed)?;
        non_negative("bullet.min_speed", b.min_speed)?;
        positive("bullet.radius", b.radius)?;
        unit_interval("bullet.bounce_decay", b.bounce_decay)?;

        let tilt = self.orbit.tilt;
        if !(tilt > 0.0 && tilt < 1.0) {
            return Err(anyhow!("orbit.tilt must be between 0 and 1, got {tilt}"));
        }

        let h = &self.hazards;
        range("hazards.asteroid_speed", h.asteroid_speed)?;
        range("hazards.asteroid_radius", h.asteroid_radius)?;
        range("hazards.comet_speed", h.comet_speed)?;
        positive("hazards.asteroid_radius", h.asteroid_radius.0)?;
        if h.comet_spawn_delay.0 > h.comet_spawn_delay.1 {
            return Err(anyhow!(
                "hazards.comet_spawn_delay is reversed: {:?}",
                h.comet_spawn_delay
            ));
        }
        chance("hazards.asteroid_spawn_chance", h.asteroid_spawn_chance)?;
        chance("hazards.comet_spawn_chance", h.comet_spawn_chance)?;
        non_negative("hazards.asteroid_margin", h.asteroid_margin)?;
        non_negative("hazards.comet_margin", h.comet_margin)?;
        non_negative("hazards.comet_avoid_radius", h.comet_avoid_radius)?;

        let p = &self.platformer;
        positive("platformer.tile_size", p.tile_size)?;
        positive("platformer.player_size.x", p.player_size.x)?;
        positive("platformer.player_size.y", p.player_size.y)?;
        positive("platformer.gravity", p.gravity)?;
        non_negative("platformer.move_speed", p.move_speed)?;
        if p.world_width < self.width {
            return Err(anyhow!(
                "platformer.world_width ({}) must be at least the screen width ({})",
                p.world_width,
                self.width
            ));
        }
        Ok(())
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() / 2.0
    }
}

fn positive(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(anyhow!("{name} must be positive, got {v}"))
    }
}

fn non_negative(name: &str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(anyhow!("{name} must not be negative, got {v}"))
    }
}

/// Multipliers applied every frame: (0, 1].
fn unit_interval(name: &str, v: f32) -> Result<()> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(anyhow!("{name} must be in (0, 1], got {v}"))
    }
}

fn chance(name: &str, v: f64) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(anyhow!("{name} must be a probability, got {v}"))
    }
}

fn range(name: &str, (lo, hi): (f32, f32)) -> Result<()> {
    if lo.is_finite() && hi.is_finite() && lo <= hi {
        Ok(())
    } else {
        Err(anyhow!("{name} must be an ordered (low, high) pair, got ({lo}, {hi})"))
    }
}
