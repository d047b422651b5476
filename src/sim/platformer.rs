//! Side-scrolling walk across a planet: astronaut physics, the level layout
//! and the camera.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PlatformerTuning;
use crate::content::PlanetEntry;
use crate::sim::button::{InfoBubble, InfoButton};
use crate::sim::collision::{first_hit, Rect};
use crate::sim::entity::{self, EntityMut, StepContext};
use crate::sim::motion::Bounds;

/// Where the walker starts, measured from the left edge of the world.
const SPAWN_X: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    Idle,
    Running,
    Jumping,
}

/// Held movement keys for one platformer frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// The astronaut.
#[derive(Debug, Clone)]
pub struct Walker {
    pub rect: Rect,
    pub vel: Vec2,
    pub airborne: bool,
    pub facing_right: bool,
    gravity: f32,
    jump_speed: f32,
    move_speed: f32,
}

impl Walker {
    pub fn new(pos: Vec2, tuning: &PlatformerTuning) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, tuning.player_size.x, tuning.player_size.y),
            vel: Vec2::ZERO,
            airborne: false,
            facing_right: true,
            gravity: tuning.gravity,
            jump_speed: tuning.jump_speed,
            move_speed: tuning.move_speed,
        }
    }

    pub fn state(&self) -> WalkerState {
        if self.airborne {
            WalkerState::Jumping
        } else if self.vel.x != 0.0 {
            WalkerState::Running
        } else {
            WalkerState::Idle
        }
    }

    pub fn go_left(&mut self) {
        self.vel.x = -self.move_speed;
        self.facing_right = false;
    }

    pub fn go_right(&mut self) {
        self.vel.x = self.move_speed;
        self.facing_right = true;
    }

    pub fn stop(&mut self) {
        self.vel.x = 0.0;
    }

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self, platforms: &[Rect]) -> bool {
        if !self.grounded(platforms) {
            return false;
        }
        self.vel.y = self.jump_speed;
        self.airborne = true;
        true
    }

    /// One-pixel probe below the feet.
    pub fn grounded(&self, platforms: &[Rect]) -> bool {
        let probe = self.rect.translated(Vec2::new(0.0, 1.0));
        platforms.iter().any(|p| probe.overlaps(p))
    }

    pub fn update(&mut self, platforms: &[Rect], world_width: f32) {
        self.vel.y += self.gravity;

        let span = Vec2::new((world_width - self.rect.w).max(0.0), 0.0);
        self.rect.x = Bounds::Clamp.apply(Vec2::new(self.rect.x + self.vel.x, 0.0), span).x;
        for block in platforms {
            if !self.rect.overlaps(block) {
                continue;
            }
            if self.vel.x > 0.0 {
                self.rect.set_right(block.left());
            } else if self.vel.x < 0.0 {
                self.rect.x = block.right();
            }
        }

        self.rect.y += self.vel.y;
        let mut landed = false;
        for block in platforms {
            if !self.rect.overlaps(block) {
                continue;
            }
            if self.vel.y > 0.0 {
                self.rect.set_bottom(block.top());
                landed = true;
            } else if self.vel.y < 0.0 {
                self.rect.y = block.bottom();
            }
            self.vel.y = 0.0;
        }
        if landed {
            self.airborne = false;
        } else if !self.grounded(platforms) {
            // Walked off a ledge.
            self.airborne = true;
        }
    }
}

/// Horizontal scroll offset that keeps the walker centred.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    pub fn follow(&mut self, target: &Rect, screen_width: f32, world_width: f32) {
        let max = (world_width - screen_width).max(0.0);
        self.x = (target.center().x - screen_width / 2.0).clamp(0.0, max);
    }

    /// Background layers scroll at half speed.
    pub fn parallax(&self) -> f32 {
        self.x * 0.5
    }
}

/// What happened in one platformer frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStep {
    /// Button whose bubble was raised this frame.
    pub raised: Option<usize>,
    pub exited: bool,
}

#[derive(Debug, Clone)]
pub struct PlatformerLevel {
    pub planet: String,
    pub world_width: f32,
    pub screen: Vec2,
    pub ground: Vec<Rect>,
    pub ledges: Vec<Rect>,
    /// Ground and ledges, in collision order.
    pub platforms: Vec<Rect>,
    pub buttons: Vec<InfoButton>,
    pub texts: Vec<String>,
    pub bubble: Option<InfoBubble>,
    pub exit: Rect,
    pub walker: Walker,
    pub camera: Camera,
    spawn: Vec2,
    button_cooldown: u32,
}

impl PlatformerLevel {
    pub fn new(entry: &PlanetEntry, screen: Vec2, tuning: &PlatformerTuning) -> Self {
        let tile = tuning.tile_size;
        let world_width = tuning.world_width.max(screen.x);
        let ground_top = screen.y - tile;

        let tiles = (world_width / tile) as usize + 1;
        let ground: Vec<Rect> = (0..tiles)
            .map(|i| Rect::new(i as f32 * tile, ground_top, tile, tile))
            .collect();
        let ledges = ledge_layout(&entry.name, world_width, ground_top, tuning);

        let texts = entry.button_texts();
        let spacing = world_width / (texts.len() + 1) as f32;
        let buttons = (0..texts.len())
            .map(|i| {
                let x = (i + 1) as f32 * spacing;
                InfoButton::new(Rect::new(x, ground_top - tile / 2.0, tile, tile / 2.0), i)
            })
            .collect();

        let exit = Rect::new(world_width - tile * 2.0, ground_top - tile * 2.0, tile, tile * 2.0);
        let spawn = Vec2::new(SPAWN_X, ground_top - tuning.player_size.y);
        let platforms = ground.iter().chain(ledges.iter()).copied().collect();

        log::info!(
            "Built {} level: {} ledges, {} info buttons",
            entry.name,
            ledges.len(),
            texts.len()
        );

        Self {
            planet: entry.name.clone(),
            world_width,
            screen,
            ground,
            ledges,
            platforms,
            buttons,
            texts,
            bubble: None,
            exit,
            walker: Walker::new(spawn, tuning),
            camera: Camera::default(),
            spawn,
            button_cooldown: tuning.button_cooldown,
        }
    }

    pub fn update(&mut self, input: WalkInput, ctx: &mut StepContext) -> LevelStep {
        if input.left && !input.right {
            self.walker.go_left();
        } else if input.right && !input.left {
            self.walker.go_right();
        } else {
            self.walker.stop();
        }
        if input.jump {
            self.walker.jump(&self.platforms);
        }

        self.walker.update(&self.platforms, self.world_width);
        if self.walker.rect.top() > self.screen.y {
            log::debug!("Walker fell out of the {} level, respawning", self.planet);
            self.walker = Walker {
                rect: Rect::new(self.spawn.x, self.spawn.y, self.walker.rect.w, self.walker.rect.h),
                vel: Vec2::ZERO,
                airborne: false,
                ..self.walker.clone()
            };
        }
        self.camera.follow(&self.walker.rect, self.screen.x, self.world_width);

        for button in &mut self.buttons {
            entity::update(EntityMut::InfoButton(button), ctx);
        }

        let step = LevelStep {
            raised: self.resolve_buttons(),
            exited: self.walker.rect.overlaps(&self.exit),
        };

        if let Some(bubble) = &mut self.bubble {
            let player_on_source = self.buttons.get(bubble.source).is_some_and(|b| b.player_on);
            entity::update(
                EntityMut::InfoBubble {
                    bubble,
                    player_on_source,
                },
                ctx,
            );
            if !bubble.active {
                self.bubble = None;
            }
        }
        step
    }

    fn resolve_buttons(&mut self) -> Option<usize> {
        let walker = self.walker.rect;
        for button in &mut self.buttons {
            button.player_on = button.rect.overlaps(&walker);
        }
        let showing = self.bubble.as_ref().map(|b| b.source);
        let hit = first_hit(&self.buttons, |b| {
            b.player_on && b.cooldown == 0 && showing != Some(b.fact)
        })?;
        let button = &mut self.buttons[hit];
        button.cooldown = self.button_cooldown;
        let text = self.texts.get(button.fact).map(String::as_str).unwrap_or("");
        self.bubble = Some(InfoBubble::new(text, button.fact));
        log::debug!("Info button {} on {} pressed", hit, self.planet);
        Some(hit)
    }
}

/// Floating ledges, laid out the same way every time for a given planet.
fn ledge_layout(planet: &str, world_width: f32, ground_top: f32, tuning: &PlatformerTuning) -> Vec<Rect> {
    let seed = planet
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
    let mut rng = StdRng::seed_from_u64(seed);
    let tile = tuning.tile_size;
    let slot = world_width / (tuning.ledges + 1) as f32;
    (0..tuning.ledges)
        .map(|i| {
            let w = tile * rng.gen_range(2..=4) as f32;
            let x = (i + 1) as f32 * slot - w / 2.0 + rng.gen_range(-tile..=tile);
            let y = ground_top - rng.gen_range(110.0..=140.0);
            Rect::new(x, y, w, tile / 2.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::content::Catalog;
    use proptest::prelude::*;

    const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);

    fn floor() -> Vec<Rect> {
        vec![Rect::new(0.0, 752.0, 4000.0, 48.0)]
    }

    fn standing() -> Walker {
        Walker::new(Vec2::new(100.0, 752.0 - 64.0), &PlatformerTuning::default())
    }

    fn earth_level() -> PlatformerLevel {
        let catalog = Catalog::builtin();
        PlatformerLevel::new(catalog.planet("Earth").unwrap(), SCREEN, &PlatformerTuning::default())
    }

    #[test]
    fn test_jump_from_ground() {
        let mut w = standing();
        assert!(w.grounded(&floor()));
        assert!(w.jump(&floor()));
        assert_eq!(w.vel.y, -15.0);
        assert_eq!(w.state(), WalkerState::Jumping);
    }

    #[test]
    fn test_jump_rejected_while_airborne() {
        let platforms = floor();
        let mut w = standing();
        w.jump(&platforms);
        w.update(&platforms, 3600.0);
        let vel = w.vel;
        assert!(!w.jump(&platforms));
        assert_eq!(w.vel, vel);
    }

    #[test]
    fn test_lands_and_stops_falling() {
        let platforms = floor();
        let mut w = standing();
        w.jump(&platforms);
        for _ in 0..120 {
            w.update(&platforms, 3600.0);
        }
        assert!(!w.airborne);
        assert_eq!(w.rect.bottom(), 752.0);
        assert_eq!(w.vel.y, 0.0);
        assert_eq!(w.state(), WalkerState::Idle);
    }

    #[test]
    fn test_head_bonk() {
        let mut platforms = floor();
        platforms.push(Rect::new(50.0, 600.0, 200.0, 20.0));
        let mut w = standing();
        w.jump(&platforms);
        for _ in 0..10 {
            w.update(&platforms, 3600.0);
            assert!(w.rect.top() >= 620.0);
        }
    }

    #[test]
    fn test_wall_blocks_walker() {
        let mut platforms = floor();
        platforms.push(Rect::new(300.0, 600.0, 48.0, 152.0));
        let mut w = standing();
        w.go_right();
        for _ in 0..100 {
            w.update(&platforms, 3600.0);
        }
        assert_eq!(w.rect.right(), 300.0);
        assert_eq!(w.state(), WalkerState::Running);
    }

    #[test]
    fn test_world_edges_clamp() {
        let platforms = floor();
        let mut w = standing();
        w.go_left();
        for _ in 0..100 {
            w.update(&platforms, 3600.0);
        }
        assert_eq!(w.rect.left(), 0.0);
        assert!(!w.facing_right);
    }

    #[test]
    fn test_walking_off_ledge_is_airborne() {
        let platforms = vec![Rect::new(0.0, 400.0, 150.0, 20.0), Rect::new(0.0, 752.0, 4000.0, 48.0)];
        let mut w = Walker::new(Vec2::new(50.0, 336.0), &PlatformerTuning::default());
        w.go_right();
        let mut saw_airborne = false;
        for _ in 0..90 {
            w.update(&platforms, 3600.0);
            saw_airborne |= w.airborne;
        }
        assert!(saw_airborne);
        assert!(!w.airborne);
        assert_eq!(w.rect.bottom(), 752.0);
    }

    #[test]
    fn test_camera_clamps() {
        let mut cam = Camera::default();
        cam.follow(&Rect::new(10.0, 0.0, 64.0, 64.0), 1200.0, 3600.0);
        assert_eq!(cam.x, 0.0);
        cam.follow(&Rect::new(3500.0, 0.0, 64.0, 64.0), 1200.0, 3600.0);
        assert_eq!(cam.x, 2400.0);
        cam.follow(&Rect::new(1800.0, 0.0, 64.0, 64.0), 1200.0, 3600.0);
        assert_eq!(cam.x, 1232.0);
        assert_eq!(cam.parallax(), 616.0);
    }

    #[test]
    fn test_level_layout() {
        let level = earth_level();
        assert_eq!(level.buttons.len(), 5);
        assert_eq!(level.ledges.len(), 6);
        assert_eq!(level.buttons[0].rect.left(), 600.0);
        assert!(level.exit.right() <= level.world_width);
        // Same planet, same ledges.
        assert_eq!(level.ledges, earth_level().ledges);
    }

    #[test]
    fn test_only_one_bubble() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(51);
        let mut level = earth_level();
        let idle = WalkInput::default();

        level.walker.rect.x = level.buttons[0].rect.x;
        let mut ctx = StepContext::new(&config, &mut rng);
        assert_eq!(level.update(idle, &mut ctx).raised, Some(0));
        assert_eq!(level.bubble.as_ref().map(|b| b.source), Some(0));

        // Standing still does not restart the same bubble.
        for _ in 0..60 {
            assert_eq!(level.update(idle, &mut ctx).raised, None);
        }

        level.walker.rect.x = level.buttons[1].rect.x;
        assert_eq!(level.update(idle, &mut ctx).raised, Some(1));
        assert_eq!(level.bubble.as_ref().map(|b| b.source), Some(1));
    }

    #[test]
    fn test_exit_reported() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(52);
        let mut level = earth_level();
        let right = WalkInput {
            right: true,
            ..WalkInput::default()
        };
        let mut exited = false;
        for _ in 0..2000 {
            let mut ctx = StepContext::new(&config, &mut rng);
            if level.update(right, &mut ctx).exited {
                exited = true;
                break;
            }
        }
        assert!(exited);
        assert!(level.camera.x > 0.0);
    }

    proptest! {
        #[test]
        fn never_tunnels_through_floor(x in 0.0f32..3000.0, height in 0.0f32..600.0,
                                       vx in -5.0f32..5.0, frames in 1usize..300) {
            let platforms = floor();
            let mut w = Walker::new(Vec2::new(x, 752.0 - 64.0 - height), &PlatformerTuning::default());
            w.vel.x = vx;
            for _ in 0..frames {
                w.update(&platforms, 3600.0);
                prop_assert!(w.rect.bottom() <= 752.0 + 1e-3);
            }
        }
    }
}
