use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;

use crate::config::WorldConfig;
use crate::content::{Catalog, PlanetEntry};
use crate::input::{Action, InputSnapshot};
use crate::sim::button::{back_button, surface_buttons, ButtonKind, SurfaceButton};
use crate::sim::collision::{circles_overlap, first_hit};
use crate::sim::entity::{self, EntityMut, StepContext};
use crate::sim::hazards::HazardField;
use crate::sim::mode::{Mode, Trigger};
use crate::sim::motion::Bounds;
use crate::sim::planet::Planet;
use crate::sim::platformer::PlatformerLevel;
use crate::sim::quiz::{answer_rects, QuizSession, Verdict};
use crate::sim::rocket::Rocket;

const STAR_COUNT: usize = 100;
const STAR_COLORS: [(u8, u8, u8); 4] = [(255, 255, 255), (255, 255, 200), (200, 200, 255), (255, 200, 200)];
const STAR_FLASH_CHANCE: f64 = 0.005;
const FADE_STEP: u8 = 10;
/// Gallery pages turn when the rocket gets this close to a side edge.
const GALLERY_EDGE: f32 = 50.0;
const BLOTCH_COUNT: usize = 40;
/// Planet views draw the body this many times its orbit-map radius.
pub const SURFACE_SCALE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Launch,
    Development,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Launch, MenuItem::Development, MenuItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Launch => "Launch",
            MenuItem::Development => "Development",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Things that happened during one [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EnteredPlanet(usize),
    HitAsteroid,
    AsteroidDestroyed,
    CometCaught,
    ButtonPressed(ButtonKind),
    QuizAnswered(Verdict),
    FactRevealed(usize),
    PlatformerExit,
    SlideChanged(usize),
    ModeChanged(Mode),
    QuitRequested,
}

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub color: (u8, u8, u8),
    twinkle_speed: f32,
    phase: f32,
    flash: f32,
}

impl Star {
    fn random(size: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(rng.gen_range(0.0..size.x), rng.gen_range(0.0..size.y)),
            size: rng.gen_range(0.5..2.0),
            color: STAR_COLORS[rng.gen_range(0..STAR_COLORS.len())],
            twinkle_speed: rng.gen_range(0.0..0.1),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            flash: 0.0,
        }
    }

    fn update(&mut self, rng: &mut impl Rng) {
        if self.flash > 0.0 {
            self.flash *= 0.9;
            if self.flash < 0.1 {
                self.flash = 0.0;
            }
        } else if rng.gen_bool(STAR_FLASH_CHANCE) {
            self.flash = 2.0;
        }
    }

    /// Brightness multiplier in 0..=2 for a given frame.
    pub fn brightness(&self, frame: u64) -> f32 {
        let t = frame as f32 / 60.0;
        ((t * self.twinkle_speed * 10.0 + self.phase).sin().abs() + self.flash).min(2.0)
    }

    pub fn rgb(&self, frame: u64) -> Color {
        let b = self.brightness(frame);
        let scale = |c: u8| (c as f32 * b).min(255.0) as u8;
        Color::Rgb(scale(self.color.0), scale(self.color.1), scale(self.color.2))
    }
}

/// A darker or lighter patch on a planet seen up close.
#[derive(Debug, Clone, Copy)]
pub struct Blotch {
    pub offset: Vec2,
    pub radius: f32,
    pub shade: i16,
}

pub struct World {
    pub config: WorldConfig,
    pub catalog: Catalog,
    pub mode: Mode,
    pub rocket: Rocket,
    pub planets: Vec<Planet>,
    pub hazards: HazardField,
    /// Collision suppression frames left after a transition or a hit.
    pub cooldown: u32,
    pub score: u32,
    pub quiz: Option<QuizSession>,
    pub level: Option<PlatformerLevel>,
    pub buttons: Vec<SurfaceButton>,
    pub blotches: Vec<Blotch>,
    blotches_for: Option<usize>,
    pub stars: Vec<Star>,
    pub menu_selected: usize,
    pub gallery: usize,
    /// Fade-in overlay opacity after a mode change.
    pub fade: u8,
    pub frame: u64,
    rng: StdRng,
}

impl World {
    pub fn new(config: WorldConfig, catalog: Catalog, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let size = config.size();
        let center = config.center();
        let planets = catalog
            .planets
            .iter()
            .map(|entry| Planet::from_entry(entry, center, &config.orbit, &mut rng))
            .collect();
        let stars = (0..STAR_COUNT).map(|_| Star::random(size, &mut rng)).collect();
        let rocket = Rocket::new(
            Vec2::new(size.x / 2.0, size.y / 4.0),
            config.rocket.clone(),
            config.bullet.clone(),
        );
        log::info!(
            "World ready: {}x{}, {} bodies, {} history slides",
            config.width,
            config.height,
            catalog.planets.len(),
            catalog.history.len()
        );
        Self {
            config,
            catalog,
            mode: Mode::Menu,
            rocket,
            planets,
            hazards: HazardField::new(),
            cooldown: 0,
            score: 0,
            quiz: None,
            level: None,
            buttons: Vec::new(),
            blotches: Vec::new(),
            blotches_for: None,
            stars,
            menu_selected: 0,
            gallery: 0,
            fade: 0,
            frame: 0,
            rng,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.config.size()
    }

    /// Where the rocket is placed on entering `mode`.
    pub fn anchor(&self, mode: Mode) -> Vec2 {
        let size = self.size();
        match mode {
            Mode::Quiz { .. } => self.quiz_anchor(),
            Mode::DevGallery => size / 2.0,
            _ => Vec2::new(size.x / 2.0, size.y / 4.0),
        }
    }

    pub fn quiz_anchor(&self) -> Vec2 {
        let size = self.size();
        Vec2::new(size.x / 2.0, size.y * 3.0 / 4.0)
    }

    pub fn planet_entry(&self, index: usize) -> Option<&PlanetEntry> {
        self.catalog.planets.get(index)
    }

    pub fn menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_selected % MenuItem::ALL.len()]
    }

    /// Run `trigger` through the state machine and enter the result.
    pub fn apply(&mut self, trigger: Trigger) -> Option<Mode> {
        let next = self.mode.transition(trigger, &self.config.escape)?;
        self.enter(next);
        Some(next)
    }

    /// Switch to `mode` and apply its entry side effects.
    pub fn enter(&mut self, mode: Mode) {
        let from = self.mode;
        self.mode = mode;
        self.cooldown = self.config.transition_cooldown;
        self.fade = u8::MAX;
        let anchor = self.anchor(mode);
        self.rocket.reposition(anchor);

        match mode {
            Mode::Menu => {
                self.hazards.clear();
                self.quiz = None;
                self.level = None;
            }
            Mode::SolarSystem => {
                self.quiz = None;
                self.level = None;
                self.buttons.clear();
            }
            Mode::PlanetSurface { planet } => {
                self.quiz = None;
                self.level = None;
                let is_star = self.planet_entry(planet).is_some_and(|p| p.is_star);
                self.buttons = surface_buttons(self.size(), is_star);
                if self.blotches_for != Some(planet) {
                    self.blotches = self.roll_blotches(planet);
                    self.blotches_for = Some(planet);
                }
            }
            Mode::Quiz { planet } => {
                let (name, bank) = match self.catalog.planets.get(planet) {
                    Some(entry) => (entry.name.as_str(), entry.quiz.as_slice()),
                    None => ("this planet", &[][..]),
                };
                self.quiz = Some(QuizSession::new(name, bank, self.config.quiz.clone(), &mut self.rng));
                self.buttons = vec![back_button(self.size())];
            }
            Mode::Platformer { planet } => {
                self.level = self
                    .catalog
                    .planets
                    .get(planet)
                    .map(|entry| PlatformerLevel::new(entry, self.config.size(), &self.config.platformer));
                self.buttons.clear();
            }
            Mode::InfoPanel { .. } => {
                self.buttons = vec![back_button(self.size())];
            }
            Mode::DevGallery => {
                self.buttons.clear();
            }
        }
        log::info!("Mode {:?} -> {:?}", from, mode);
    }

    fn roll_blotches(&mut self, planet: usize) -> Vec<Blotch> {
        let radius = self.planet_entry(planet).map_or(10.0, |p| p.radius) * SURFACE_SCALE;
        (0..BLOTCH_COUNT)
            .map(|_| {
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                let distance = self.rng.gen_range(0.0..=radius.max(0.0));
                Blotch {
                    offset: Vec2::from_angle(angle) * distance,
                    radius: self.rng.gen_range(5.0..=15.0),
                    shade: self.rng.gen_range(-30..=30),
                }
            })
            .collect()
    }

    /// Advance one frame.
    pub fn step(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.frame += 1;

        for &action in &input.pressed {
            self.handle_press(action, &mut events);
        }

        for star in &mut self.stars {
            star.update(&mut self.rng);
        }

        let mut ctx = StepContext::new(&self.config, &mut self.rng);
        if self.mode != Mode::Menu {
            self.hazards.update(&self.config.hazards, &mut ctx);
        }

        match self.mode {
            Mode::Menu | Mode::InfoPanel { .. } => {}
            Mode::SolarSystem => {
                fly(&mut self.rocket, input, &mut ctx);
                for planet in &mut self.planets {
                    entity::update(EntityMut::Planet(planet), &mut ctx);
                }
            }
            Mode::PlanetSurface { .. } | Mode::Quiz { .. } | Mode::DevGallery => {
                fly(&mut self.rocket, input, &mut ctx);
            }
            Mode::Platformer { .. } => {
                if let Some(level) = &mut self.level {
                    let step = level.update(input.walk(), &mut ctx);
                    if let Some(i) = step.raised {
                        events.push(GameEvent::FactRevealed(i));
                    }
                    if step.exited {
                        events.push(GameEvent::PlatformerExit);
                    }
                }
            }
        }

        if let Some(quiz) = &mut self.quiz {
            quiz.tick(&mut self.rng);
        }

        self.collide(&mut events);

        let triggers: Vec<Trigger> = events.iter().filter_map(|e| trigger_for(*e)).collect();
        for trigger in triggers {
            if let Some(next) = self.apply(trigger) {
                events.push(GameEvent::ModeChanged(next));
            }
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.fade = self.fade.saturating_sub(FADE_STEP);
        events
    }

    fn handle_press(&mut self, action: Action, events: &mut Vec<GameEvent>) {
        match (self.mode, action) {
            (Mode::Menu, Action::Up) => {
                self.menu_selected = (self.menu_selected + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
            }
            (Mode::Menu, Action::Down) => {
                self.menu_selected = (self.menu_selected + 1) % MenuItem::ALL.len();
            }
            (Mode::Menu, Action::Confirm | Action::Fire) => {
                let trigger = match self.menu_item() {
                    MenuItem::Launch => Trigger::Launch,
                    MenuItem::Development => Trigger::Development,
                    MenuItem::Quit => {
                        events.push(GameEvent::QuitRequested);
                        return;
                    }
                };
                if let Some(next) = self.apply(trigger) {
                    events.push(GameEvent::ModeChanged(next));
                }
            }
            (Mode::InfoPanel { .. }, Action::Confirm) | (_, Action::Escape) => {
                let trigger = if action == Action::Escape { Trigger::Escape } else { Trigger::Back };
                if let Some(next) = self.apply(trigger) {
                    events.push(GameEvent::ModeChanged(next));
                }
            }
            _ => {}
        }
    }

    fn collide(&mut self, events: &mut Vec<GameEvent>) {
        let flying = matches!(
            self.mode,
            Mode::SolarSystem | Mode::PlanetSurface { .. } | Mode::Quiz { .. } | Mode::DevGallery
        );
        if !flying {
            return;
        }

        // Bullets and gallery paging ignore the cooldown.
        let asteroids = &mut self.hazards.asteroids;
        let mut destroyed = 0;
        self.rocket.bullets.retain(|bullet| {
            match first_hit(asteroids, |a| circles_overlap(bullet.pos, bullet.radius, a.pos, a.radius)) {
                Some(i) => {
                    asteroids.remove(i);
                    destroyed += 1;
                    events.push(GameEvent::AsteroidDestroyed);
                    false
                }
                None => true,
            }
        });
        self.score = self
            .score
            .saturating_add(destroyed * self.config.hazards.asteroid_bonus);

        if self.mode == Mode::DevGallery {
            self.page_gallery(events);
        }
        if self.cooldown > 0 {
            return;
        }

        let (pos, size) = (self.rocket.pos, self.rocket.size);
        if let Some(i) = first_hit(&self.hazards.asteroids, |a| circles_overlap(pos, size, a.pos, a.radius)) {
            self.hazards.asteroids.remove(i);
            let anchor = self.anchor(self.mode);
            self.rocket.reposition(anchor);
            self.cooldown = self.config.transition_cooldown;
            log::info!("Rocket hit an asteroid");
            events.push(GameEvent::HitAsteroid);
            return;
        }
        if let Some(i) = first_hit(&self.hazards.comets, |c| circles_overlap(pos, size, c.pos, c.radius)) {
            self.hazards.comets.remove(i);
            self.score = self.score.saturating_add(self.config.hazards.comet_bonus);
            self.cooldown = self.config.transition_cooldown;
            log::info!("Comet caught, score {}", self.score);
            events.push(GameEvent::CometCaught);
        }

        let hull = self.rocket.bounds_rect();
        match self.mode {
            Mode::SolarSystem => {
                if let Some(i) = first_hit(&self.planets, |p| circles_overlap(pos, size, p.pos, p.radius)) {
                    log::info!("Entering {}", self.planets[i].name);
                    events.push(GameEvent::EnteredPlanet(i));
                }
            }
            Mode::PlanetSurface { .. } => {
                if let Some(i) = first_hit(&self.buttons, |b| b.rect.overlaps(&hull)) {
                    events.push(GameEvent::ButtonPressed(self.buttons[i].kind));
                }
            }
            Mode::Quiz { .. } => {
                let Some(quiz) = &mut self.quiz else {
                    return;
                };
                if let Some(i) = first_hit(&answer_rects(self.config.size()), |r| r.overlaps(&hull)) {
                    if let Some(verdict) = quiz.answer(i, &mut self.score, &mut self.rng) {
                        self.cooldown = self.config.transition_cooldown;
                        events.push(GameEvent::QuizAnswered(verdict));
                    }
                } else if self.buttons.iter().any(|b| b.rect.overlaps(&hull)) {
                    events.push(GameEvent::ButtonPressed(ButtonKind::Back));
                }
                if quiz.take_reposition() {
                    let anchor = self.quiz_anchor();
                    self.rocket.reposition(anchor);
                }
            }
            _ => {}
        }
    }

    fn page_gallery(&mut self, events: &mut Vec<GameEvent>) {
        let n = self.catalog.history.len();
        let width = self.config.width;
        let x = self.rocket.pos.x;
        if x > width - GALLERY_EDGE {
            self.rocket.pos.x = GALLERY_EDGE + 1.0;
            if n > 0 {
                self.gallery = (self.gallery + 1) % n;
            }
        } else if x < GALLERY_EDGE {
            self.rocket.pos.x = width - GALLERY_EDGE - 1.0;
            if n > 0 {
                self.gallery = (self.gallery + n - 1) % n;
            }
        } else {
            return;
        }
        log::debug!("Gallery slide {}", self.gallery);
        events.push(GameEvent::SlideChanged(self.gallery));
    }
}

fn fly(rocket: &mut Rocket, input: &InputSnapshot, ctx: &mut StepContext) {
    entity::update(
        EntityMut::Rocket {
            rocket,
            controls: input.controls(),
            bounds: Bounds::Wrap,
        },
        ctx,
    );
}

fn trigger_for(event: GameEvent) -> Option<Trigger> {
    match event {
        GameEvent::EnteredPlanet(i) => Some(Trigger::EnterPlanet(i)),
        GameEvent::ButtonPressed(kind) => Some(Trigger::Button(kind)),
        GameEvent::PlatformerExit => Some(Trigger::PlatformerExit),
        _ => None,
    }
}
