use serde::{Deserialize, Serialize};

use crate::config::EscapeRules;
use crate::sim::button::ButtonKind;

/// The screen the game is showing. Planet-bound modes carry an index into
/// the world's planet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    SolarSystem,
    PlanetSurface { planet: usize },
    Quiz { planet: usize },
    Platformer { planet: usize },
    InfoPanel { planet: usize },
    DevGallery,
}

/// `Mode` without its payload, for configuration and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    Menu,
    SolarSystem,
    PlanetSurface,
    Quiz,
    Platformer,
    InfoPanel,
    DevGallery,
}

impl ModeKind {
    pub fn title(self) -> &'static str {
        match self {
            ModeKind::Menu => "Menu",
            ModeKind::SolarSystem => "Solar System",
            ModeKind::PlanetSurface => "Planet",
            ModeKind::Quiz => "Quiz",
            ModeKind::Platformer => "Explore",
            ModeKind::InfoPanel => "Facts",
            ModeKind::DevGallery => "Development",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Launch,
    Development,
    EnterPlanet(usize),
    Button(ButtonKind),
    Back,
    Escape,
    PlatformerExit,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Menu => ModeKind::Menu,
            Mode::SolarSystem => ModeKind::SolarSystem,
            Mode::PlanetSurface { .. } => ModeKind::PlanetSurface,
            Mode::Quiz { .. } => ModeKind::Quiz,
            Mode::Platformer { .. } => ModeKind::Platformer,
            Mode::InfoPanel { .. } => ModeKind::InfoPanel,
            Mode::DevGallery => ModeKind::DevGallery,
        }
    }

    pub fn planet(&self) -> Option<usize> {
        match *self {
            Mode::PlanetSurface { planet }
            | Mode::Quiz { planet }
            | Mode::Platformer { planet }
            | Mode::InfoPanel { planet } => Some(planet),
            _ => None,
        }
    }

    /// Where `trigger` leads from here, or `None` if this mode ignores it.
    pub fn transition(self, trigger: Trigger, escape: &EscapeRules) -> Option<Mode> {
        if trigger == Trigger::Escape {
            if self == Mode::Menu {
                return None;
            }
            if escape.goes_to_menu(self.kind()) {
                return Some(Mode::Menu);
            }
            return self.transition(Trigger::Back, escape);
        }

        match (self, trigger) {
            (Mode::Menu, Trigger::Launch) => Some(Mode::SolarSystem),
            (Mode::Menu, Trigger::Development) => Some(Mode::DevGallery),

            (Mode::SolarSystem, Trigger::EnterPlanet(planet)) => Some(Mode::PlanetSurface { planet }),
            (Mode::SolarSystem, Trigger::Back) => Some(Mode::Menu),

            (Mode::PlanetSurface { planet }, Trigger::Button(kind)) => match kind {
                ButtonKind::Facts => Some(Mode::InfoPanel { planet }),
                ButtonKind::Quiz => Some(Mode::Quiz { planet }),
                ButtonKind::Explore => Some(Mode::Platformer { planet }),
                ButtonKind::Back => Some(Mode::SolarSystem),
            },
            (Mode::PlanetSurface { .. }, Trigger::Back) => Some(Mode::SolarSystem),

            (Mode::Quiz { planet }, Trigger::Back | Trigger::Button(ButtonKind::Back))
            | (Mode::InfoPanel { planet }, Trigger::Back | Trigger::Button(ButtonKind::Back))
            | (Mode::Platformer { planet }, Trigger::Back | Trigger::PlatformerExit) => {
                Some(Mode::PlanetSurface { planet })
            }

            (Mode::DevGallery, Trigger::Back) => Some(Mode::Menu),

            _ => None,
        }
    }
}
