//! Static planet catalog: orbit data, facts, and quiz banks.
//!
//! A built-in catalog ships with the binary. A JSON file with the same shape
//! can replace it at startup; if that file is unusable the built-in table is
//! kept and a warning is logged.

use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::sim::quiz::QuizQuestion;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetEntry {
    pub name: String,
    pub color: [u8; 3],
    pub radius: f32,
    pub orbit: f32,
    pub speed: f32,
    #[serde(default)]
    pub is_star: bool,
    #[serde(default)]
    pub has_rings: bool,
    /// Title line first, then one short fact per line.
    pub facts: Vec<String>,
    /// Longer paragraphs revealed by the platformer's info buttons.
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl PlanetEntry {
    pub fn rgb(&self) -> Color {
        Color::Rgb(self.color[0], self.color[1], self.color[2])
    }

    /// Texts for the platformer's info buttons. Planets without dedicated
    /// paragraphs fall back to their fact lines (minus the title).
    pub fn button_texts(&self) -> Vec<String> {
        if !self.paragraphs.is_empty() {
            return self.paragraphs.clone();
        }
        self.facts.iter().skip(1).cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub planets: Vec<PlanetEntry>,
    /// Development-history slides shown in the gallery.
    #[serde(default)]
    pub history: Vec<String>,
}

impl Catalog {
    #[cfg(test)]
    pub fn planet(&self, name: &str) -> Option<&PlanetEntry> {
        self.planets.iter().find(|p| p.name == name)
    }

    /// Load a catalog file, falling back to the built-in one on any error.
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::read(path) {
            Ok(catalog) if !catalog.planets.is_empty() => {
                log::info!(
                    "Loaded content catalog from {} ({} bodies)",
                    path.display(),
                    catalog.planets.len()
                );
                catalog
            }
            Ok(_) => {
                log::warn!("Content catalog {} has no planets, using built-in", path.display());
                Self::builtin()
            }
            Err(e) => {
                log::warn!("Could not load content catalog {}: {e:#}, using built-in", path.display());
                Self::builtin()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn builtin() -> Self {
        Self {
            planets: vec![
                sun(),
                mercury(),
                venus(),
                earth(),
                mars(),
                jupiter(),
                saturn(),
                uranus(),
                neptune(),
            ],
            history: history(),
        }
    }
}

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| t.to_string()).collect()
}

fn q(prompt: &str, answers: [&str; 4], correct: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: prompt.to_string(),
        answers: answers.iter().map(|a| a.to_string()).collect(),
        correct,
    }
}

fn body(name: &str, color: [u8; 3], radius: f32, orbit: f32, speed: f32) -> PlanetEntry {
    PlanetEntry {
        name: name.to_string(),
        color,
        radius,
        orbit,
        speed,
        is_star: false,
        has_rings: false,
        facts: Vec::new(),
        paragraphs: Vec::new(),
        quiz: Vec::new(),
    }
}

fn sun() -> PlanetEntry {
    PlanetEntry {
        is_star: true,
        facts: s(&[
            "The Sun - Our Star",
            "Temperature: 5,500°C (surface)",
            "Age: 4.6 billion years",
            "Type: Yellow Dwarf Star",
            "Contains 99.86% of solar system's mass",
            "Powered by nuclear fusion",
        ]),
        quiz: vec![
            q("What type of star is the Sun?", ["Yellow Dwarf", "Red Giant", "White Dwarf", "Neutron Star"], 0),
            q("How long does it take sunlight to reach Earth?", ["8 minutes", "2 minutes", "30 minutes", "1 second"], 0),
            q("What is the Sun's core temperature?", ["15 million °C", "5,500 °C", "1 million °C", "100,000 °C"], 0),
            q("What process powers the Sun?", ["Nuclear Fusion", "Nuclear Fission", "Chemical Burning", "Solar Wind"], 0),
            q("What is the Sun's outermost layer called?", ["Corona", "Photosphere", "Chromosphere", "Core"], 0),
            q("What percentage of the solar system's mass is in the Sun?", ["99.86%", "75%", "85%", "95%"], 0),
        ],
        ..body("Sun", [255, 200, 50], 40.0, 0.0, 0.0)
    }
}

fn mercury() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Mercury - The Smallest Planet",
            "Temperature: -180°C to 430°C",
            "No moons",
            "Closest planet to the Sun",
            "Year length: 88 Earth days",
            "No atmosphere",
        ]),
        quiz: vec![
            q("What is Mercury's position from the Sun?", ["First", "Second", "Third", "Fourth"], 0),
            q("How long is a year on Mercury?", ["88 Earth days", "225 Earth days", "365 Earth days", "687 Earth days"], 0),
            q("What is Mercury's surface temperature range?", ["-180°C to 430°C", "-50°C to 100°C", "0°C to 100°C", "-100°C to 200°C"], 0),
            q("How many moons does Mercury have?", ["None", "One", "Two", "Three"], 0),
            q("What is Mercury named after?", ["Roman messenger god", "Greek war god", "Norse thunder god", "Egyptian sun god"], 0),
            q("What is Mercury's atmosphere like?", ["Almost none", "Thick and cloudy", "Thin but breathable", "Mostly hydrogen"], 0),
        ],
        ..body("Mercury", [169, 169, 169], 10.0, 100.0, 0.02)
    }
}

fn venus() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Venus - The Hottest Planet",
            "Temperature: 462°C",
            "Rotates backwards",
            "Similar size to Earth",
            "Thick atmosphere of CO2",
            "No moons",
        ]),
        quiz: vec![
            q("What is Venus's most notable feature?", ["Ring System", "Great Red Spot", "Thick Atmosphere", "Ice Caps"], 2),
            q("Why is Venus so hot?", ["Greenhouse effect", "Close to Sun", "Volcanic activity", "Core temperature"], 0),
            q("What direction does Venus rotate?", ["Backwards", "Forwards", "Doesn't rotate", "Sideways"], 0),
            q("What is Venus's surface temperature?", ["462°C", "100°C", "250°C", "350°C"], 0),
            q("What is Venus often called?", ["Earth's twin", "Red Planet", "Gas Giant", "Ice Planet"], 0),
            q("What makes up most of Venus's atmosphere?", ["Carbon dioxide", "Nitrogen", "Oxygen", "Hydrogen"], 0),
        ],
        ..body("Venus", [255, 198, 73], 15.0, 150.0, 0.015)
    }
}

fn earth() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Earth - Our Home Planet",
            "Temperature: -88°C to 58°C",
            "One moon",
            "Only known planet with life",
            "71% covered by water",
            "24-hour day cycle",
        ]),
        paragraphs: s(&[
            "Earth's atmosphere is a complex system that protects all life. The atmosphere is 78% nitrogen and 21% oxygen, with small amounts of other gases. The ozone layer blocks harmful UV radiation from reaching the surface.",
            "Earth's surface is a dynamic landscape shaped by powerful forces. 70% is covered by oceans containing liquid water, a unique feature in our solar system. The remaining 30% consists of continents with mountains, forests, and deserts.",
            "Earth's core is an incredible powerhouse. Its temperature matches the Sun's surface at about 5,400°C. This molten core generates a magnetic field that protects us from harmful solar radiation.",
            "Earth completes one rotation every 24 hours, giving us day and night. The planet's 23.5-degree tilt causes our seasons as we orbit the Sun. One orbit takes 365.25 days, which is why we have leap years.",
            "Earth's gravity, averaging 9.8 m/s², keeps everything grounded. It holds our atmosphere in place and keeps the Moon in orbit. The Moon influences our tides and helps stabilize Earth's tilt.",
        ]),
        quiz: vec![
            q("How many moons does Earth have?", ["None", "One", "Two", "Three"], 1),
            q("What makes Earth unique in our solar system?", ["Known life", "Has water", "Has atmosphere", "Has a moon"], 0),
            q("What percentage of Earth is covered by water?", ["51%", "61%", "71%", "81%"], 2),
            q("How long is Earth's day cycle?", ["12 hours", "24 hours", "36 hours", "48 hours"], 1),
            q("What is Earth's core made of?", ["Iron and nickel", "Rock and magma", "Gold and silver", "Ice and rock"], 0),
            q("What protects Earth from solar radiation?", ["Magnetic field", "Atmosphere", "Ozone layer", "All of these"], 3),
        ],
        ..body("Earth", [100, 149, 237], 18.0, 200.0, 0.01)
    }
}

fn mars() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Mars - The Red Planet",
            "Temperature: -140°C to 20°C",
            "Two moons: Phobos and Deimos",
            "Has the largest volcano in the solar system",
            "Possible future human colony",
            "Year length: 687 Earth days",
        ]),
        quiz: vec![
            q("What gives Mars its red color?", ["Iron Oxide", "Methane", "Sulfur", "Carbon Dioxide"], 0),
            q("What is the name of Mars's largest volcano?", ["Olympus Mons", "Mount Everest", "Mauna Kea", "Valles Marineris"], 0),
            q("How many moons does Mars have?", ["Two", "One", "Three", "None"], 0),
            q("What is Mars's year length in Earth days?", ["687", "365", "550", "825"], 0),
            q("What is the largest canyon on Mars called?", ["Valles Marineris", "Grand Canyon", "Hellas Basin", "Argyre Planitia"], 0),
            q("What evidence suggests Mars once had water?", ["Dried riverbeds", "Blue color", "Cloud formations", "Plant fossils"], 0),
        ],
        ..body("Mars", [205, 127, 50], 14.0, 250.0, 0.008)
    }
}

fn jupiter() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Jupiter - The Largest Planet",
            "Temperature: -110°C (cloud top)",
            "79 known moons",
            "Great Red Spot is a giant storm",
            "More than twice the mass of all other planets combined",
            "Year length: 12 Earth years",
        ]),
        quiz: vec![
            q("What is Jupiter's most famous feature?", ["Ice Caps", "Great Red Spot", "Ring System", "Water Oceans"], 1),
            q("What type of planet is Jupiter?", ["Gas giant", "Rocky planet", "Ice giant", "Dwarf planet"], 0),
            q("How many known moons does Jupiter have?", ["79", "50", "63", "92"], 0),
            q("How long is Jupiter's year in Earth years?", ["12", "8", "15", "20"], 0),
            q("What is Jupiter's Great Red Spot?", ["A storm", "A volcano", "A crater", "An ocean"], 0),
            q("Which moon of Jupiter might have life?", ["Europa", "Io", "Ganymede", "Callisto"], 0),
        ],
        ..body("Jupiter", [255, 198, 73], 40.0, 320.0, 0.005)
    }
}

fn saturn() -> PlanetEntry {
    PlanetEntry {
        has_rings: true,
        facts: s(&[
            "Saturn - The Ringed Planet",
            "Temperature: -178°C",
            "82 confirmed moons",
            "Famous for its beautiful rings",
            "Could float in water (if there was a big enough pool)",
            "Year length: 29.5 Earth years",
        ]),
        quiz: vec![
            q("What is Saturn most famous for?", ["Great Red Spot", "Blue Color", "Ring System", "High Temperature"], 2),
            q("What are Saturn's rings made of?", ["Ice and rock", "Gas clouds", "Metal debris", "Liquid hydrogen"], 0),
            q("How many confirmed moons does Saturn have?", ["82", "63", "45", "95"], 0),
            q("What is unique about Saturn's density?", ["Could float in water", "Heaviest planet", "Densest atmosphere", "Solid core"], 0),
            q("Which is Saturn's largest moon?", ["Titan", "Enceladus", "Mimas", "Rhea"], 0),
            q("How wide are Saturn's rings?", ["175,000 miles", "50,000 miles", "100,000 miles", "25,000 miles"], 0),
        ],
        ..body("Saturn", [238, 232, 205], 35.0, 400.0, 0.003)
    }
}

fn uranus() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Uranus - The Sideways Planet",
            "Temperature: -224°C",
            "27 known moons",
            "Rotates on its side",
            "First planet discovered by telescope",
            "Year length: 84 Earth years",
        ]),
        quiz: vec![
            q("What is unique about Uranus's rotation?", ["Very Fast", "Rotates Backwards", "Rotates on its Side", "Doesn't Rotate"], 2),
            q("What type of planet is Uranus?", ["Ice giant", "Gas giant", "Rocky planet", "Dwarf planet"], 0),
            q("How many known moons does Uranus have?", ["27", "15", "32", "21"], 0),
            q("What is Uranus's temperature?", ["-224°C", "-180°C", "-150°C", "-200°C"], 0),
            q("What gives Uranus its blue-green color?", ["Methane gas", "Water ice", "Ammonia clouds", "Hydrogen"], 0),
            q("Who discovered Uranus?", ["William Herschel", "Galileo Galilei", "Johannes Kepler", "Edwin Hubble"], 0),
        ],
        ..body("Uranus", [173, 216, 230], 25.0, 470.0, 0.002)
    }
}

fn neptune() -> PlanetEntry {
    PlanetEntry {
        facts: s(&[
            "Neptune - The Windy Planet",
            "Temperature: -214°C",
            "14 known moons",
            "Strongest winds in the solar system",
            "The most distant planet",
            "Year length: 165 Earth years",
        ]),
        quiz: vec![
            q("What is Neptune known for?", ["Strongest Winds", "Highest Temperature", "Most Moons", "Closest to Sun"], 0),
            q("How fast are Neptune's strongest winds?", ["2,100 km/h", "1,200 km/h", "800 km/h", "1,500 km/h"], 0),
            q("How many known moons does Neptune have?", ["14", "8", "21", "17"], 0),
            q("How long is Neptune's year in Earth years?", ["165", "120", "200", "150"], 0),
            q("What is Neptune's largest moon?", ["Triton", "Nereid", "Naiad", "Thalassa"], 0),
            q("What makes Neptune blue?", ["Methane gas", "Water ice", "Nitrogen", "Hydrogen"], 0),
        ],
        ..body("Neptune", [60, 60, 200], 24.0, 520.0, 0.001)
    }
}

fn history() -> Vec<String> {
    s(&[
        "v0.1 - A white triangle that wraps around a black screen. Thrust, drag, and nothing else.",
        "v0.2 - Planets appear on tilted circular orbits with fading trails. Flying into one opens a fact panel.",
        "v0.3 - Quizzes: fly into the right answer. Asteroids, comets, and bouncing bullets join the sky.",
        "v0.4 - Planet views with buttons, a menu, and a side-scrolling walk across Earth with info buttons.",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_sun_first() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.planets[0].name, "Sun");
        assert!(catalog.planets[0].is_star);
        assert_eq!(catalog.planets.len(), 9);
    }

    #[test]
    fn test_builtin_quiz_answers_valid() {
        for planet in Catalog::builtin().planets {
            assert!(!planet.quiz.is_empty(), "{} has no quiz", planet.name);
            for question in &planet.quiz {
                assert!(question.correct < question.answers.len());
            }
        }
    }

    #[test]
    fn test_saturn_has_rings() {
        let catalog = Catalog::builtin();
        assert!(catalog.planet("Saturn").unwrap().has_rings);
        assert!(!catalog.planet("Mars").unwrap().has_rings);
    }

    #[test]
    fn test_button_texts_fallback_to_facts() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.planet("Earth").unwrap().button_texts().len(), 5);
        let mars = catalog.planet("Mars").unwrap();
        assert_eq!(mars.button_texts().len(), mars.facts.len() - 1);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let catalog = Catalog::load_or_builtin(Path::new("/nonexistent/content.json"));
        assert_eq!(catalog.planets.len(), 9);
    }

    #[test]
    fn test_json_round_trip_shape() {
        let json = r#"{
            "planets": [
                { "name": "Vulcan", "color": [200, 40, 40], "radius": 12.0,
                  "orbit": 60.0, "speed": 0.03, "facts": ["Vulcan"] }
            ]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let vulcan = catalog.planet("Vulcan").unwrap();
        assert!(vulcan.quiz.is_empty());
        assert!(!vulcan.is_star);
        assert!(catalog.history.is_empty());
    }
}
