//! Simulation core.
//!
//! Everything in here advances one fixed 60 Hz frame at a time and never
//! touches the terminal. Randomness comes from the `StdRng` owned by
//! [`world::World`], so a seeded world replays identically.

pub mod bullet;
pub mod button;
pub mod collision;
pub mod entity;
pub mod hazards;
pub mod mode;
pub mod motion;
pub mod planet;
pub mod platformer;
pub mod quiz;
pub mod rocket;
pub mod world;

pub use mode::{Mode, ModeKind};
pub use world::{GameEvent, World};
