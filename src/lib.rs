//! Zoops: a deterministic artificial-life ecosystem on a toroidal world.
//!
//! [`world::SimulationWorld`] owns all state and is usable on its own; the plugins wire it into a
//! headless Bevy app.

pub mod config;
pub mod organisms;
pub mod world;

pub use config::{ConfigError, RunnerConfig, WorldConfig};
pub use organisms::OrganismPlugin;
pub use world::{SimulationPlugin, SimulationWorld};
