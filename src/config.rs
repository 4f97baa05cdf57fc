use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::organisms::{GeneBounds, GeneRange, Genes, PlantMode, SimulationParams};
use crate::world::WorldBounds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// How the headless runner drives the world.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Multiplier on real time; 0 pauses.
    pub sim_speed: f32,
    /// Physics ticks per simulated second.
    pub physics_hz: f32,
    /// Brain ticks per simulated second.
    pub brain_hz: f32,
    /// Frames per real second of the app loop.
    pub frame_hz: f32,
    /// Stop after this many physics ticks.
    pub max_ticks: Option<u64>,
    /// Ticks between ecosystem summaries (0 = never).
    pub stats_interval_ticks: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            sim_speed: 1.0,
            physics_hz: 10.0,
            brain_hz: 8.0,
            frame_hz: 60.0,
            max_ticks: None,
            stats_interval_ticks: 100,
        }
    }
}

impl RunnerConfig {
    /// Rates pulled into the ranges the runner supports. Non-finite values fall back to the
    /// defaults.
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        Self {
            sim_speed: bounded(self.sim_speed, 0.0, 10.0, defaults.sim_speed),
            physics_hz: bounded(self.physics_hz, 1.0, 120.0, defaults.physics_hz),
            brain_hz: bounded(self.brain_hz, 0.1, 60.0, defaults.brain_hz),
            frame_hz: bounded(self.frame_hz, 1.0, 240.0, defaults.frame_hz),
            max_ticks: self.max_ticks,
            stats_interval_ticks: self.stats_interval_ticks,
        }
    }
}

/// User-facing world configuration, as loaded from JSON.
///
/// Values are taken as written; [`WorldConfig::to_params`] repairs anything inconsistent before
/// the world sees it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Deterministic seed. `None` draws a random one at startup.
    pub seed: Option<u64>,

    // World bounds
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,

    // Initial spawns
    pub initial_zoop_count: usize,
    pub initial_plant_count: usize,

    // Zoop energy
    pub zoop_starting_energy: f32,
    pub zoop_max_energy: f32,
    pub zoop_metabolism_per_second: f32,

    // Plants
    pub plant_spawn_x: f32,
    pub plant_spawn_y: f32,
    pub plant_energy_gain: f32,
    pub plant_respawn_seconds: f32,
    pub plant_mode: PlantMode,

    // Plant population dynamics
    pub plant_min_count: usize,
    pub plant_max_count: usize,
    pub plant_spread_interval_seconds: f32,
    pub plant_spread_chance: f32,
    pub plant_spread_radius: f32,
    pub plant_rescue_interval_seconds: f32,
    pub plant_rescue_batch_size: usize,

    // Plant regrowth
    pub plant_regrow_radius: f32,
    pub plant_long_jump_chance: f32,
    pub plant_bounds_inset: f32,

    // Movement / eating
    /// Used when `gene_default_move_speed` is not positive.
    pub zoop_speed: f32,
    pub eat_radius: f32,

    // Gene defaults
    pub gene_default_move_speed: f32,
    pub gene_default_vision_range: f32,
    pub gene_default_repro_threshold: f32,
    pub founder_gene_sigma_fraction: f32,

    // Gene clamps
    pub gene_min_move_speed: f32,
    pub gene_max_move_speed: f32,
    pub gene_min_vision_range: f32,
    pub gene_max_vision_range: f32,
    pub gene_min_repro_threshold: f32,
    pub gene_max_repro_threshold: f32,

    // Reproduction
    pub repro_cooldown_seconds: f32,
    /// Share of energy the parent keeps when splitting.
    pub repro_parent_energy_fraction: f32,

    // Mutation
    pub mutation_sigma_fraction: f32,

    pub runner: RunnerConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: Some(12345),

            min_x: -10.0,
            max_x: 10.0,
            min_y: -10.0,
            max_y: 10.0,

            initial_zoop_count: 8,
            initial_plant_count: 3,

            zoop_starting_energy: 20.0,
            zoop_max_energy: 20.0,
            zoop_metabolism_per_second: 1.0,

            plant_spawn_x: 4.0,
            plant_spawn_y: 2.0,
            plant_energy_gain: 6.0,
            plant_respawn_seconds: 3.0,
            plant_mode: PlantMode::Spread,

            plant_min_count: 10,
            plant_max_count: 80,
            plant_spread_interval_seconds: 0.75,
            plant_spread_chance: 0.25,
            plant_spread_radius: 2.25,
            plant_rescue_interval_seconds: 1.0,
            plant_rescue_batch_size: 6,

            plant_regrow_radius: 3.5,
            plant_long_jump_chance: 0.15,
            plant_bounds_inset: 0.25,

            zoop_speed: 2.5,
            eat_radius: 0.4,

            gene_default_move_speed: 0.0,
            gene_default_vision_range: 6.0,
            gene_default_repro_threshold: 18.0,
            founder_gene_sigma_fraction: 0.03,

            gene_min_move_speed: 0.5,
            gene_max_move_speed: 6.0,
            gene_min_vision_range: 0.5,
            gene_max_vision_range: 20.0,
            gene_min_repro_threshold: 1.0,
            gene_max_repro_threshold: 100.0,

            repro_cooldown_seconds: 3.0,
            repro_parent_energy_fraction: 0.65,

            mutation_sigma_fraction: 0.05,

            runner: RunnerConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// World rectangle, with an inverted axis swapped back into order.
    pub fn bounds(&self) -> WorldBounds {
        let (min_x, max_x) = ordered(self.min_x, self.max_x);
        let (min_y, max_y) = ordered(self.min_y, self.max_y);
        WorldBounds::new(min_x, max_x, min_y, max_y)
    }

    /// Normalize into parameters the world can trust without re-checking.
    pub fn to_params(&self) -> SimulationParams {
        let starting_energy = non_negative(self.zoop_starting_energy);
        let mut max_energy = non_negative(self.zoop_max_energy);
        if max_energy <= 0.0 || max_energy < starting_energy {
            max_energy = starting_energy;
        }

        let plant_min_count = self.plant_min_count;
        let plant_max_count = self.plant_max_count.max(1).max(plant_min_count);
        let initial_plant_count = self.initial_plant_count.clamp(1, plant_max_count);

        let default_move_speed = if self.gene_default_move_speed > 0.0 {
            self.gene_default_move_speed
        } else {
            non_negative(self.zoop_speed)
        };

        let gene_bounds = GeneBounds {
            move_speed: gene_range(self.gene_min_move_speed, self.gene_max_move_speed),
            vision_range: gene_range(self.gene_min_vision_range, self.gene_max_vision_range),
            repro_threshold: gene_range(
                self.gene_min_repro_threshold,
                self.gene_max_repro_threshold,
            ),
        };

        SimulationParams {
            zoop_starting_energy: starting_energy,
            zoop_max_energy: max_energy,
            zoop_metabolism_per_second: non_negative(self.zoop_metabolism_per_second),

            plant_energy_gain: non_negative(self.plant_energy_gain),
            plant_spawn_hint: Vec2::new(self.plant_spawn_x, self.plant_spawn_y),
            plant_bounds_inset: non_negative(self.plant_bounds_inset),
            plant_mode: self.plant_mode,

            plant_min_count,
            plant_max_count,
            plant_spread_interval_seconds: non_negative(self.plant_spread_interval_seconds),
            plant_spread_chance: unit(self.plant_spread_chance),
            plant_spread_radius: non_negative(self.plant_spread_radius),
            plant_rescue_interval_seconds: non_negative(self.plant_rescue_interval_seconds),
            plant_rescue_batch_size: self.plant_rescue_batch_size.max(1),

            plant_respawn_seconds: non_negative(self.plant_respawn_seconds),
            plant_regrow_radius: non_negative(self.plant_regrow_radius),
            plant_long_jump_chance: unit(self.plant_long_jump_chance),

            eat_radius: non_negative(self.eat_radius),

            initial_zoop_count: self.initial_zoop_count.max(1),
            initial_plant_count,

            default_genes: Genes::new(
                default_move_speed,
                non_negative(self.gene_default_vision_range),
                non_negative(self.gene_default_repro_threshold),
            ),
            founder_gene_sigma_fraction: non_negative(self.founder_gene_sigma_fraction),
            gene_bounds,

            repro_cooldown_seconds: non_negative(self.repro_cooldown_seconds),
            repro_parent_energy_fraction: unit(self.repro_parent_energy_fraction),
            mutation_sigma_fraction: non_negative(self.mutation_sigma_fraction),
        }
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn bounded(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(min, max)
    } else {
        fallback
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

fn gene_range(min: f32, max: f32) -> GeneRange {
    let (min, max) = ordered(non_negative(min), non_negative(max));
    GeneRange::new(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_normalize_to_default_params() {
        assert_eq!(WorldConfig::default().to_params(), SimulationParams::default());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "seed": 7, "initial_zoop_count": 3, "plant_mode": "regrow", "runner": { "max_ticks": 50 } }"#,
        )
        .expect("valid json");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.initial_zoop_count, 3);
        assert_eq!(config.plant_mode, PlantMode::Regrow);
        assert_eq!(config.runner.max_ticks, Some(50));
        assert_eq!(config.runner.physics_hz, 10.0);
        assert_eq!(config.eat_radius, 0.4);
    }

    #[test]
    fn inconsistent_values_are_repaired() {
        let config = WorldConfig {
            zoop_starting_energy: 30.0,
            zoop_max_energy: 10.0,
            plant_min_count: 50,
            plant_max_count: 20,
            initial_plant_count: 0,
            initial_zoop_count: 0,
            plant_rescue_batch_size: 0,
            plant_spread_chance: 4.0,
            repro_parent_energy_fraction: -0.5,
            gene_default_move_speed: 0.0,
            zoop_speed: 3.0,
            gene_min_vision_range: 9.0,
            gene_max_vision_range: 2.0,
            max_x: -20.0,
            ..WorldConfig::default()
        };

        let params = config.to_params();
        assert_eq!(params.zoop_max_energy, 30.0);
        assert_eq!(params.plant_max_count, 50);
        assert_eq!(params.initial_plant_count, 1);
        assert_eq!(params.initial_zoop_count, 1);
        assert_eq!(params.plant_rescue_batch_size, 1);
        assert_eq!(params.plant_spread_chance, 1.0);
        assert_eq!(params.repro_parent_energy_fraction, 0.0);
        assert!(!params.reproduction_enabled());
        assert_eq!(params.default_genes.move_speed, 3.0);
        assert_eq!(params.gene_bounds.vision_range, GeneRange::new(2.0, 9.0));

        let bounds = config.bounds();
        assert_eq!((bounds.min_x, bounds.max_x), (-20.0, -10.0));
    }

    #[test]
    fn runner_rates_are_pulled_into_range() {
        let runner = RunnerConfig {
            sim_speed: 1.0e30,
            physics_hz: 0.0,
            brain_hz: 1000.0,
            frame_hz: 1.0e-30,
            max_ticks: Some(9),
            stats_interval_ticks: 5,
        }
        .normalized();
        assert_eq!(runner.sim_speed, 10.0);
        assert_eq!(runner.physics_hz, 1.0);
        assert_eq!(runner.brain_hz, 60.0);
        assert_eq!(runner.frame_hz, 1.0);
        assert_eq!(runner.max_ticks, Some(9));
        assert_eq!(runner.stats_interval_ticks, 5);

        let runner = RunnerConfig {
            sim_speed: -2.0,
            frame_hz: f32::NAN,
            ..RunnerConfig::default()
        }
        .normalized();
        assert_eq!(runner.sim_speed, 0.0);
        assert_eq!(runner.frame_hz, 60.0);
        assert_eq!(RunnerConfig::default().normalized(), RunnerConfig::default());
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = WorldConfig::load("/definitely/not/here/zoops.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("zoops.json"));
    }
}
