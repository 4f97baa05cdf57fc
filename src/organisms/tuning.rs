use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::organisms::genetics::{GeneBounds, GeneRange, Genes};

/// How the plant population is regulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantMode {
    /// Eaten plants are removed; living plants spread locally and a rescue floor tops the
    /// population back up.
    #[default]
    Spread,
    /// Eaten plants go dormant and regrow after a delay, near where they were eaten or
    /// occasionally anywhere. The population stays at its initial size.
    Regrow,
}

/// Immutable per-world parameters.
///
/// The world trusts these to be internally consistent; `WorldConfig::to_params` is where
/// user input gets normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    // Zoop energy economy
    pub zoop_starting_energy: f32,
    pub zoop_max_energy: f32,
    pub zoop_metabolism_per_second: f32,

    // Plants
    pub plant_energy_gain: f32,
    /// Only the first plant at rebuild is placed here.
    pub plant_spawn_hint: Vec2,
    pub plant_bounds_inset: f32,
    pub plant_mode: PlantMode,

    // Spread ecology
    pub plant_min_count: usize,
    /// Hard ceiling on plants. Zero means unbounded.
    pub plant_max_count: usize,
    pub plant_spread_interval_seconds: f32,
    pub plant_spread_chance: f32,
    pub plant_spread_radius: f32,
    pub plant_rescue_interval_seconds: f32,
    pub plant_rescue_batch_size: usize,

    // Regrow mode
    pub plant_respawn_seconds: f32,
    pub plant_regrow_radius: f32,
    pub plant_long_jump_chance: f32,

    // Interaction
    pub eat_radius: f32,

    // Counts
    pub initial_zoop_count: usize,
    pub initial_plant_count: usize,

    // Genes
    pub default_genes: Genes,
    /// One-time jitter applied to founders only.
    pub founder_gene_sigma_fraction: f32,
    pub gene_bounds: GeneBounds,

    // Reproduction
    pub repro_cooldown_seconds: f32,
    /// Share of energy the parent keeps when splitting, exclusive `(0, 1)`.
    pub repro_parent_energy_fraction: f32,
    pub mutation_sigma_fraction: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            zoop_starting_energy: 20.0,
            zoop_max_energy: 20.0,
            zoop_metabolism_per_second: 1.0,

            plant_energy_gain: 6.0,
            plant_spawn_hint: Vec2::new(4.0, 2.0),
            plant_bounds_inset: 0.25,
            plant_mode: PlantMode::Spread,

            plant_min_count: 10,
            plant_max_count: 80,
            plant_spread_interval_seconds: 0.75,
            plant_spread_chance: 0.25,
            plant_spread_radius: 2.25,
            plant_rescue_interval_seconds: 1.0,
            plant_rescue_batch_size: 6,

            plant_respawn_seconds: 3.0,
            plant_regrow_radius: 3.5,
            plant_long_jump_chance: 0.15,

            eat_radius: 0.4,

            initial_zoop_count: 8,
            initial_plant_count: 3,

            default_genes: Genes::new(2.5, 6.0, 18.0),
            founder_gene_sigma_fraction: 0.03,
            gene_bounds: GeneBounds {
                move_speed: GeneRange::new(0.5, 6.0),
                vision_range: GeneRange::new(0.5, 20.0),
                repro_threshold: GeneRange::new(1.0, 100.0),
            },

            repro_cooldown_seconds: 3.0,
            repro_parent_energy_fraction: 0.65,
            mutation_sigma_fraction: 0.05,
        }
    }
}

impl SimulationParams {
    /// Plant ceiling as a count, treating zero as unbounded.
    pub fn plant_capacity(&self) -> usize {
        if self.plant_max_count == 0 {
            usize::MAX
        } else {
            self.plant_max_count
        }
    }

    pub fn reproduction_enabled(&self) -> bool {
        self.repro_parent_energy_fraction > 0.0 && self.repro_parent_energy_fraction < 1.0
    }

    pub fn spread_enabled(&self) -> bool {
        self.plant_spread_interval_seconds > 0.0
            && self.plant_spread_chance > 0.0
            && self.plant_spread_radius > 0.0
    }

    pub fn rescue_enabled(&self) -> bool {
        self.plant_rescue_interval_seconds > 0.0 && self.plant_rescue_batch_size > 0
    }
}
