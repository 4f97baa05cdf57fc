mod behavior;
mod components;
mod ecosystem_stats;
mod genetics;
pub(crate) mod systems;
mod tuning;

use bevy::prelude::*;
pub use behavior::*;
pub use components::*;
pub use ecosystem_stats::*;
pub use genetics::*;
pub use tuning::*;

use crate::world::SimulationSet;

/// Population bookkeeping on top of [`crate::world::SimulationPlugin`].
pub struct OrganismPlugin {
    pub stats_interval_ticks: u64,
}

impl Default for OrganismPlugin {
    fn default() -> Self {
        Self {
            stats_interval_ticks: 100,
        }
    }
}

impl Plugin for OrganismPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(EcosystemStats::with_interval(self.stats_interval_ticks))
            .add_systems(
                Update,
                collect_ecosystem_stats.in_set(SimulationSet::Observe),
            );
    }
}
