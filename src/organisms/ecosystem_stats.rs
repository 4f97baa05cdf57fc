use bevy::prelude::*;

use crate::organisms::components::EntityKind;
use crate::organisms::genetics::Genes;
use crate::world::{SimEvent, SimEventType, SimulationWorld};

/// Population summary, refreshed every `interval_ticks` physics ticks.
#[derive(Resource, Debug, Clone)]
pub struct EcosystemStats {
    pub live_zoops: usize,
    pub live_plants: usize,
    pub mean_energy: f32,
    /// Mean genes across living zoops; `None` when nobody is alive.
    pub mean_genes: Option<Genes>,

    /// Cumulative since the app started.
    pub zoop_births: u64,
    pub zoop_deaths: u64,
    pub plant_births: u64,
    pub plant_deaths: u64,
    pub rebuilds: u64,

    pub interval_ticks: u64,
    last_sampled_tick: Option<u64>,
}

impl Default for EcosystemStats {
    fn default() -> Self {
        Self::with_interval(100)
    }
}

impl EcosystemStats {
    pub fn with_interval(interval_ticks: u64) -> Self {
        Self {
            live_zoops: 0,
            live_plants: 0,
            mean_energy: 0.0,
            mean_genes: None,
            zoop_births: 0,
            zoop_deaths: 0,
            plant_births: 0,
            plant_deaths: 0,
            rebuilds: 0,
            interval_ticks,
            last_sampled_tick: None,
        }
    }

    /// Fold one event into the lifetime counters.
    pub fn observe(&mut self, event: &SimEvent) {
        match (event.event_type, event.kind()) {
            (SimEventType::EntityBorn, Some(EntityKind::Zoop)) => self.zoop_births += 1,
            (SimEventType::EntityBorn, Some(EntityKind::Plant)) => self.plant_births += 1,
            (SimEventType::EntityDied, Some(EntityKind::Zoop)) => self.zoop_deaths += 1,
            (SimEventType::EntityDied, Some(EntityKind::Plant)) => self.plant_deaths += 1,
            (SimEventType::WorldRebuilt, _) => {
                self.rebuilds += 1;
                self.last_sampled_tick = None;
            }
            _ => {}
        }
    }

    /// Recompute the population figures from the world.
    pub fn sample(&mut self, world: &SimulationWorld) {
        self.live_plants = world.live_plant_count();

        self.live_zoops = world.live_zoop_count();

        let mut energy = 0.0f32;
        let mut speed = 0.0f32;
        let mut vision = 0.0f32;
        let mut threshold = 0.0f32;
        for zoop in world.live_zoops() {
            energy += zoop.energy;
            speed += zoop.genes.move_speed;
            vision += zoop.genes.vision_range;
            threshold += zoop.genes.repro_threshold;
        }

        if self.live_zoops > 0 {
            let n = self.live_zoops as f32;
            self.mean_energy = energy / n;
            self.mean_genes = Some(Genes::new(speed / n, vision / n, threshold / n));
        } else {
            self.mean_energy = 0.0;
            self.mean_genes = None;
        }
        self.last_sampled_tick = Some(world.tick());
    }

    /// Whether a new sample is due at `tick`.
    pub fn due(&self, tick: u64) -> bool {
        if self.interval_ticks == 0 {
            return false;
        }
        match self.last_sampled_tick {
            None => true,
            Some(last) => tick >= last + self.interval_ticks,
        }
    }
}

/// Fold this frame's events and log a summary whenever one is due.
pub fn collect_ecosystem_stats(
    mut stats: ResMut<EcosystemStats>,
    mut events: EventReader<SimEvent>,
    world: Res<SimulationWorld>,
) {
    for event in events.read() {
        stats.observe(event);
    }

    if !stats.due(world.tick()) {
        return;
    }
    stats.sample(&world);

    let (speed, vision, threshold) = stats
        .mean_genes
        .map(|g| (g.move_speed, g.vision_range, g.repro_threshold))
        .unwrap_or((0.0, 0.0, 0.0));

    info!(
        "[ECOSYSTEM] Tick {} | Zoops: {} | Plants: {} | Mean energy: {:.2} | Genes speed/vision/threshold: {:.2}/{:.2}/{:.2} | Born: {} | Died: {}",
        world.tick(),
        stats.live_zoops,
        stats.live_plants,
        stats.mean_energy,
        speed,
        vision,
        threshold,
        stats.zoop_births,
        stats.zoop_deaths,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organisms::{EntityId, SimulationParams};
    use crate::world::WorldBounds;

    #[test]
    fn observe_counts_by_kind() {
        let mut stats = EcosystemStats::default();
        stats.observe(&SimEvent::born(0, EntityId(1), EntityKind::Zoop));
        stats.observe(&SimEvent::born(0, EntityId(2), EntityKind::Plant));
        stats.observe(&SimEvent::died(3, EntityId(2), EntityKind::Plant));
        stats.observe(&SimEvent::tick_advanced(3));
        assert_eq!(stats.zoop_births, 1);
        assert_eq!(stats.plant_births, 1);
        assert_eq!(stats.plant_deaths, 1);
        assert_eq!(stats.zoop_deaths, 0);
    }

    #[test]
    fn sample_reflects_live_population() {
        let params = SimulationParams {
            initial_zoop_count: 4,
            initial_plant_count: 3,
            founder_gene_sigma_fraction: 0.0,
            ..SimulationParams::default()
        };
        let mut world = SimulationWorld::new(5, WorldBounds::new(-10.0, 10.0, -10.0, 10.0), params);
        world.rebuild();

        let mut stats = EcosystemStats::with_interval(10);
        assert!(stats.due(0));
        stats.sample(&world);
        assert_eq!(stats.live_zoops, 4);
        assert_eq!(stats.live_plants, 3);
        assert_eq!(stats.mean_energy, 20.0);
        assert_eq!(stats.mean_genes, Some(params.default_genes));
        assert!(!stats.due(9));
        assert!(stats.due(10));
    }
}
