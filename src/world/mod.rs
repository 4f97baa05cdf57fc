mod clock;
mod events;
mod plants;
mod topology;


use bevy::app::AppExit;
use bevy::prelude::*;
use glam::Vec2;
use std::collections::HashMap;

pub use clock::{FixedStepClock, StepReport, MAX_STEPS_PER_ADVANCE};
pub use events::{EventBuffer, SimEvent, SimEventType};
pub use plants::Plant;
pub use topology::{clamp_between, shortest_delta, wrap, WorldBounds};

use crate::config::WorldConfig;
use crate::organisms::{
    collect_observation, systems, DecisionPolicy, EntityId, EntityKind, HardcodedPolicy,
    PlantMode, SimulationParams, Zoop,
};

/// Owns every zoop and plant and advances them deterministically.
///
/// Entities are created only here: founders on [`rebuild`](Self::rebuild), everything else by
/// reproduction and plant population control. Collaborators read through the query methods and
/// drain [`SimEvent`]s after each step.
#[derive(Resource)]
pub struct SimulationWorld {
    seed: u64,
    pub(crate) tick: u64,
    pub(crate) bounds: WorldBounds,
    pub(crate) params: SimulationParams,

    pub(crate) zoops: Vec<Zoop>,
    pub(crate) plants: Vec<Plant>,
    zoop_index: HashMap<EntityId, usize>,
    plant_index: HashMap<EntityId, usize>,

    policy: Option<Box<dyn DecisionPolicy>>,

    pub(crate) next_entity_id: u64,
    pub(crate) rng: fastrand::Rng,
    pub(crate) spread_timer: f32,
    pub(crate) rescue_timer: f32,

    pub(crate) events: EventBuffer,
}

impl SimulationWorld {
    /// An empty world with the reference policy installed. Call [`rebuild`](Self::rebuild) to
    /// populate it.
    pub fn new(seed: u64, bounds: WorldBounds, params: SimulationParams) -> Self {
        Self {
            seed,
            tick: 0,
            bounds,
            params,
            zoops: Vec::with_capacity(16),
            plants: Vec::with_capacity(64),
            zoop_index: HashMap::with_capacity(32),
            plant_index: HashMap::with_capacity(128),
            policy: Some(Box::new(HardcodedPolicy)),
            next_entity_id: 1,
            rng: fastrand::Rng::with_seed(seed),
            spread_timer: 0.0,
            rescue_timer: 0.0,
            events: EventBuffer::default(),
        }
    }

    // ===========================
    // Queries
    // ===========================

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Normalization reference for displays.
    pub fn zoop_max_energy(&self) -> f32 {
        self.params.zoop_max_energy
    }

    pub fn zoop(&self, id: EntityId) -> Option<&Zoop> {
        self.zoop_index.get(&id).map(|&i| &self.zoops[i])
    }

    pub fn plant(&self, id: EntityId) -> Option<&Plant> {
        self.plant_index.get(&id).map(|&i| &self.plants[i])
    }

    /// Every zoop ever spawned since the last rebuild, dead ones included, in stable order.
    pub fn zoops(&self) -> &[Zoop] {
        &self.zoops
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn live_zoops(&self) -> impl Iterator<Item = &Zoop> {
        self.zoops.iter().filter(|z| z.is_alive())
    }

    pub fn live_plants(&self) -> impl Iterator<Item = &Plant> {
        self.plants.iter().filter(|p| p.is_alive())
    }

    pub fn live_zoop_count(&self) -> usize {
        self.live_zoops().count()
    }

    pub fn live_plant_count(&self) -> usize {
        self.live_plants().count()
    }

    pub fn pending_events(&self) -> &[SimEvent] {
        self.events.as_slice()
    }

    /// Hand over everything emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain()
    }

    // ===========================
    // Policy
    // ===========================

    pub fn set_policy(&mut self, policy: Box<dyn DecisionPolicy>) {
        info!("Decision policy set to '{}'", policy.name());
        self.policy = Some(policy);
    }

    /// Without a policy the brain pass does nothing and zoops keep their current intent.
    pub fn clear_policy(&mut self) {
        self.policy = None;
    }

    pub fn policy_name(&self) -> Option<&'static str> {
        self.policy.as_ref().map(|p| p.name())
    }

    // ===========================
    // Lifecycle
    // ===========================

    /// Reset to tick 0 and respawn founders and initial plants from the seed.
    pub fn rebuild(&mut self) {
        self.tick = 0;

        self.zoops.clear();
        self.plants.clear();
        self.zoop_index.clear();
        self.plant_index.clear();
        self.events.clear();

        self.next_entity_id = 1;
        self.rng = fastrand::Rng::with_seed(self.seed);

        self.spread_timer = 0.0;
        self.rescue_timer = 0.0;

        let founder_sigma = self.params.founder_gene_sigma_fraction;
        for _ in 0..self.params.initial_zoop_count {
            let id = self.allocate_id();
            let position = self.random_point_in_bounds();
            let genes = self.params.default_genes.mutated(
                founder_sigma,
                &self.params.gene_bounds,
                &mut self.rng,
            );
            let zoop = Zoop::new(
                id,
                self.tick,
                None,
                position,
                self.params.zoop_starting_energy,
                genes,
            );
            self.insert_zoop(zoop);
        }

        let inset = self.params.plant_bounds_inset;
        let plant_count = self
            .params
            .initial_plant_count
            .min(self.params.plant_capacity());
        for i in 0..plant_count {
            let position = if i == 0 {
                self.params.plant_spawn_hint
            } else {
                self.random_point_in_bounds()
            };
            let position = self.bounds.clamp_inset(position, inset);
            self.spawn_plant_at(position);
        }

        self.events.push(SimEvent::rebuilt(self.tick));
        info!(
            "World rebuilt (seed={}): {} zoops, {} plants",
            self.seed,
            self.zoops.len(),
            self.plants.len()
        );
    }

    // ===========================
    // Brain lane
    // ===========================

    /// Sense and decide for every living zoop. Only intents change here; a zero intent keeps the
    /// previous one.
    pub fn step_brain(&mut self, brain_dt: f32) {
        let Some(policy) = self.policy.as_deref() else {
            return;
        };

        let max_energy = self.params.zoop_max_energy;
        for zoop in self.zoops.iter_mut().filter(|z| z.is_alive()) {
            let observation = collect_observation(
                zoop,
                &self.plants,
                &self.bounds,
                max_energy,
                &self.params.gene_bounds,
            );
            let intent = policy.decide(&observation, brain_dt);
            if !intent.is_none() {
                zoop.intent = intent.movement;
            }
        }
    }

    // ===========================
    // Physics lane
    // ===========================

    /// One physics tick. The pass order is fixed: tick, metabolism, movement, eating,
    /// reproduction, plant population, `TickAdvanced`.
    pub fn step_one_tick(&mut self, dt: f32) {
        self.tick += 1;

        systems::update_metabolism(self, dt);
        systems::update_movement(self, dt);
        systems::handle_eating(self);
        systems::handle_reproduction(self);
        self.step_plant_population(dt);

        self.events.push(SimEvent::tick_advanced(self.tick));
    }

    // ===========================
    // Internal spawning
    // ===========================

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub(crate) fn next01(&mut self) -> f32 {
        self.rng.f32()
    }

    pub(crate) fn insert_zoop(&mut self, zoop: Zoop) -> EntityId {
        let id = zoop.id();
        self.zoop_index.insert(id, self.zoops.len());
        self.zoops.push(zoop);
        self.events.push(SimEvent::born(self.tick, id, EntityKind::Zoop));
        id
    }

    /// Plant a new plant unless the ceiling is reached.
    pub(crate) fn spawn_plant_at(&mut self, position: Vec2) -> Option<EntityId> {
        if self.plants.len() >= self.params.plant_capacity() {
            return None;
        }

        let id = self.allocate_id();
        self.plant_index.insert(id, self.plants.len());
        self.plants.push(Plant::new(id, self.tick, position));
        self.events.push(SimEvent::born(self.tick, id, EntityKind::Plant));
        Some(id)
    }

    /// A plant at `index` was eaten this tick.
    pub(crate) fn consume_plant(&mut self, index: usize) {
        let id = self.plants[index].id();
        self.events.push(SimEvent::died(self.tick, id, EntityKind::Plant));

        match self.params.plant_mode {
            PlantMode::Spread => self.remove_plant(index),
            PlantMode::Regrow => {
                let respawn = self.params.plant_respawn_seconds;
                let plant = &mut self.plants[index];
                let at = plant.position;
                plant.mark_eaten(at, respawn);
            }
        }
    }

    /// Swap-remove, then repoint the index entry of whichever plant moved into the hole.
    fn remove_plant(&mut self, index: usize) {
        let removed = self.plants.swap_remove(index);
        self.plant_index.remove(&removed.id());
        if let Some(moved) = self.plants.get(index) {
            self.plant_index.insert(moved.id(), index);
        }
    }
}

/// Ordering of the per-frame simulation systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Run fixed brain/physics steps.
    Advance,
    /// Republish the world's events to Bevy.
    Publish,
    /// Read-only observers (stats, logging, run limits).
    Observe,
}

/// Stops the app once the world reaches this many physics ticks.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RunLimit {
    pub max_ticks: Option<u64>,
}

/// Wires a [`SimulationWorld`] driven by a [`FixedStepClock`] into a Bevy app.
pub struct SimulationPlugin {
    config: WorldConfig,
}

impl SimulationPlugin {
    pub fn new(config: WorldConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let seed = self.config.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            info!("No seed configured, drew seed {}", seed);
            seed
        });
        let runner = self.config.runner.normalized();

        app.insert_resource(SimulationWorld::new(
            seed,
            self.config.bounds(),
            self.config.to_params(),
        ))
        .insert_resource(FixedStepClock::new(
            runner.sim_speed,
            runner.physics_hz,
            runner.brain_hz,
        ))
        .insert_resource(RunLimit {
            max_ticks: runner.max_ticks,
        })
        .add_event::<SimEvent>()
        .configure_sets(
            Update,
            (
                SimulationSet::Advance,
                SimulationSet::Publish,
                SimulationSet::Observe,
            )
                .chain(),
        )
        .add_systems(Startup, rebuild_world)
        .add_systems(
            Update,
            (
                advance_simulation.in_set(SimulationSet::Advance),
                publish_sim_events.in_set(SimulationSet::Publish),
                stop_at_tick_limit.in_set(SimulationSet::Observe),
            ),
        );
    }
}

fn rebuild_world(mut world: ResMut<SimulationWorld>, mut clock: ResMut<FixedStepClock>) {
    clock.reset();
    world.rebuild();
}

fn advance_simulation(
    time: Res<Time>,
    mut clock: ResMut<FixedStepClock>,
    mut world: ResMut<SimulationWorld>,
) {
    let report = clock.advance(time.delta_seconds(), &mut world);
    if report.physics_steps > 1 {
        debug!(
            "Caught up {} physics steps this frame (tick {})",
            report.physics_steps,
            world.tick()
        );
    }
}

/// Fan the world's buffered events out to every `EventReader<SimEvent>`, preserving order.
fn publish_sim_events(mut world: ResMut<SimulationWorld>, mut writer: EventWriter<SimEvent>) {
    if world.pending_events().is_empty() {
        return;
    }
    writer.send_batch(world.drain_events());
}

fn stop_at_tick_limit(
    world: Res<SimulationWorld>,
    limit: Res<RunLimit>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(max_ticks) = limit.max_ticks {
        if world.tick() >= max_ticks {
            info!("Reached tick limit {}, stopping", max_ticks);
            exit.send(AppExit);
        }
    }
}
