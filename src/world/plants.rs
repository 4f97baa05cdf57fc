use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;
use tracing::debug;

use crate::organisms::{EntityId, EntityKind, PlantMode};
use crate::world::{SimEvent, SimulationWorld};

/// Stationary food. Removed when eaten in spread mode; goes dormant and regrows in regrow mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    id: EntityId,
    birth_tick: u64,
    alive: bool,

    pub position: Vec2,
    /// Seconds until regrowth. Only meaningful while dead.
    pub respawn_timer: f32,
    /// Where this plant was last eaten; regrowth clusters around it.
    pub last_eaten: Vec2,
}

impl Plant {
    pub fn new(id: EntityId, birth_tick: u64, position: Vec2) -> Self {
        Self {
            id,
            birth_tick,
            alive: true,
            position,
            respawn_timer: 0.0,
            last_eaten: position,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn birth_tick(&self) -> u64 {
        self.birth_tick
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn mark_eaten(&mut self, at: Vec2, respawn_seconds: f32) {
        self.last_eaten = at;
        self.alive = false;
        self.respawn_timer = respawn_seconds;
    }

    pub fn respawn_at(&mut self, tick: u64, position: Vec2) {
        self.birth_tick = tick;
        self.position = position;
        self.alive = true;
        self.respawn_timer = 0.0;
    }
}

impl SimulationWorld {
    /// Plant population control, run once per physics tick after reproduction.
    pub(crate) fn step_plant_population(&mut self, dt: f32) {
        match self.params.plant_mode {
            PlantMode::Spread => {
                self.step_spread(dt);
                self.step_rescue(dt);
            }
            PlantMode::Regrow => self.step_regrow(dt),
        }
    }

    /// Every spread interval, each live plant may seed one neighbour inside the spread radius.
    /// The pass works on a fixed snapshot; seedlings are planted afterwards and cannot spread
    /// within the same pass.
    fn step_spread(&mut self, dt: f32) {
        if !self.params.spread_enabled() {
            return;
        }

        let interval = self.params.plant_spread_interval_seconds;
        let chance = self.params.plant_spread_chance;
        let radius = self.params.plant_spread_radius;
        let inset = self.params.plant_bounds_inset;
        let capacity = self.params.plant_capacity();

        self.spread_timer += dt;
        while self.spread_timer >= interval {
            self.spread_timer -= interval;

            let current = self.plants.len();
            if current == 0 {
                break;
            }

            let mut capacity_left = capacity.saturating_sub(current);
            if capacity_left == 0 {
                break;
            }

            let mut queued: SmallVec<[Vec2; 8]> = SmallVec::new();
            for i in 0..current {
                if capacity_left == 0 {
                    break;
                }
                if !self.plants[i].is_alive() {
                    continue;
                }
                if self.next01() > chance {
                    continue;
                }

                let source = self.plants[i].position;
                let seed = self.random_point_in_disk(source, radius);
                queued.push(self.bounds.clamp_inset(self.bounds.wrap(seed), inset));
                capacity_left -= 1;
            }

            if !queued.is_empty() {
                debug!(tick = self.tick, seedlings = queued.len(), "plants spread");
            }
            for position in queued {
                if self.plants.len() >= capacity {
                    break;
                }
                self.spawn_plant_at(position);
            }
        }
    }

    /// Once per rescue interval, top the population up towards the floor with random plants.
    fn step_rescue(&mut self, dt: f32) {
        if !self.params.rescue_enabled() {
            return;
        }

        let interval = self.params.plant_rescue_interval_seconds;
        self.rescue_timer += dt;
        if self.rescue_timer < interval {
            return;
        }
        self.rescue_timer -= interval;

        let count = self.plants.len();
        if count >= self.params.plant_min_count {
            return;
        }

        let room = self.params.plant_capacity().saturating_sub(count);
        let add = self
            .params
            .plant_rescue_batch_size
            .min(self.params.plant_min_count - count)
            .min(room);
        if add == 0 {
            return;
        }

        let inset = self.params.plant_bounds_inset;
        for _ in 0..add {
            let position = self.random_point_in_bounds();
            let position = self.bounds.clamp_inset(position, inset);
            self.spawn_plant_at(position);
        }
        debug!(tick = self.tick, added = add, total = self.plants.len(), "plant rescue");
    }

    /// Count down dormant plants and bring them back, usually near where they were eaten.
    fn step_regrow(&mut self, dt: f32) {
        let inset = self.params.plant_bounds_inset;
        let regrow_radius = self.params.plant_regrow_radius;
        let long_jump_chance = self.params.plant_long_jump_chance;

        for i in 0..self.plants.len() {
            if self.plants[i].is_alive() {
                continue;
            }

            self.plants[i].respawn_timer -= dt;
            if self.plants[i].respawn_timer > 0.0 {
                continue;
            }

            let position = if self.next01() < long_jump_chance {
                self.random_point_in_bounds()
            } else if regrow_radius > 0.0 {
                let around = self.plants[i].last_eaten;
                let point = self.random_point_in_disk(around, regrow_radius);
                self.bounds.wrap(point)
            } else {
                self.plants[i].last_eaten
            };
            let position = self.bounds.clamp_inset(position, inset);

            let tick = self.tick;
            let plant = &mut self.plants[i];
            plant.respawn_at(tick, position);
            let id = plant.id();
            debug!(tick, plant = %id, "plant regrew");
            self.events.push(SimEvent::born(tick, id, EntityKind::Plant));
        }
    }

    /// Uniform in disk: angle uniform in `[0, 2π)`, radius `r * sqrt(u)`.
    fn random_point_in_disk(&mut self, center: Vec2, radius: f32) -> Vec2 {
        let angle = self.next01() * TAU;
        let r = radius * self.next01().sqrt();
        center + Vec2::new(angle.cos(), angle.sin()) * r
    }

    pub(crate) fn random_point_in_bounds(&mut self) -> Vec2 {
        let tx = self.next01();
        let ty = self.next01();
        self.bounds.lerp(tx, ty)
    }
}
