use smallvec::SmallVec;
use tracing::debug;

use crate::organisms::components::{EntityKind, Zoop};
use crate::world::{SimEvent, SimulationWorld};

/// Count down reproduction cooldowns and burn energy. Zoops that run dry die here, before they
/// get a chance to move, eat or reproduce this tick.
pub(crate) fn update_metabolism(world: &mut SimulationWorld, dt: f32) {
    let burn = world.params.zoop_metabolism_per_second * dt;
    let tick = world.tick;

    for zoop in world.zoops.iter_mut().filter(|z| z.is_alive()) {
        zoop.tick_cooldown(dt);
        zoop.energy -= burn;

        if zoop.energy <= 0.0 {
            zoop.energy = 0.0;
            zoop.kill();
            debug!(tick, zoop = %zoop.id(), "zoop starved");
            world.events.push(SimEvent::died(tick, zoop.id(), EntityKind::Zoop));
        }
    }
}

/// Advance every living zoop along its intent, scaled by its own speed, then wrap.
pub(crate) fn update_movement(world: &mut SimulationWorld, dt: f32) {
    let bounds = world.bounds;

    for zoop in world.zoops.iter_mut().filter(|z| z.is_alive()) {
        zoop.position += zoop.intent * zoop.genes.move_speed * dt;
        zoop.position = bounds.wrap(zoop.position);
    }
}

/// Each living zoop eats at most one plant: the first live one in scan order within eat radius.
pub(crate) fn handle_eating(world: &mut SimulationWorld) {
    let eat_r2 = world.params.eat_radius * world.params.eat_radius;
    let gain = world.params.plant_energy_gain;
    let max_energy = world.params.zoop_max_energy;

    for zi in 0..world.zoops.len() {
        if !world.zoops[zi].is_alive() {
            continue;
        }

        let position = world.zoops[zi].position;
        let bounds = world.bounds;
        let hit = world
            .plants
            .iter()
            .position(|p| p.is_alive() && bounds.distance_squared(position, p.position) <= eat_r2);

        let Some(plant_index) = hit else {
            continue;
        };

        let zoop = &mut world.zoops[zi];
        zoop.energy += gain;
        if max_energy > 0.0 && zoop.energy > max_energy {
            zoop.energy = max_energy;
        }

        world.consume_plant(plant_index);
    }
}

/// Split every eligible zoop. Newborns join the population only after the scan, so nothing born
/// this tick can reproduce again within it.
pub(crate) fn handle_reproduction(world: &mut SimulationWorld) {
    if !world.params.reproduction_enabled() {
        return;
    }

    let keep_fraction = world.params.repro_parent_energy_fraction;
    let cooldown = world.params.repro_cooldown_seconds;
    let sigma = world.params.mutation_sigma_fraction;
    let tick = world.tick;

    let mut newborns: SmallVec<[Zoop; 4]> = SmallVec::new();

    for i in 0..world.zoops.len() {
        if !world.zoops[i].can_reproduce() {
            continue;
        }

        let child_id = world.allocate_id();

        let parent = &mut world.zoops[i];
        let before = parent.energy;
        parent.energy = before * keep_fraction;
        // subtracting keeps parent + child equal to the energy before the split
        let child_energy = before - parent.energy;
        parent.repro_cooldown = cooldown;

        let parent_id = parent.id();
        let position = parent.position;
        let intent = parent.intent;
        let genes = parent.genes;

        let child_genes = genes.mutated(sigma, &world.params.gene_bounds, &mut world.rng);
        let mut child = Zoop::new(child_id, tick, Some(parent_id), position, child_energy, child_genes);
        child.intent = intent;

        debug!(
            tick,
            parent = %parent_id,
            child = %child_id,
            child_energy,
            "zoop reproduced"
        );
        newborns.push(child);
    }

    for child in newborns {
        world.insert_zoop(child);
    }
}
