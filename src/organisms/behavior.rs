use glam::Vec2;

use crate::organisms::components::Zoop;
use crate::organisms::genetics::GeneBounds;
use crate::world::{Plant, WorldBounds};

/// Nearest live plant inside vision range, as seen from the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensedPlant {
    /// Wrap-aware offset from the observer to the plant.
    pub delta: Vec2,
    pub distance: f32,
}

/// What a zoop can sense right now. Built fresh every brain tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Energy normalized against the world's max energy.
    pub energy01: f32,
    pub position: Vec2,
    pub nearest_plant: Option<SensedPlant>,
    /// Reserved for border avoidance; always zero on a torus.
    pub border_push: Vec2,
    pub move_speed01: f32,
    pub vision_range01: f32,
    pub repro_threshold01: f32,
}

/// Desired movement direction. Not required to be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    pub movement: Vec2,
}

impl Intent {
    /// "Keep doing what you were doing": the world leaves the stored intent untouched.
    pub const NONE: Intent = Intent {
        movement: Vec2::ZERO,
    };

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            movement: Vec2::new(x, y),
        }
    }

    pub fn is_none(&self) -> bool {
        self.movement.x == 0.0 && self.movement.y == 0.0
    }
}

/// Brain seam: maps an observation to an intent.
///
/// Implementations must be pure with respect to the world. Stochastic policies should own a
/// seeded generator so runs stay reproducible.
pub trait DecisionPolicy: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    fn decide(&self, observation: &Observation, brain_dt: f32) -> Intent;
}

/// Steers straight at the nearest sensed plant; otherwise keeps the previous heading.
#[derive(Debug, Default, Clone, Copy)]
pub struct HardcodedPolicy;

impl HardcodedPolicy {
    const MIN_DISTANCE: f32 = 1e-6;
}

impl DecisionPolicy for HardcodedPolicy {
    fn name(&self) -> &'static str {
        "hardcoded"
    }

    fn decide(&self, observation: &Observation, _brain_dt: f32) -> Intent {
        let Some(plant) = observation.nearest_plant else {
            return Intent::NONE;
        };

        if plant.distance <= Self::MIN_DISTANCE {
            return Intent::NONE;
        }

        let inv = 1.0 / plant.distance;
        Intent {
            movement: plant.delta * inv,
        }
    }
}

/// Find the nearest live plant within `vision_range` (unlimited when non-positive).
/// Ties keep the earliest plant in scan order.
pub fn sense_nearest_plant(
    position: Vec2,
    vision_range: f32,
    plants: &[Plant],
    bounds: &WorldBounds,
) -> Option<SensedPlant> {
    let vision2 = if vision_range > 0.0 {
        Some(vision_range * vision_range)
    } else {
        None
    };

    let mut best: Option<(f32, Vec2)> = None;
    for plant in plants.iter().filter(|p| p.is_alive()) {
        let delta = bounds.shortest_delta(position, plant.position);
        let d2 = delta.length_squared();

        if vision2.is_some_and(|v2| d2 > v2) {
            continue;
        }

        if best.map_or(true, |(best_d2, _)| d2 < best_d2) {
            best = Some((d2, delta));
        }
    }

    best.map(|(d2, delta)| SensedPlant {
        delta,
        distance: d2.sqrt(),
    })
}

/// Build the brain input for one zoop.
pub fn collect_observation(
    zoop: &Zoop,
    plants: &[Plant],
    bounds: &WorldBounds,
    max_energy: f32,
    gene_bounds: &GeneBounds,
) -> Observation {
    Observation {
        energy01: zoop.energy_ratio(max_energy),
        position: zoop.position,
        nearest_plant: sense_nearest_plant(zoop.position, zoop.genes.vision_range, plants, bounds),
        border_push: Vec2::ZERO,
        move_speed01: gene_bounds.move_speed.normalize(zoop.genes.move_speed),
        vision_range01: gene_bounds.vision_range.normalize(zoop.genes.vision_range),
        repro_threshold01: gene_bounds
            .repro_threshold
            .normalize(zoop.genes.repro_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organisms::EntityId;

    fn bounds() -> WorldBounds {
        WorldBounds::new(-10.0, 10.0, -10.0, 10.0)
    }

    fn observation(nearest_plant: Option<SensedPlant>) -> Observation {
        Observation {
            energy01: 0.5,
            position: Vec2::ZERO,
            nearest_plant,
            border_push: Vec2::ZERO,
            move_speed01: 0.5,
            vision_range01: 0.5,
            repro_threshold01: 0.5,
        }
    }

    #[test]
    fn hardcoded_policy_returns_none_without_a_plant() {
        let intent = HardcodedPolicy.decide(&observation(None), 0.125);
        assert!(intent.is_none());
    }

    #[test]
    fn hardcoded_policy_steers_with_unit_vector() {
        let sensed = SensedPlant {
            delta: Vec2::new(3.0, 4.0),
            distance: 5.0,
        };
        let intent = HardcodedPolicy.decide(&observation(Some(sensed)), 0.125);
        assert!((intent.movement - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn hardcoded_policy_guards_near_zero_distance() {
        let sensed = SensedPlant {
            delta: Vec2::new(1e-8, 0.0),
            distance: 1e-8,
        };
        let intent = HardcodedPolicy.decide(&observation(Some(sensed)), 0.125);
        assert_eq!(intent, Intent::NONE);
    }

    #[test]
    fn sensing_respects_vision_and_wraps() {
        let plants = vec![
            Plant::new(EntityId(1), 0, Vec2::new(5.0, 0.0)),
            Plant::new(EntityId(2), 0, Vec2::new(9.5, 0.0)),
        ];

        // from -9.5 the plant at 9.5 is one unit away across the seam
        let sensed = sense_nearest_plant(Vec2::new(-9.5, 0.0), 2.0, &plants, &bounds())
            .expect("plant across the seam is visible");
        assert!((sensed.delta - Vec2::new(-1.0, 0.0)).length() < 1e-4);
        assert!((sensed.distance - 1.0).abs() < 1e-4);

        assert!(sense_nearest_plant(Vec2::new(0.0, 5.0), 2.0, &plants, &bounds()).is_none());
    }

    #[test]
    fn non_positive_vision_is_unlimited() {
        let plants = vec![Plant::new(EntityId(1), 0, Vec2::new(7.0, 7.0))];
        let sensed = sense_nearest_plant(Vec2::ZERO, 0.0, &plants, &bounds());
        assert!(sensed.is_some());
    }

    #[test]
    fn dead_plants_are_invisible() {
        let mut plant = Plant::new(EntityId(1), 0, Vec2::new(1.0, 0.0));
        plant.mark_eaten(Vec2::new(1.0, 0.0), 3.0);
        assert!(sense_nearest_plant(Vec2::ZERO, 5.0, &[plant], &bounds()).is_none());
    }
}
