use bevy::prelude::*;

use crate::world::SimulationWorld;

/// Most steps a single lane may drain in one [`FixedStepClock::advance`]. Time beyond this is
/// dropped so a stalled frame or an absurd speed cannot spin forever.
pub const MAX_STEPS_PER_ADVANCE: u32 = 240;

/// Fixed-step driver: turns variable frame time into whole brain and physics steps.
#[derive(Resource, Debug, Clone)]
pub struct FixedStepClock {
    /// Multiplier on real time. Zero or below pauses the simulation.
    pub sim_speed: f32,
    pub physics_hz: f32,
    pub brain_hz: f32,
    physics_accum: f32,
    brain_accum: f32,
}

/// What one call to [`FixedStepClock::advance`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub brain_steps: u32,
    pub physics_steps: u32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(1.0, 10.0, 8.0)
    }
}

impl FixedStepClock {
    pub fn new(sim_speed: f32, physics_hz: f32, brain_hz: f32) -> Self {
        Self {
            sim_speed,
            physics_hz,
            brain_hz,
            physics_accum: 0.0,
            brain_accum: 0.0,
        }
    }

    /// Seconds of simulated time per physics tick, if the rate is usable.
    pub fn physics_dt(&self) -> Option<f32> {
        step_size(self.physics_hz)
    }

    pub fn brain_dt(&self) -> Option<f32> {
        step_size(self.brain_hz)
    }

    pub fn reset(&mut self) {
        self.physics_accum = 0.0;
        self.brain_accum = 0.0;
    }

    /// Accumulate `real_dt` and drain it into whole steps. All pending brain steps run before any
    /// physics step, so physics always consumes the freshest intent.
    pub fn advance(&mut self, real_dt: f32, world: &mut SimulationWorld) -> StepReport {
        let mut report = StepReport::default();
        let scaled = real_dt * self.sim_speed;
        if !(scaled > 0.0 && scaled.is_finite()) {
            return report;
        }

        if let Some(brain_dt) = self.brain_dt() {
            self.brain_accum += scaled;
            while self.brain_accum >= brain_dt {
                if report.brain_steps == MAX_STEPS_PER_ADVANCE {
                    warn!("Brain lane fell behind, dropping {:.3}s", self.brain_accum);
                    self.brain_accum = 0.0;
                    break;
                }
                world.step_brain(brain_dt);
                self.brain_accum -= brain_dt;
                report.brain_steps += 1;
            }
        }

        if let Some(physics_dt) = self.physics_dt() {
            self.physics_accum += scaled;
            while self.physics_accum >= physics_dt {
                if report.physics_steps == MAX_STEPS_PER_ADVANCE {
                    warn!("Physics lane fell behind, dropping {:.3}s", self.physics_accum);
                    self.physics_accum = 0.0;
                    break;
                }
                world.step_one_tick(physics_dt);
                self.physics_accum -= physics_dt;
                report.physics_steps += 1;
            }
        }

        report
    }
}

fn step_size(hz: f32) -> Option<f32> {
    if hz > 0.0 && hz.is_finite() {
        Some(1.0 / hz)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organisms::SimulationParams;
    use crate::world::WorldBounds;

    fn world() -> SimulationWorld {
        let mut world = SimulationWorld::new(
            1,
            WorldBounds::new(-10.0, 10.0, -10.0, 10.0),
            SimulationParams::default(),
        );
        world.rebuild();
        world
    }

    #[test]
    fn drains_whole_steps_and_keeps_remainder() {
        let mut world = world();
        let mut clock = FixedStepClock::new(1.0, 4.0, 2.0);

        let report = clock.advance(0.6, &mut world);
        assert_eq!(report, StepReport { brain_steps: 1, physics_steps: 2 });
        assert_eq!(world.tick(), 2);

        let report = clock.advance(0.5, &mut world);
        assert_eq!(report, StepReport { brain_steps: 1, physics_steps: 2 });
        assert_eq!(world.tick(), 4);
    }

    #[test]
    fn speed_multiplier_scales_simulated_time() {
        let mut world = world();
        let mut clock = FixedStepClock::new(4.0, 4.0, 4.0);
        let report = clock.advance(0.5, &mut world);
        assert_eq!(report.physics_steps, 8);
        assert_eq!(report.brain_steps, 8);
    }

    #[test]
    fn paused_or_misconfigured_lanes_are_skipped() {
        let mut world = world();

        let mut paused = FixedStepClock::new(0.0, 10.0, 10.0);
        assert_eq!(paused.advance(1.0, &mut world), StepReport::default());

        let mut no_brain = FixedStepClock::new(1.0, 4.0, 0.0);
        let report = no_brain.advance(1.0, &mut world);
        assert_eq!(report.brain_steps, 0);
        assert_eq!(report.physics_steps, 4);

        let mut no_physics = FixedStepClock::new(1.0, -1.0, 4.0);
        let report = no_physics.advance(1.0, &mut world);
        assert_eq!(report.physics_steps, 0);
        assert_eq!(report.brain_steps, 4);
        assert_eq!(world.tick(), 4);
    }

    #[test]
    fn huge_speed_is_capped_per_advance() {
        let mut world = world();
        let mut clock = FixedStepClock::new(1.0e30, 10.0, 8.0);
        let report = clock.advance(1.0 / 60.0, &mut world);
        assert_eq!(report.physics_steps, MAX_STEPS_PER_ADVANCE);
        assert_eq!(report.brain_steps, MAX_STEPS_PER_ADVANCE);
        assert_eq!(world.tick(), MAX_STEPS_PER_ADVANCE as u64);

        // The backlog is dropped rather than carried into the next frame.
        assert_eq!(clock.physics_accum, 0.0);
        assert_eq!(clock.brain_accum, 0.0);
    }

    #[test]
    fn non_finite_time_is_ignored() {
        let mut world = world();
        let mut clock = FixedStepClock::new(f32::NAN, 10.0, 8.0);
        assert_eq!(clock.advance(0.5, &mut world), StepReport::default());
        let mut clock = FixedStepClock::new(1.0, 10.0, 8.0);
        assert_eq!(clock.advance(f32::INFINITY, &mut world), StepReport::default());
        assert_eq!(clock.advance(0.25, &mut world).physics_steps, 2);
    }

    #[test]
    fn reset_discards_partial_time() {
        let mut world = world();
        let mut clock = FixedStepClock::new(1.0, 4.0, 4.0);
        clock.advance(0.2, &mut world);
        clock.reset();
        let report = clock.advance(0.2, &mut world);
        assert_eq!(report.physics_steps, 0);
    }
}
