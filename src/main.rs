use anyhow::Context;
use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use zoops::{OrganismPlugin, SimulationPlugin, WorldConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::load(&path)
            .with_context(|| format!("loading world config from {path}"))?,
        None => {
            info!("No config path given, using defaults");
            WorldConfig::default()
        }
    };

    let runner = config.runner.normalized();

    info!(
        "Zoops starting: {} zoops, {} plants, physics {} Hz, brain {} Hz",
        config.initial_zoop_count, config.initial_plant_count, runner.physics_hz, runner.brain_hz
    );

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f32(1.0 / runner.frame_hz),
        )))
        .add_plugins(SimulationPlugin::new(config))
        .add_plugins(OrganismPlugin {
            stats_interval_ticks: runner.stats_interval_ticks,
        })
        .run();

    Ok(())
}
