//! Headless crew simulation.
//!
//! Loads scheduler tunables and a world fixture, gives every crew member an
//! objective manager with a repair duty and an idle fallback, then ticks the
//! world and logs what each character chose to work on.
//!
//! ```bash
//! OBJECTIVE_SIM_WORLD=crates/sim/data/world.ron \
//! OBJECTIVE_SIM_CONFIG=crates/sim/data/scheduler.toml \
//! RUST_LOG=objective_core=debug cargo run -p objective-sim
//! ```

mod config;
mod simulation;
mod world;

use anyhow::Result;

use crate::config::SimConfig;
use crate::simulation::Simulation;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let sim = SimConfig::from_env();
    let scheduler = world::load_scheduler_config(&sim)?;
    let targets = world::load_world(&sim)?;

    tracing::info!(
        crew = sim.crew,
        ticks = sim.ticks,
        targets = targets.len(),
        "starting simulation"
    );

    let mut simulation = Simulation::new(sim, scheduler, targets);
    simulation.run();

    tracing::info!(ticks = simulation.tick(), "simulation finished");
    Ok(())
}
