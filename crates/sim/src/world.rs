//! Scheduler content resolution and the built-in station.

use std::path::Path;

use anyhow::Result;
use objective_content::{ConfigLoader, WorldLoader};
use objective_core::{RepairFacet, SchedulerConfig, Target, TargetId, WorldTargets};

use crate::config::SimConfig;

pub fn load_scheduler_config(sim: &SimConfig) -> Result<SchedulerConfig> {
    match sim.config_path.as_deref() {
        Some(path) => load_with_context(path, ConfigLoader::load),
        None => Ok(SchedulerConfig::default()),
    }
}

pub fn load_world(sim: &SimConfig) -> Result<WorldTargets> {
    match sim.world_path.as_deref() {
        Some(path) => load_with_context(path, WorldLoader::load),
        None => Ok(builtin_world()),
    }
}

fn load_with_context<T>(path: &Path, load: fn(&Path) -> Result<T>) -> Result<T> {
    tracing::info!(path = %path.display(), "loading content");
    load(path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
}

/// A small station with a mix of healthy and broken equipment.
pub fn builtin_world() -> WorldTargets {
    WorldTargets::new(vec![
        Target::new(TargetId(1), "Reactor", 35.0).with_facet(
            RepairFacet::new("Coolant loop", 60.0)
                .with_skill("mechanical")
                .with_item("wrench"),
        ),
        Target::new(TargetId(2), "Junction box", 70.0).with_facet(
            RepairFacet::new("Fuses", 80.0)
                .with_skill("electrical")
                .with_item("screwdriver"),
        ),
        Target::new(TargetId(3), "Oxygen generator", 100.0).with_facet(
            RepairFacet::new("Electrolysis cell", 50.0).with_skill("electrical"),
        ),
        Target::new(TargetId(4), "Ballast pump", 90.0)
            .with_facet(RepairFacet::new("Impeller", 40.0).with_item("wrench"))
            .with_facet(RepairFacet::new("Seals", 95.0)),
    ])
}
