//! World-target fixture loader.

use std::collections::HashSet;
use std::path::Path;

use objective_core::{Target, WorldTargets};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// World data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorldDataRon {
    targets: Vec<Target>,
}

/// Loader for world targets from RON files.
pub struct WorldLoader;

impl WorldLoader {
    /// Load a target index from a RON file.
    ///
    /// Target ids must be unique and conditions must lie in
    /// `[0, Target::FULL_CONDITION]`.
    pub fn load(path: &Path) -> LoadResult<WorldTargets> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WorldTargets> {
        let data: WorldDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse world RON: {}", e))?;

        let mut seen = HashSet::new();
        for target in &data.targets {
            if !seen.insert(target.id) {
                anyhow::bail!("Duplicate target id {}", target.id);
            }
            if !(0.0..=Target::FULL_CONDITION).contains(&target.condition) {
                anyhow::bail!(
                    "{} ({}) has condition {} outside [0, {}]",
                    target.id,
                    target.name,
                    target.condition,
                    Target::FULL_CONDITION
                );
            }
        }

        tracing::debug!(targets = data.targets.len(), "world targets loaded");
        Ok(WorldTargets::new(data.targets))
    }
}
