//! Scheduler configuration loader.

use std::path::Path;

use objective_core::SchedulerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for scheduler tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SchedulerConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SchedulerConfig> {
        let config: SchedulerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scheduler config TOML: {}", e))?;

        if config.repair_rate < 0.0 || config.scan_interval < 0.0 {
            anyhow::bail!("repair_rate and scan_interval must not be negative");
        }
        if config.max_active_objectives == 0 {
            anyhow::bail!("max_active_objectives must be at least 1");
        }

        tracing::debug!(?config, "scheduler config loaded");
        Ok(config)
    }
}
