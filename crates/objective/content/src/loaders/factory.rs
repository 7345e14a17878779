//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use objective_core::{SchedulerConfig, WorldTargets};

use crate::loaders::{ConfigLoader, LoadResult, WorldLoader};

/// Content factory that loads scheduler content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── scheduler.toml
/// └── world.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load scheduler tunables from `scheduler.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<SchedulerConfig> {
        let path = self.data_dir.join("scheduler.toml");
        if !path.exists() {
            tracing::info!(path = %path.display(), "no scheduler config, using defaults");
            return Ok(SchedulerConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load world targets from `world.ron`.
    pub fn load_world(&self) -> LoadResult<WorldTargets> {
        let path = self.data_dir.join("world.ron");
        WorldLoader::load(&path)
    }
}
