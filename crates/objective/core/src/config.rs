//! Scheduler tuning parameters.

/// Tunable scheduler parameters.
///
/// Values are normally handed in already parsed by a content loader; every
/// field falls back to its `DEFAULT_*` constant when absent from the source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Floor priority of the repair scan duty when it is not ordered.
    pub baseline_priority: f32,
    /// Constant priority of the idle objective.
    pub idle_priority: f32,
    /// Staleness window of the repair scan cache, in seconds of manager clock.
    /// `0.0` rescans on every priority evaluation.
    pub scan_interval: f64,
    /// Maximum number of targets a single scan examines. `0` means unbounded.
    pub scan_budget: usize,
    /// Condition points restored per second of repair work.
    pub repair_rate: f32,
    /// Capacity of a manager's active objective set.
    pub max_active_objectives: usize,
}

impl SchedulerConfig {
    pub const DEFAULT_BASELINE_PRIORITY: f32 = 1.0;
    pub const DEFAULT_IDLE_PRIORITY: f32 = 0.5;
    pub const DEFAULT_SCAN_INTERVAL: f64 = 0.5;
    pub const DEFAULT_SCAN_BUDGET: usize = 64;
    pub const DEFAULT_REPAIR_RATE: f32 = 10.0;
    pub const DEFAULT_MAX_ACTIVE_OBJECTIVES: usize = 16;

    pub fn new() -> Self {
        Self {
            baseline_priority: Self::DEFAULT_BASELINE_PRIORITY,
            idle_priority: Self::DEFAULT_IDLE_PRIORITY,
            scan_interval: Self::DEFAULT_SCAN_INTERVAL,
            scan_budget: Self::DEFAULT_SCAN_BUDGET,
            repair_rate: Self::DEFAULT_REPAIR_RATE,
            max_active_objectives: Self::DEFAULT_MAX_ACTIVE_OBJECTIVES,
        }
    }

    /// Rescan on every evaluation with no per-scan budget.
    pub fn uncached() -> Self {
        Self::new().with_scan_interval(0.0).with_scan_budget(0)
    }

    pub fn with_scan_interval(mut self, seconds: f64) -> Self {
        self.scan_interval = seconds.max(0.0);
        self
    }

    pub fn with_scan_budget(mut self, budget: usize) -> Self {
        self.scan_budget = budget;
        self
    }

    pub fn with_repair_rate(mut self, rate: f32) -> Self {
        self.repair_rate = rate.max(0.0);
        self
    }

    pub fn with_max_active_objectives(mut self, capacity: usize) -> Self {
        self.max_active_objectives = capacity.max(1);
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}
