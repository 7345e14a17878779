//! Simulation configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Headless simulation settings.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// TOML scheduler tunables. `None` uses `SchedulerConfig::default()`.
    pub config_path: Option<PathBuf>,
    /// RON world fixture. `None` uses the built-in world.
    pub world_path: Option<PathBuf>,
    pub ticks: u32,
    pub crew: u32,
    /// Seconds of simulated time per tick.
    pub delta: f32,
    /// Ticks between two rounds of world damage. `0` disables damage.
    pub damage_every: u32,
    pub damage_amount: f32,
}

impl SimConfig {
    pub const DEFAULT_TICKS: u32 = 120;
    pub const DEFAULT_CREW: u32 = 3;
    pub const DEFAULT_DELTA: f32 = 0.25;
    pub const DEFAULT_DAMAGE_EVERY: u32 = 20;
    pub const DEFAULT_DAMAGE_AMOUNT: f32 = 35.0;

    /// Construct simulation configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OBJECTIVE_SIM_CONFIG` - scheduler tunables (TOML)
    /// - `OBJECTIVE_SIM_WORLD` - world targets (RON)
    /// - `OBJECTIVE_SIM_TICKS` - number of ticks to run (default: 120)
    /// - `OBJECTIVE_SIM_CREW` - number of characters (default: 3, min: 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.config_path = read_env::<PathBuf>("OBJECTIVE_SIM_CONFIG");
        config.world_path = read_env::<PathBuf>("OBJECTIVE_SIM_WORLD");
        if let Some(ticks) = read_env::<u32>("OBJECTIVE_SIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(crew) = read_env::<u32>("OBJECTIVE_SIM_CREW") {
            config.crew = crew.max(1);
        }

        config
    }

    /// Tick at which the mid-run orders are issued.
    pub fn order_tick(&self) -> u32 {
        self.ticks / 2
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            world_path: None,
            ticks: Self::DEFAULT_TICKS,
            crew: Self::DEFAULT_CREW,
            delta: Self::DEFAULT_DELTA,
            damage_every: Self::DEFAULT_DAMAGE_EVERY,
            damage_amount: Self::DEFAULT_DAMAGE_AMOUNT,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
