//! Scenario configuration read from the environment.
use std::env;

/// Knobs for one scripted run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of simulation steps.
    pub ticks: u32,
    /// Seconds advanced per step.
    pub delta: f32,
    /// Base damage of each enemy hit before the enemy's attack stats.
    pub seed_damage: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: 20,
            delta: 0.5,
            seed_damage: 12.0,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_TICKS` - Number of steps to run (default: 20)
    /// - `SIM_DELTA` - Seconds per step (default: 0.5)
    /// - `SIM_SEED_DAMAGE` - Base damage per enemy hit (default: 12)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("SIM_TICKS") {
            config.ticks = ticks;
        }
        if let Some(delta) = read_env::<f32>("SIM_DELTA").filter(|d| d.is_finite() && *d > 0.0) {
            config.delta = delta;
        }
        if let Some(damage) = read_env::<f32>("SIM_SEED_DAMAGE").filter(|d| d.is_finite()) {
            config.seed_damage = damage.max(0.0);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
