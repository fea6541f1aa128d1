//! Run configuration

use crate::core_types::{Season, WindDirection};
use crate::error::Result;
use crate::physics::WindModel;
use serde::{Deserialize, Serialize};

/// Default cap on steps per run
pub const DEFAULT_MAX_STEPS: u32 = 10_000;

/// Inputs shared by every run of an experiment
///
/// Build with struct update syntax:
///
/// ```
/// use wildfire_ca_core::{Season, SimulationConfig, WindDirection};
///
/// let config = SimulationConfig {
///     wind_speed: 5.0,
///     wind_direction: WindDirection::North,
///     season: Some(Season::Summer),
///     seed: Some(7),
///     ..Default::default()
/// };
/// assert!(config.wind_effect);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Wind speed (m/s), below 1 has no effect
    pub wind_speed: f64,
    /// Direction the wind comes from
    pub wind_direction: WindDirection,
    /// Season selecting the humidity/temperature baseline
    pub season: Option<Season>,
    /// Whether wind also shortens the cooldown of downwind ignitions
    pub wind_effect: bool,
    /// Number of Monte Carlo runs
    pub simulations: usize,
    /// Seed for reproducible batches; drawn from entropy when unset
    pub seed: Option<u64>,
    /// Runs still burning after this many steps fail
    pub max_steps: u32,
    /// Run Monte Carlo repetitions on the rayon thread pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            wind_speed: 0.0,
            wind_direction: WindDirection::West,
            season: None,
            wind_effect: true,
            simulations: 50,
            seed: None,
            max_steps: DEFAULT_MAX_STEPS,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    /// Validated wind model for this configuration
    pub fn wind(&self) -> Result<WindModel> {
        WindModel::new(self.wind_speed, self.wind_direction)
    }
}
