//! Fire spread simulation
//!
//! - `engine`: the per-step cellular-automaton transition rule
//! - `monte_carlo`: repeated runs folded into burn probabilities
//! - `scenario`: bush/non-bush, wind sweep and season experiments
//! - `config`: run configuration

pub mod config;
pub mod engine;
pub mod monte_carlo;
pub mod scenario;

pub use config::{SimulationConfig, DEFAULT_MAX_STEPS};
pub use engine::{FireSimulation, RunSummary, SpreadModel, StepObserver, StepOutcome};
pub use monte_carlo::{MonteCarloResult, MonteCarloSimulation, RunProgress, SimulationRecord};
pub use scenario::{
    clear_and_set_fire, compare_bush_non_bush, compare_seasons, compare_wind_speeds,
    find_closest_location, ClosestTarget, ScenarioRecord, ScenarioResult, SeasonComparison,
    SeasonOutcome,
};
