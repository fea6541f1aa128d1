//! Environmental modifiers for fire spread: humidity, temperature and wind

pub mod environment;
pub mod wind;

pub use environment::{
    compute_environment_reference, Baseline, EnvironmentCalculator, EnvironmentFields,
};
pub use wind::{WindModel, CALM_WIND_THRESHOLD};
