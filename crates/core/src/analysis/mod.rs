//! Post-processing of Monte Carlo output

pub mod statistics;
pub mod water;

pub use statistics::{summary_by_vegetation, RunStatistics, Summary};
pub use water::{
    distance_to_water, water_proximity_split, WaterProximitySplit, DEFAULT_WATER_THRESHOLD,
};
