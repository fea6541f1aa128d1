//! Wildfire Spread Core Library
//!
//! A stochastic cellular-automaton model of wildfire spread over a small 2D
//! terrain grid, used to study how vegetation, water, wind and season change
//! burn extent and duration.
//!
//! ## Model
//!
//! - Terrain grid of cell states plus a per-cell vegetation label
//! - Humidity and temperature fields recomputed every step from water and fire
//! - Four directional wind factors biasing ignition and burn rate
//! - One-shot spread: a burning cell tries its four neighbors once its
//!   cooldown has run out, then burns out
//! - Monte Carlo batches turning repeated runs into per-cell burn probabilities

pub mod analysis;
pub mod core_types;
pub mod error;
pub mod grid;
pub mod physics;
pub mod simulation;

// Re-export core types
pub use core_types::{
    CellState, Season, VegetationProperties, VegetationTable, VegetationType, WindDirection,
};
pub use error::{FireSimError, Result};

// Re-export grid and physics types
pub use grid::{generate_terrain, Field, TerrainConfig, TerrainGrid, VegetationMap};
pub use physics::{EnvironmentCalculator, EnvironmentFields, WindModel};

// Re-export simulation types
pub use simulation::{
    FireSimulation, MonteCarloResult, MonteCarloSimulation, SimulationConfig, SimulationRecord,
    SpreadModel, StepObserver, StepOutcome,
};
