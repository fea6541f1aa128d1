//! Core types and utilities

pub mod cell;
pub mod vegetation;
pub mod weather;

pub use cell::CellState;
pub use vegetation::{VegetationProperties, VegetationTable, VegetationType};
pub use weather::{Season, WindDirection};
