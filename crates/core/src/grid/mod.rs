//! Grid storage, terrain and terrain generation

pub mod field;
pub mod generator;
pub mod terrain;

// Re-export main types
pub use field::{Field, NEIGHBOR_OFFSETS};
pub use generator::{generate_terrain, TerrainConfig};
pub use terrain::{ensure_same_shape, TerrainGrid, VegetationMap};
