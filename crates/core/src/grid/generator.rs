//! Random terrain generation
//!
//! Produces the grid and vegetation map consumed by the simulation: scattered
//! tree cover, round water bodies and bush clusters, plus an optional
//! ignition point. Generation is deterministic for a given seed.

use super::terrain::{TerrainGrid, VegetationMap};
use crate::core_types::{CellState, VegetationType};
use crate::error::{FireSimError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters for [`generate_terrain`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Probability that a cell starts with tree cover (otherwise empty),
    /// clamped to `[0, 1]`
    pub vegetation_density: f64,
    /// Number of water bodies to place
    pub water_bodies: usize,
    /// Manhattan radius of each water body
    pub water_radius: usize,
    /// Number of bush clusters to place
    pub bush_clusters: usize,
    /// Manhattan radius of each bush cluster
    pub bush_radius: usize,
    /// Cell to set on fire after generation
    pub ignition: Option<(usize, usize)>,
    /// Seed for the generator
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            vegetation_density: 0.7, // 30% unplanted, 70% trees
            water_bodies: 2,
            water_radius: 3,
            bush_clusters: 3,
            bush_radius: 2,
            ignition: None,
            seed: 42,
        }
    }
}

/// Generate a terrain grid and matching vegetation map
///
/// Order of placement: tree cover, then water bodies, then bush clusters
/// (which never overwrite water), then the ignition point.
pub fn generate_terrain(config: &TerrainConfig) -> Result<(TerrainGrid, VegetationMap)> {
    let (rows, cols) = (config.rows, config.cols);
    if !config.vegetation_density.is_finite() {
        return Err(FireSimError::InvalidVegetationDensity(
            config.vegetation_density,
        ));
    }
    if let Some((row, col)) = config.ignition {
        if row >= rows || col >= cols {
            return Err(FireSimError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut grid = TerrainGrid::new(rows, cols);
    let mut vegetation = VegetationMap::new(rows, cols);

    let density = config.vegetation_density.clamp(0.0, 1.0);
    for row in 0..rows {
        for col in 0..cols {
            if rng.random_bool(density) {
                let species =
                    VegetationType::TREES[rng.random_range(0..VegetationType::TREES.len())];
                grid.set(row, col, CellState::Vegetation);
                vegetation.set(row, col, species);
            }
        }
    }

    if grid.is_empty() {
        return Ok((grid, vegetation));
    }

    for _ in 0..config.water_bodies {
        let centre = (rng.random_range(0..rows), rng.random_range(0..cols));
        for (row, col) in manhattan_disc(centre, config.water_radius, rows, cols) {
            grid.set(row, col, CellState::Water);
            vegetation.set(row, col, VegetationType::Bare);
        }
    }

    for _ in 0..config.bush_clusters {
        let centre = (rng.random_range(0..rows), rng.random_range(0..cols));
        for (row, col) in manhattan_disc(centre, config.bush_radius, rows, cols) {
            if grid[(row, col)] != CellState::Water {
                grid.set(row, col, CellState::Bush);
                vegetation.set(row, col, VegetationType::Bush);
            }
        }
    }

    if let Some((row, col)) = config.ignition {
        grid.set(row, col, CellState::Burning);
    }

    debug!(
        "Generated {}x{} terrain: {} vegetation, {} bush, {} water",
        rows,
        cols,
        grid.count(CellState::Vegetation),
        grid.count(CellState::Bush),
        grid.count(CellState::Water)
    );

    Ok((grid, vegetation))
}

/// In-bounds cells within Manhattan distance `radius` of `centre`, row-major
fn manhattan_disc(
    centre: (usize, usize),
    radius: usize,
    rows: usize,
    cols: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let row_range = centre.0.saturating_sub(radius)..=(centre.0 + radius).min(rows - 1);
    row_range.flat_map(move |row| {
        let remaining = radius - row.abs_diff(centre.0);
        let col_range = centre.1.saturating_sub(remaining)..=(centre.1 + remaining).min(cols - 1);
        col_range.map(move |col| (row, col))
    })
}
