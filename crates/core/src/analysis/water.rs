//! Burn probability against distance to water

use crate::analysis::statistics::Summary;
use crate::core_types::CellState;
use crate::grid::{Field, TerrainGrid};

/// Cells at most this far from water count as close to it
pub const DEFAULT_WATER_THRESHOLD: f64 = 5.0;

/// Euclidean distance from every cell to the nearest water cell
///
/// Water cells are at distance 0. Without any water every distance is
/// infinite.
pub fn distance_to_water(grid: &TerrainGrid) -> Field<f64> {
    let water: Vec<(usize, usize)> = grid
        .indices_of(CellState::Water)
        .into_iter()
        .map(|index| grid.coords(index))
        .collect();

    let mut distances = Field::with_value(grid.rows(), grid.cols(), f64::INFINITY);
    for r in 0..grid.rows() {
        for c in 0..grid.cols() {
            let nearest = water
                .iter()
                .map(|&(wr, wc)| {
                    let dr = r.abs_diff(wr);
                    let dc = c.abs_diff(wc);
                    dr * dr + dc * dc
                })
                .min();
            if let Some(squared) = nearest {
                distances[(r, c)] = (squared as f64).sqrt();
            }
        }
    }
    distances
}

/// Burn probabilities split by distance to water
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterProximitySplit {
    /// Cells within the threshold, water cells included
    pub near: Option<Summary>,
    /// Cells beyond the threshold
    pub far: Option<Summary>,
}

/// Summarize burn probability for cells within `threshold` of water and
/// for the rest
pub fn water_proximity_split(
    grid: &TerrainGrid,
    probabilities: &Field<f64>,
    threshold: f64,
) -> WaterProximitySplit {
    let distances = distance_to_water(grid);
    let (near, far): (Vec<_>, Vec<_>) = distances
        .iter()
        .zip(probabilities.iter())
        .partition(|(&distance, _)| distance <= threshold);

    WaterProximitySplit {
        near: Summary::from_values(near.into_iter().map(|(_, &p)| p)),
        far: Summary::from_values(far.into_iter().map(|(_, &p)| p)),
    }
}
