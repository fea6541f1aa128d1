//! Humidity and temperature fields
//!
//! Both fields are rebuilt every step from the current grid:
//!
//! 1. Seasonal baseline for every cell.
//! 2. Water cells hold humidity 0.8. Every other cell that is neither water nor
//!    burning gains `0.8 / (d + 3)` for each water cell at Manhattan distance
//!    `d ≤ 4`, clamped to 0.85 after each addition.
//! 3. Every burning cell heats its 3×3 neighborhood by 5 (capped at 100).
//! 4. Humid cells (> 0.7) cool by 2 (floored at 0), dry cells (< 0.3) warm by
//!    2 (capped at 100).
//!
//! Water never moves, so step 2 is computed once per terrain and cached as a
//! fire-free humidity field. Per step only burning cells fall back to the
//! baseline. Contributions are summed in the same row-major water-cell order
//! as the direct double loop ([`compute_environment_reference`]), so both give
//! identical values.

use crate::core_types::{CellState, Season};
use crate::grid::{Field, TerrainGrid};
use serde::{Deserialize, Serialize};

/// Humidity of a water cell
pub const WATER_HUMIDITY: f64 = 0.8;

/// Maximum Manhattan distance over which water raises humidity
pub const WATER_INFLUENCE_RADIUS: usize = 4;

/// Offset in the water decay denominator `d + 3`
const WATER_DECAY_OFFSET: f64 = 3.0;

/// Humidity ceiling for cells moistened by nearby water
pub const HUMIDITY_CEILING: f64 = 0.85;

/// Temperature rise per burning cell in a 3×3 neighborhood
pub const FIRE_HEATING: f64 = 5.0;

/// Temperature ceiling
pub const MAX_TEMPERATURE: f64 = 100.0;

/// Cells above this humidity are cooled
const HUMID_THRESHOLD: f64 = 0.7;

/// Cells below this humidity are warmed
const DRY_THRESHOLD: f64 = 0.3;

/// Temperature change from humidity coupling
const HUMIDITY_COUPLING: f64 = 2.0;

/// Seasonal starting values for humidity (fraction) and temperature (°C)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub humidity: f64,
    pub temperature: f64,
}

impl Baseline {
    /// Baseline for an optional season
    pub fn for_season(season: Option<Season>) -> Self {
        let (humidity, temperature) = match season {
            Some(Season::Summer) => (0.1, 30.0),
            Some(Season::Winter) => (0.4, 12.0),
            None => (0.2, 24.0),
        };
        Self {
            humidity,
            temperature,
        }
    }
}

/// Humidity and temperature for one step
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentFields {
    /// Relative humidity (0-1)
    pub humidity: Field<f64>,
    /// Temperature (°C)
    pub temperature: Field<f64>,
}

impl EnvironmentFields {
    /// Humidity at `(row, col)`
    #[inline]
    pub fn humidity_at(&self, row: usize, col: usize) -> f64 {
        *self.humidity.get(row, col)
    }

    /// Temperature at `(row, col)`
    #[inline]
    pub fn temperature_at(&self, row: usize, col: usize) -> f64 {
        *self.temperature.get(row, col)
    }
}

/// Builds [`EnvironmentFields`] for a fixed terrain and season
#[derive(Debug, Clone)]
pub struct EnvironmentCalculator {
    season: Option<Season>,
    baseline: Baseline,
    /// Humidity with water contributions applied and no fire anywhere
    water_humidity: Field<f64>,
}

impl EnvironmentCalculator {
    /// Precompute the water humidity field for `grid`
    ///
    /// Only the water layout of `grid` is used; any grid later passed to
    /// [`compute`](Self::compute) must have the same shape and water cells.
    pub fn new(grid: &TerrainGrid, season: Option<Season>) -> Self {
        let baseline = Baseline::for_season(season);
        let mut water_humidity = Field::with_value(grid.rows(), grid.cols(), baseline.humidity);
        apply_water_humidity(grid, &mut water_humidity, |_| true);

        Self {
            season,
            baseline,
            water_humidity,
        }
    }

    /// Season this calculator was built for
    pub fn season(&self) -> Option<Season> {
        self.season
    }

    /// Seasonal baseline
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Fields for the current grid
    pub fn compute(&self, grid: &TerrainGrid) -> EnvironmentFields {
        let burning = grid.indices_of(CellState::Burning);
        self.compute_with_fires(grid, &burning)
    }

    /// Fields for the current grid when the burning cells are already known
    ///
    /// `burning` holds flat indices of every burning cell in `grid`.
    pub fn compute_with_fires(&self, grid: &TerrainGrid, burning: &[usize]) -> EnvironmentFields {
        debug_assert!(grid.same_shape(&self.water_humidity));

        let mut humidity = self.water_humidity.clone();
        let humidity_slice = humidity.as_mut_slice();
        for &index in burning {
            humidity_slice[index] = self.baseline.humidity;
        }

        let mut temperature =
            Field::with_value(grid.rows(), grid.cols(), self.baseline.temperature);
        apply_fire_heating(grid, burning, &mut temperature);
        apply_humidity_coupling(&humidity, &mut temperature);

        EnvironmentFields {
            humidity,
            temperature,
        }
    }
}

/// Direct evaluation: scan every water cell against the grid on each call
///
/// Kept as the reference the cached calculator is checked against.
pub fn compute_environment_reference(
    grid: &TerrainGrid,
    season: Option<Season>,
) -> EnvironmentFields {
    let baseline = Baseline::for_season(season);
    let mut humidity = Field::with_value(grid.rows(), grid.cols(), baseline.humidity);
    apply_water_humidity(grid, &mut humidity, |state| state != CellState::Burning);

    let burning = grid.indices_of(CellState::Burning);
    let mut temperature = Field::with_value(grid.rows(), grid.cols(), baseline.temperature);
    apply_fire_heating(grid, &burning, &mut temperature);
    apply_humidity_coupling(&humidity, &mut temperature);

    EnvironmentFields {
        humidity,
        temperature,
    }
}

/// Add water contributions to `humidity`
///
/// Water cells are visited in row-major order, each touching the cells of its
/// Manhattan ball in row-major order. `receives` filters target cells by state
/// (water cells never receive).
fn apply_water_humidity<F>(grid: &TerrainGrid, humidity: &mut Field<f64>, receives: F)
where
    F: Fn(CellState) -> bool,
{
    let (rows, cols) = grid.shape();
    let radius = WATER_INFLUENCE_RADIUS;

    for water in grid.indices_of(CellState::Water) {
        let (wr, wc) = grid.coords(water);
        humidity.as_mut_slice()[water] = WATER_HUMIDITY;

        for r in wr.saturating_sub(radius)..=(wr + radius).min(rows - 1) {
            for c in wc.saturating_sub(radius)..=(wc + radius).min(cols - 1) {
                let distance = r.abs_diff(wr) + c.abs_diff(wc);
                if distance > radius {
                    continue;
                }
                let state = grid[(r, c)];
                if state == CellState::Water || !receives(state) {
                    continue;
                }
                let value = &mut humidity[(r, c)];
                *value = (*value + WATER_HUMIDITY / (distance as f64 + WATER_DECAY_OFFSET))
                    .min(HUMIDITY_CEILING);
            }
        }
    }
}

/// Heat the 3×3 neighborhood of every burning cell
fn apply_fire_heating(grid: &TerrainGrid, burning: &[usize], temperature: &mut Field<f64>) {
    let (rows, cols) = grid.shape();
    for &index in burning {
        let (fr, fc) = grid.coords(index);
        for r in fr.saturating_sub(1)..=(fr + 1).min(rows - 1) {
            for c in fc.saturating_sub(1)..=(fc + 1).min(cols - 1) {
                let value = &mut temperature[(r, c)];
                *value = (*value + FIRE_HEATING).min(MAX_TEMPERATURE);
            }
        }
    }
}

/// Cool humid cells and warm dry ones
fn apply_humidity_coupling(humidity: &Field<f64>, temperature: &mut Field<f64>) {
    for (t, &h) in temperature.as_mut_slice().iter_mut().zip(humidity.iter()) {
        if h > HUMID_THRESHOLD {
            *t = (*t - HUMIDITY_COUPLING).max(0.0);
        } else if h < DRY_THRESHOLD {
            *t = (*t + HUMIDITY_COUPLING).min(MAX_TEMPERATURE);
        }
    }
}
