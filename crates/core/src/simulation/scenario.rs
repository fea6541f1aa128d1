//! Ready-made experiments built on the Monte Carlo driver
//!
//! - Bush vs. non-bush ignition: start one batch at the bush cell and one at
//!   the non-bush vegetation cell closest to the grid center.
//! - Wind sweep: repeat a batch from a fixed ignition point for a list of
//!   wind speeds.
//! - Seasons: one summer and one winter batch from the same fire, compared
//!   through their burn-probability distributions.

use crate::analysis::Summary;
use crate::core_types::{CellState, Season, VegetationTable, VegetationType};
use crate::error::{FireSimError, Result};
use crate::grid::{Field, TerrainGrid, VegetationMap};
use crate::simulation::config::SimulationConfig;
use crate::simulation::monte_carlo::{MonteCarloResult, MonteCarloSimulation, SimulationRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Kind of cell to start a fire in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosestTarget {
    /// A cell in the `Bush` state
    Bush,
    /// A `Vegetation` cell whose vegetation type is not bush
    NonBush,
}

impl ClosestTarget {
    fn matches(self, state: CellState, vegetation: VegetationType) -> bool {
        match self {
            ClosestTarget::Bush => state == CellState::Bush,
            ClosestTarget::NonBush => {
                state == CellState::Vegetation && vegetation != VegetationType::Bush
            }
        }
    }

    /// Category label used in scenario records
    pub fn category(self) -> &'static str {
        match self {
            ClosestTarget::Bush => "fire_at_bush",
            ClosestTarget::NonBush => "fire_at_non_bush",
        }
    }
}

impl fmt::Display for ClosestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Copy of `grid` with every fire put out and a single fire at `start`
pub fn clear_and_set_fire(grid: &TerrainGrid, start: (usize, usize)) -> Result<TerrainGrid> {
    let (row, col) = start;
    if !grid.contains(row, col) {
        return Err(FireSimError::OutOfBounds {
            row,
            col,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }

    let mut cleared = grid.map(|&state| {
        if state == CellState::Burning {
            CellState::Empty
        } else {
            state
        }
    });
    cleared[start] = CellState::Burning;
    Ok(cleared)
}

/// Location of the `target` cell closest to `center`
///
/// Distance is squared Euclidean; ties go to the first cell in row-major
/// order. `None` when no cell matches.
pub fn find_closest_location(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    target: ClosestTarget,
    center: (usize, usize),
) -> Option<(usize, usize)> {
    let squared_distance = |(row, col): (usize, usize)| {
        let dr = row.abs_diff(center.0);
        let dc = col.abs_diff(center.1);
        dr * dr + dc * dc
    };

    grid.indexed_iter()
        .filter(|&(pos, &state)| target.matches(state, vegetation[pos]))
        .map(|(pos, _)| pos)
        // min_by_key keeps the first of equal minima
        .min_by_key(|&pos| squared_distance(pos))
}

/// Records of one labelled batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario label, e.g. `fire_at_bush`
    pub category: String,
    /// Wind speed the batch ran with
    pub wind_speed: f64,
    /// Run summary
    pub record: SimulationRecord,
}

/// Records and last burn-probability field of a multi-batch experiment
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Records of every batch, batch after batch
    pub records: Vec<ScenarioRecord>,
    /// Burn probability of the last batch that ran
    pub burn_probability: Option<Field<f64>>,
}

impl ScenarioResult {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            burn_probability: None,
        }
    }

    /// Records with the given category
    pub fn category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ScenarioRecord> + 'a {
        self.records.iter().filter(move |r| r.category == category)
    }

    fn push_batch(&mut self, outcome: MonteCarloResult, category: &str, wind_speed: f64) {
        self.records
            .extend(outcome.records.into_iter().map(|record| ScenarioRecord {
                category: category.to_string(),
                wind_speed,
                record,
            }));
        self.burn_probability = Some(outcome.burn_probability);
    }
}

/// Burn probabilities of one season's batch
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOutcome {
    /// Season the batch ran in
    pub season: Season,
    /// Per-cell burn probability
    pub burn_probability: Field<f64>,
    /// Distribution of burn probability over every cell, `None` on an empty grid
    pub summary: Option<Summary>,
}

/// Result of [`compare_seasons`]
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonComparison {
    /// Run records labelled `summer` and `winter`
    pub scenario: ScenarioResult,
    /// Summer first, then winter
    pub seasons: Vec<SeasonOutcome>,
}

impl SeasonComparison {
    /// Outcome of `season`
    pub fn season(&self, season: Season) -> Option<&SeasonOutcome> {
        self.seasons.iter().find(|outcome| outcome.season == season)
    }
}

/// Run one batch from a single ignition point and label its records
fn run_labelled(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    table: &VegetationTable,
    start: (usize, usize),
    category: &str,
    config: &SimulationConfig,
    result: &mut ScenarioResult,
) -> Result<()> {
    let ignited = clear_and_set_fire(grid, start)?;
    let batch =
        MonteCarloSimulation::with_table(ignited, vegetation.clone(), table.clone(), config)?;
    result.push_batch(batch.run()?, category, config.wind_speed);
    Ok(())
}

/// Compare fires started in bush with fires started in other vegetation
///
/// Both batches start from the matching cell closest to the grid center.
/// A kind with no matching cell is skipped with a warning.
pub fn compare_bush_non_bush(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    table: &VegetationTable,
    config: &SimulationConfig,
) -> Result<ScenarioResult> {
    let center = (grid.rows() / 2, grid.cols() / 2);
    let mut result = ScenarioResult::empty();

    for target in [ClosestTarget::Bush, ClosestTarget::NonBush] {
        if let Some(start) = find_closest_location(grid, vegetation, target, center) {
            info!("Simulating fire point ({}): {:?}", target, start);
            run_labelled(
                grid,
                vegetation,
                table,
                start,
                target.category(),
                config,
                &mut result,
            )?;
        } else {
            warn!("No valid fire point found for {}", target);
        }
    }

    Ok(result)
}

/// Repeat a batch for each wind speed, igniting at `(rows / 4, cols / 2)`
///
/// Direction and every other setting come from `config`.
pub fn compare_wind_speeds(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    table: &VegetationTable,
    speeds: &[f64],
    config: &SimulationConfig,
) -> Result<ScenarioResult> {
    let start = (grid.rows() / 4, grid.cols() / 2);
    let mut result = ScenarioResult::empty();

    for &wind_speed in speeds {
        info!(
            "Simulating for wind speed: {} m/s, direction: {}",
            wind_speed, config.wind_direction
        );
        let speed_config = SimulationConfig {
            wind_speed,
            ..config.clone()
        };
        let category = format!("wind_{wind_speed}");
        run_labelled(
            grid,
            vegetation,
            table,
            start,
            &category,
            &speed_config,
            &mut result,
        )?;
    }

    Ok(result)
}

/// Run one summer and one winter batch from the fire already in `grid`
///
/// Every other setting, the seed included, comes from `config`, so the two
/// batches differ only in their season baseline.
pub fn compare_seasons(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    table: &VegetationTable,
    config: &SimulationConfig,
) -> Result<SeasonComparison> {
    let mut comparison = SeasonComparison {
        scenario: ScenarioResult::empty(),
        seasons: Vec::with_capacity(2),
    };

    for season in [Season::Summer, Season::Winter] {
        info!("Simulating {} season", season);
        let season_config = SimulationConfig {
            season: Some(season),
            ..config.clone()
        };
        let batch = MonteCarloSimulation::with_table(
            grid.clone(),
            vegetation.clone(),
            table.clone(),
            &season_config,
        )?;
        let outcome = batch.run()?;

        let burn_probability = outcome.burn_probability.clone();
        let summary = Summary::from_values(burn_probability.iter().copied());
        comparison
            .scenario
            .push_batch(outcome, season.label(), config.wind_speed);
        comparison.seasons.push(SeasonOutcome {
            season,
            burn_probability,
            summary,
        });
    }

    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::WindDirection;
    use crate::grid::{generate_terrain, TerrainConfig};

    fn mixed_terrain() -> (TerrainGrid, VegetationMap) {
        let grid = TerrainGrid::from_code_rows(&[
            vec![1, 1, 1, 1, 5],
            vec![1, 3, 1, 1, 1],
            vec![2, 1, 1, 0, 1],
            vec![1, 5, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Willow);
        (grid, vegetation)
    }

    fn config() -> SimulationConfig {
        SimulationConfig {
            simulations: 5,
            seed: Some(99),
            ..Default::default()
        }
    }

    #[test]
    fn test_clear_and_set_fire() {
        let (grid, _) = mixed_terrain();
        let ignited = clear_and_set_fire(&grid, (4, 4)).unwrap();
        assert_eq!(ignited.count(CellState::Burning), 1);
        assert_eq!(ignited[(4, 4)], CellState::Burning);
        assert_eq!(ignited[(2, 0)], CellState::Empty);
        // Input untouched
        assert_eq!(grid[(2, 0)], CellState::Burning);
    }

    #[test]
    fn test_clear_and_set_fire_out_of_bounds() {
        let (grid, _) = mixed_terrain();
        assert_eq!(
            clear_and_set_fire(&grid, (5, 0)),
            Err(FireSimError::OutOfBounds {
                row: 5,
                col: 0,
                rows: 5,
                cols: 5
            })
        );
    }

    #[test]
    fn test_find_closest_location() {
        let (grid, vegetation) = mixed_terrain();
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::Bush, (2, 2)),
            Some((3, 1))
        );
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::NonBush, (2, 2)),
            Some((2, 2))
        );
        // A matching center is its own closest location
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::NonBush, (0, 0)),
            Some((0, 0))
        );
    }

    #[test]
    fn test_find_closest_location_ties_row_major() {
        let grid = TerrainGrid::from_code_rows(&[vec![0, 5, 0], vec![5, 0, 5], vec![0, 5, 0]])
            .unwrap();
        let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Pine);
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::Bush, (1, 1)),
            Some((0, 1))
        );
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::NonBush, (1, 1)),
            None
        );
    }

    #[test]
    fn test_non_bush_skips_bush_labelled_vegetation() {
        let grid = TerrainGrid::from_code_rows(&[vec![1, 1]]).unwrap();
        let vegetation = VegetationMap::from_labels(&[vec!["bush", "oak"]]).unwrap();
        assert_eq!(
            find_closest_location(&grid, &vegetation, ClosestTarget::NonBush, (0, 0)),
            Some((0, 1))
        );
    }

    #[test]
    fn test_compare_bush_non_bush() {
        let (grid, vegetation) = mixed_terrain();
        let result =
            compare_bush_non_bush(&grid, &vegetation, &VegetationTable::default(), &config())
                .unwrap();
        assert_eq!(result.category("fire_at_bush").count(), 5);
        assert_eq!(result.category("fire_at_non_bush").count(), 5);
        assert_eq!(result.records.len(), 10);
        assert!(result.burn_probability.is_some());
    }

    #[test]
    fn test_compare_wind_speeds() {
        let (grid, vegetation) = mixed_terrain();
        let config = SimulationConfig {
            wind_direction: WindDirection::North,
            ..config()
        };
        let result = compare_wind_speeds(
            &grid,
            &vegetation,
            &VegetationTable::default(),
            &[0.0, 2.5, 6.0],
            &config,
        )
        .unwrap();

        assert_eq!(result.records.len(), 15);
        let speeds: Vec<f64> = result.records.iter().map(|r| r.wind_speed).collect();
        assert_eq!(&speeds[..5], &[0.0; 5]);
        assert_eq!(&speeds[10..], &[6.0; 5]);
        assert_eq!(result.category("wind_2.5").count(), 5);
        // Ignition at (1, 2) burns out in every run
        let probability = result.burn_probability.unwrap();
        assert_eq!(probability[(1, 2)], 1.0);
    }

    #[test]
    fn test_compare_seasons() {
        let (grid, vegetation) = generate_terrain(&TerrainConfig {
            rows: 20,
            cols: 20,
            ignition: Some((10, 10)),
            seed: 17,
            ..Default::default()
        })
        .unwrap();
        let config = SimulationConfig {
            simulations: 20,
            ..config()
        };
        let comparison =
            compare_seasons(&grid, &vegetation, &VegetationTable::default(), &config).unwrap();

        assert_eq!(comparison.scenario.category("summer").count(), 20);
        assert_eq!(comparison.scenario.category("winter").count(), 20);
        assert_eq!(comparison.seasons.len(), 2);

        let summer = comparison.season(Season::Summer).unwrap();
        let winter = comparison.season(Season::Winter).unwrap();
        // The ignition cell burns out in every run of both seasons
        assert_eq!(summer.burn_probability[(10, 10)], 1.0);
        assert_eq!(winter.burn_probability[(10, 10)], 1.0);

        let summer = summer.summary.unwrap();
        let winter = winter.summary.unwrap();
        assert_eq!(summer.count, 400);
        assert!(
            summer.mean >= winter.mean,
            "summer {} < winter {}",
            summer.mean,
            winter.mean
        );
    }

    #[test]
    fn test_compare_seasons_without_fire() {
        let (grid, vegetation) = mixed_terrain();
        let cold = grid.map(|&state| {
            if state == CellState::Burning {
                CellState::Empty
            } else {
                state
            }
        });
        let comparison =
            compare_seasons(&cold, &vegetation, &VegetationTable::default(), &config()).unwrap();
        assert!(comparison.scenario.records.is_empty());
        for outcome in &comparison.seasons {
            assert_eq!(outcome.summary.unwrap().max, 0.0);
        }
    }
}
