//! Monte Carlo driver
//!
//! Repeats burn-to-extinction runs from the same starting grid and folds the
//! burned-out cells of every run into per-cell counts. Each run owns its grid
//! copy, cooldown field and random stream, so runs can execute on the rayon
//! pool and still produce exactly the sequential result.

use crate::core_types::VegetationTable;
use crate::error::Result;
use crate::grid::{Field, TerrainGrid, VegetationMap};
use crate::simulation::config::SimulationConfig;
use crate::simulation::engine::{SpreadModel, StepObserver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Summary of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    /// Position of the run in the batch
    pub run_index: usize,
    /// Cells that burned out during the run
    pub burned_area: usize,
    /// Steps until no cell was burning ("hours")
    pub duration: u32,
}

/// Output of a Monte Carlo batch
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloResult {
    /// Fraction of runs in which each cell burned out
    pub burn_probability: Field<f64>,
    /// Number of runs in which each cell burned out
    pub burn_counts: Field<u32>,
    /// Per-run summaries ordered by run index
    pub records: Vec<SimulationRecord>,
    /// Runs requested
    pub simulations: usize,
    /// Seed the batch ran with
    pub seed: u64,
}

impl MonteCarloResult {
    fn empty(rows: usize, cols: usize, simulations: usize, seed: u64) -> Self {
        Self {
            burn_probability: Field::with_value(rows, cols, 0.0),
            burn_counts: Field::with_value(rows, cols, 0),
            records: Vec::new(),
            simulations,
            seed,
        }
    }

    /// Mean burned area over all runs, 0 without runs
    pub fn mean_burned_area(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: usize = self.records.iter().map(|r| r.burned_area).sum();
        total as f64 / self.records.len() as f64
    }

    /// Mean duration over all runs, 0 without runs
    pub fn mean_duration(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: u64 = self.records.iter().map(|r| u64::from(r.duration)).sum();
        total as f64 / self.records.len() as f64
    }
}

/// One finished run as handed to [`MonteCarloSimulation::run_each`]
#[derive(Debug)]
pub struct RunProgress<'a> {
    /// Summary of the run that just finished
    pub record: SimulationRecord,
    /// Final grid of that run
    pub final_grid: &'a TerrainGrid,
    /// Burn counts including this run
    pub burn_counts: &'a Field<u32>,
}

/// Result of a single run before it is folded into the batch
struct RunOutcome {
    record: SimulationRecord,
    burned_cells: Vec<usize>,
    final_grid: TerrainGrid,
}

/// Batch of independent runs over one terrain
#[derive(Debug, Clone)]
pub struct MonteCarloSimulation {
    model: SpreadModel,
    simulations: usize,
    seed: u64,
    parallel: bool,
}

impl MonteCarloSimulation {
    /// Create a batch with the default vegetation table
    pub fn new(
        grid: TerrainGrid,
        vegetation: VegetationMap,
        config: &SimulationConfig,
    ) -> Result<Self> {
        Self::with_table(grid, vegetation, VegetationTable::default(), config)
    }

    /// Create a batch with a custom vegetation table
    pub fn with_table(
        grid: TerrainGrid,
        vegetation: VegetationMap,
        table: VegetationTable,
        config: &SimulationConfig,
    ) -> Result<Self> {
        let model = SpreadModel::with_table(grid, vegetation, table, config)?;
        Ok(Self::from_model(model, config))
    }

    /// Wrap an existing model, taking batch settings from `config`
    pub fn from_model(model: SpreadModel, config: &SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            info!("No seed configured, drew {} from entropy", seed);
            seed
        });

        Self {
            model,
            simulations: config.simulations,
            seed,
            parallel: config.parallel,
        }
    }

    /// Model shared by every run
    pub fn model(&self) -> &SpreadModel {
        &self.model
    }

    /// Seed of the batch
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs in the batch
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// Random stream for run `run_index`
    ///
    /// Every run gets its own `ChaCha` stream under the batch seed, so the
    /// draws of one run never depend on which runs happened before it.
    pub fn rng_for_run(&self, run_index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(run_index as u64);
        rng
    }

    /// Execute run `run_index` to extinction
    ///
    /// Observers see every step of this run only.
    pub fn run_single<O>(&self, run_index: usize, observer: &mut O) -> Result<SimulationRecord>
    where
        O: StepObserver + ?Sized,
    {
        let mut rng = self.rng_for_run(run_index);
        let mut sim = self.model.start();
        let summary = sim.run_with_observer(&mut rng, observer)?;
        Ok(SimulationRecord {
            run_index,
            burned_area: summary.burned_area,
            duration: summary.duration,
        })
    }

    fn execute(&self, run_index: usize) -> Result<RunOutcome> {
        let mut rng = self.rng_for_run(run_index);
        let mut sim = self.model.start();
        let summary = sim.run_to_extinction(&mut rng)?;
        debug!(
            "Run {} finished after {} hours, {} cells burned",
            run_index, summary.duration, summary.burned_area
        );

        let burned_cells = sim.burned_cells().to_vec();
        Ok(RunOutcome {
            record: SimulationRecord {
                run_index,
                burned_area: summary.burned_area,
                duration: summary.duration,
            },
            burned_cells,
            final_grid: sim.into_grid(),
        })
    }

    /// Whether the batch has nothing to simulate; logs why
    fn is_degenerate(&self) -> bool {
        let grid = self.model.initial_grid();
        if self.simulations == 0 {
            warn!("Monte Carlo batch requested with zero simulations");
            return true;
        }
        if grid.is_empty() {
            warn!("Monte Carlo batch on an empty grid");
            return true;
        }
        if !grid.has_fire() {
            warn!("No burning cell in the initial grid, nothing to simulate");
            return true;
        }
        if grid.flammable_count() == 0 {
            warn!("No flammable cells, fire cannot spread beyond its seeds");
        }
        false
    }

    fn log_start(&self) {
        let wind = self.model.wind();
        let (rows, cols) = self.model.initial_grid().shape();
        info!(
            "Starting {} simulations on {}x{} grid with seed {}",
            self.simulations, rows, cols, self.seed
        );
        info!(
            "Wind {} m/s from {}, season {:?}, wind effect {}",
            wind.speed(),
            wind.direction(),
            self.model.environment().season(),
            self.model.wind_effect()
        );
    }

    /// Run the whole batch
    ///
    /// Runs execute on the rayon pool when the configuration asks for it;
    /// either way the result is identical for the same seed.
    pub fn run(&self) -> Result<MonteCarloResult> {
        let (rows, cols) = self.model.initial_grid().shape();
        let mut result = MonteCarloResult::empty(rows, cols, self.simulations, self.seed);
        if self.is_degenerate() {
            return Ok(result);
        }
        self.log_start();

        let outcomes: Vec<RunOutcome> = if self.parallel {
            (0..self.simulations)
                .into_par_iter()
                .map(|run_index| self.execute(run_index))
                .collect::<Result<_>>()?
        } else {
            (0..self.simulations)
                .map(|run_index| self.execute(run_index))
                .collect::<Result<_>>()?
        };

        for outcome in outcomes {
            accumulate(&mut result.burn_counts, &outcome.burned_cells);
            result.records.push(outcome.record);
        }
        self.finish(&mut result);
        Ok(result)
    }

    /// Run the batch sequentially, reporting each finished run
    ///
    /// `on_run` sees the record, the final grid and the burn counts
    /// accumulated so far, in run order.
    pub fn run_each<F>(&self, mut on_run: F) -> Result<MonteCarloResult>
    where
        F: FnMut(&RunProgress<'_>),
    {
        let (rows, cols) = self.model.initial_grid().shape();
        let mut result = MonteCarloResult::empty(rows, cols, self.simulations, self.seed);
        if self.is_degenerate() {
            return Ok(result);
        }
        self.log_start();

        for run_index in 0..self.simulations {
            let outcome = self.execute(run_index)?;
            accumulate(&mut result.burn_counts, &outcome.burned_cells);
            on_run(&RunProgress {
                record: outcome.record,
                final_grid: &outcome.final_grid,
                burn_counts: &result.burn_counts,
            });
            result.records.push(outcome.record);
        }
        self.finish(&mut result);
        Ok(result)
    }

    fn finish(&self, result: &mut MonteCarloResult) {
        let simulations = self.simulations as f64;
        result.burn_probability = result
            .burn_counts
            .map(|&count| f64::from(count) / simulations);

        info!(
            "Finished {} simulations: mean burned area {:.2}, mean duration {:.2} hours",
            self.simulations,
            result.mean_burned_area(),
            result.mean_duration()
        );
    }
}

/// Count every burned cell of one run once
fn accumulate(counts: &mut Field<u32>, burned_cells: &[usize]) {
    let counts = counts.as_mut_slice();
    for &index in burned_cells {
        counts[index] += 1;
    }
}
