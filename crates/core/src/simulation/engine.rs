//! Cellular-automaton fire transition engine
//!
//! Each step applies the transition rule synchronously: neighbors are judged
//! against the grid as it was at the start of the step, and all writes become
//! visible together at the end of it.
//!
//! Per step:
//! 1. No burning cells means the run is over.
//! 2. Humidity and temperature are recomputed for the current grid.
//! 3. Every burning cell whose cooldown has run out tries to ignite its four
//!    cardinal neighbors (N, S, W, E) that are vegetation or bush, then burns
//!    out. Propagation is one-shot: a cell spreads once, in the step its
//!    cooldown first reaches zero.
//! 4. All cooldowns drop by one, floored at zero.
//!
//! The engine keeps a sorted work-list of burning cells, so a step costs time
//! proportional to the fire, not to the grid. Sources are visited in row-major
//! order so random draws are consumed in a fixed order.

use crate::core_types::{CellState, VegetationTable};
use crate::error::{FireSimError, Result};
use crate::grid::{ensure_same_shape, Field, TerrainGrid, VegetationMap, NEIGHBOR_OFFSETS};
use crate::physics::{EnvironmentCalculator, EnvironmentFields, WindModel};
use crate::simulation::config::SimulationConfig;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Temperature at which the temperature term of the ignition probability is 1
const REFERENCE_TEMPERATURE: f64 = 25.0;

/// Divisor of the wind term in the ignition probability
const WIND_IGNITION_DIVISOR: f64 = 5.0;

/// Receives the grid after every step
///
/// Observers cannot fail, so rendering or logging problems never abort a run.
/// Closures taking `(&TerrainGrid, &VegetationMap, hours)` implement it.
pub trait StepObserver {
    /// Called once after each completed step
    fn on_step(&mut self, grid: &TerrainGrid, vegetation: &VegetationMap, hours: u32);
}

impl<F> StepObserver for F
where
    F: FnMut(&TerrainGrid, &VegetationMap, u32),
{
    fn on_step(&mut self, grid: &TerrainGrid, vegetation: &VegetationMap, hours: u32) {
        self(grid, vegetation, hours);
    }
}

/// Immutable inputs of a fire experiment
///
/// Holds the starting grid, the vegetation map and table, the cached
/// environment calculator and the wind factors. Shared read-only by every
/// run, including runs on other threads.
#[derive(Debug, Clone)]
pub struct SpreadModel {
    initial_grid: TerrainGrid,
    vegetation: VegetationMap,
    table: VegetationTable,
    environment: EnvironmentCalculator,
    wind: WindModel,
    wind_factors: [f64; 4],
    wind_effect: bool,
    max_steps: u32,
}

impl SpreadModel {
    /// Build a model with the default vegetation table
    pub fn new(
        grid: TerrainGrid,
        vegetation: VegetationMap,
        config: &SimulationConfig,
    ) -> Result<Self> {
        Self::with_table(grid, vegetation, VegetationTable::default(), config)
    }

    /// Build a model with a custom vegetation table
    ///
    /// Fails if the grid and vegetation map differ in shape or the wind
    /// configuration is invalid.
    pub fn with_table(
        grid: TerrainGrid,
        vegetation: VegetationMap,
        table: VegetationTable,
        config: &SimulationConfig,
    ) -> Result<Self> {
        ensure_same_shape(&grid, &vegetation)?;
        let wind = config.wind()?;
        let environment = EnvironmentCalculator::new(&grid, config.season);

        Ok(Self {
            wind_factors: wind.factors(),
            initial_grid: grid,
            vegetation,
            table,
            environment,
            wind,
            wind_effect: config.wind_effect,
            max_steps: config.max_steps,
        })
    }

    /// Start a fresh run from a copy of the initial grid
    pub fn start(&self) -> FireSimulation<'_> {
        FireSimulation::new(self)
    }

    /// Grid every run starts from
    pub fn initial_grid(&self) -> &TerrainGrid {
        &self.initial_grid
    }

    /// Vegetation labels
    pub fn vegetation(&self) -> &VegetationMap {
        &self.vegetation
    }

    /// Vegetation constants
    pub fn table(&self) -> &VegetationTable {
        &self.table
    }

    /// Wind model
    pub fn wind(&self) -> WindModel {
        self.wind
    }

    /// Wind factors for the N, S, W, E neighbors
    pub fn wind_factors(&self) -> [f64; 4] {
        self.wind_factors
    }

    /// Whether wind shortens cooldowns
    pub fn wind_effect(&self) -> bool {
        self.wind_effect
    }

    /// Step cap per run
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Environment calculator for this terrain and season
    pub fn environment(&self) -> &EnvironmentCalculator {
        &self.environment
    }

    /// Probability that a burning neighbor ignites the cell at `(row, col)`
    /// from the direction with wind factor `wind_factor`
    ///
    /// `flammability × (1 - humidity) × (1 + (T - 25) / 100) × (1 + wind / 5)`,
    /// clamped to `[0, 1]`.
    pub fn ignition_probability(
        &self,
        environment: &EnvironmentFields,
        row: usize,
        col: usize,
        wind_factor: f64,
    ) -> f64 {
        let flammability = self.table.flammability(self.vegetation[(row, col)]);
        let humidity = environment.humidity_at(row, col);
        let temperature = environment.temperature_at(row, col);

        let probability = flammability
            * (1.0 - humidity)
            * (1.0 + (temperature - REFERENCE_TEMPERATURE) / 100.0)
            * (1.0 + wind_factor / WIND_IGNITION_DIVISOR);
        probability.clamp(0.0, 1.0)
    }

    /// Burn rate of the cell at `(row, col)` when ignited from the direction
    /// with wind factor `wind_factor`
    pub fn adjusted_burn_rate(&self, row: usize, col: usize, wind_factor: f64) -> f64 {
        let burn_rate = self.table.burn_rate(self.vegetation[(row, col)]);
        if self.wind_effect {
            burn_rate * (1.0 + wind_factor)
        } else {
            burn_rate
        }
    }
}

/// What happened during one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step count after this step
    pub hours: u32,
    /// Cells that caught fire this step (each counted once)
    pub ignited: usize,
    /// Flat indices of cells that burned out this step, row-major
    pub burned_out: Vec<usize>,
    /// Cells still burning after this step
    pub burning: usize,
}

/// Summary of one run that burned to extinction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps taken ("hours")
    pub duration: u32,
    /// Cells that burned out during the run
    pub burned_area: usize,
}

/// One simulation run
///
/// Owns the mutable grid and cooldown field; everything else is borrowed from
/// the [`SpreadModel`].
#[derive(Debug, Clone)]
pub struct FireSimulation<'m> {
    model: &'m SpreadModel,
    grid: TerrainGrid,
    cooldown: Field<f64>,
    /// Flat indices of burning cells, sorted row-major
    burning: Vec<usize>,
    /// Flat indices of cells burned out so far, in burn order
    burned_cells: Vec<usize>,
    hours: u32,
    environment: Option<EnvironmentFields>,
}

impl<'m> FireSimulation<'m> {
    /// Start a run from a copy of the model's initial grid
    pub fn new(model: &'m SpreadModel) -> Self {
        let grid = model.initial_grid.clone();
        let cooldown = Field::new(grid.rows(), grid.cols());
        let burning = grid.indices_of(CellState::Burning);

        Self {
            model,
            grid,
            cooldown,
            burning,
            burned_cells: Vec::new(),
            hours: 0,
            environment: None,
        }
    }

    /// Current grid
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    /// Vegetation labels
    pub fn vegetation(&self) -> &VegetationMap {
        &self.model.vegetation
    }

    /// Remaining cooldown per cell
    pub fn cooldown(&self) -> &Field<f64> {
        &self.cooldown
    }

    /// Steps taken so far
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Flat indices of burning cells, row-major
    pub fn burning_cells(&self) -> &[usize] {
        &self.burning
    }

    /// Whether any cell is still burning
    pub fn is_burning(&self) -> bool {
        !self.burning.is_empty()
    }

    /// Flat indices of cells burned out so far
    pub fn burned_cells(&self) -> &[usize] {
        &self.burned_cells
    }

    /// Number of cells burned out so far
    pub fn burned_area(&self) -> usize {
        self.burned_cells.len()
    }

    /// Humidity and temperature used by the most recent step
    pub fn environment(&self) -> Option<&EnvironmentFields> {
        self.environment.as_ref()
    }

    /// Advance one step
    ///
    /// Returns `None` without doing anything once no cell is burning.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<StepOutcome> {
        if self.burning.is_empty() {
            return None;
        }

        let model = self.model;
        let environment = model
            .environment
            .compute_with_fires(&self.grid, &self.burning);

        // Cells set on fire this step still count as flammable for later
        // sources: the rule reads the grid from the start of the step.
        let mut ignited: FxHashSet<usize> = FxHashSet::default();
        let mut burned_out = Vec::new();

        for &source in &self.burning {
            if self.cooldown.as_slice()[source] > 0.0 {
                continue;
            }
            let (row, col) = self.grid.coords(source);

            for (direction, &offset) in NEIGHBOR_OFFSETS.iter().enumerate() {
                let Some((nr, nc)) = self.grid.offset(row, col, offset) else {
                    continue;
                };
                let neighbor = self.grid.index_of(nr, nc);
                let was_flammable =
                    self.grid.as_slice()[neighbor].is_flammable() || ignited.contains(&neighbor);
                if !was_flammable {
                    continue;
                }

                let wind_factor = model.wind_factors[direction];
                let probability = model.ignition_probability(&environment, nr, nc, wind_factor);
                if rng.random::<f64>() < probability {
                    let burn_rate = model.adjusted_burn_rate(nr, nc, wind_factor);
                    self.grid.as_mut_slice()[neighbor] = CellState::Burning;
                    self.cooldown.as_mut_slice()[neighbor] = 1.0 / burn_rate;
                    ignited.insert(neighbor);
                }
            }

            self.grid.as_mut_slice()[source] = CellState::BurnedOut;
            self.cooldown.as_mut_slice()[source] = 0.0;
            burned_out.push(source);
        }

        // Work-list for the next step; burned-out sources are sorted, so a
        // binary search is enough to drop them
        self.burning
            .retain(|index| burned_out.binary_search(index).is_err());
        self.burning.extend(ignited.iter().copied());
        self.burning.sort_unstable();

        // Only burning cells can hold a non-zero cooldown
        let cooldown = self.cooldown.as_mut_slice();
        for &index in &self.burning {
            cooldown[index] = (cooldown[index] - 1.0).max(0.0);
        }

        self.hours += 1;
        self.burned_cells.extend_from_slice(&burned_out);
        self.environment = Some(environment);

        debug!(
            "Step {}: {} ignited, {} burned out, {} burning",
            self.hours,
            ignited.len(),
            burned_out.len(),
            self.burning.len()
        );

        Some(StepOutcome {
            hours: self.hours,
            ignited: ignited.len(),
            burned_out,
            burning: self.burning.len(),
        })
    }

    /// Step until no cell is burning
    pub fn run_to_extinction<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RunSummary> {
        self.run_with_observer(rng, &mut |_: &TerrainGrid, _: &VegetationMap, _: u32| {})
    }

    /// Step until no cell is burning, reporting every step to `observer`
    ///
    /// Fails with [`FireSimError::StepLimitExceeded`] if the fire is still
    /// burning after the model's step cap.
    pub fn run_with_observer<R, O>(&mut self, rng: &mut R, observer: &mut O) -> Result<RunSummary>
    where
        R: Rng + ?Sized,
        O: StepObserver + ?Sized,
    {
        while self.is_burning() {
            if self.hours >= self.model.max_steps {
                return Err(FireSimError::StepLimitExceeded {
                    limit: self.model.max_steps,
                });
            }
            if self.step(rng).is_some() {
                observer.on_step(&self.grid, &self.model.vegetation, self.hours);
            }
        }

        Ok(RunSummary {
            duration: self.hours,
            burned_area: self.burned_area(),
        })
    }

    /// Consume the run, returning the final grid
    pub fn into_grid(self) -> TerrainGrid {
        self.grid
    }
}
