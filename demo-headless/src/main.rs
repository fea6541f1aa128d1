use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wildfire_ca_core::analysis::{
    summary_by_vegetation, water_proximity_split, RunStatistics, DEFAULT_WATER_THRESHOLD,
};
use wildfire_ca_core::simulation::{
    compare_bush_non_bush, compare_seasons, compare_wind_speeds, ScenarioResult,
};
use wildfire_ca_core::{
    generate_terrain, CellState, Field, MonteCarloSimulation, Result, Season, SimulationConfig,
    SimulationRecord, TerrainConfig, TerrainGrid, VegetationMap, VegetationTable, VegetationType,
    WindDirection,
};

/// Experiment to run on the generated terrain
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Experiment {
    /// One Monte Carlo batch from a single ignition point
    Batch,
    /// Fires started in bush vs. other vegetation near the center
    Bush,
    /// One batch per wind speed from (rows/4, cols/2)
    WindSweep,
    /// Summer and winter batches from the same ignition point
    Seasons,
}

/// Headless wildfire spread experiments
#[derive(Parser, Debug)]
#[command(name = "wildfire-ca-headless")]
#[command(about = "Cellular-automaton wildfire experiments", long_about = None)]
struct Args {
    /// Grid rows
    #[arg(long, default_value_t = 50)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 50)]
    cols: usize,

    /// Seed for terrain generation
    #[arg(long, default_value_t = 42)]
    terrain_seed: u64,

    /// Seed for the Monte Carlo runs (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Runs per batch
    #[arg(short = 'n', long, default_value_t = 50)]
    simulations: usize,

    /// Wind speed in m/s
    #[arg(short, long, default_value_t = 0.0)]
    wind_speed: f64,

    /// Direction the wind comes from (N, E, S, W)
    #[arg(short = 'd', long, default_value = "W")]
    wind_direction: WindDirection,

    /// Season (summer, winter); default baseline when omitted
    #[arg(long)]
    season: Option<Season>,

    /// Keep wind from shortening burn cooldowns
    #[arg(long)]
    no_wind_effect: bool,

    /// Run batches on a single thread
    #[arg(long)]
    sequential: bool,

    /// Experiment to run
    #[arg(short, long, value_enum, default_value_t = Experiment::Batch)]
    experiment: Experiment,

    /// Wind speeds for the wind sweep
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 5.0, 10.0])]
    speeds: Vec<f64>,

    /// Ignition row for the batch and season experiments (grid center when omitted)
    #[arg(long)]
    ignition_row: Option<usize>,

    /// Ignition column for the batch and season experiments (grid center when omitted)
    #[arg(long)]
    ignition_col: Option<usize>,

    /// Print the burn probability map
    #[arg(short, long)]
    map: bool,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            season: self.season,
            wind_effect: !self.no_wind_effect,
            simulations: self.simulations,
            seed: self.seed,
            parallel: !self.sequential,
            ..Default::default()
        }
    }

    fn ignition(&self) -> (usize, usize) {
        (
            self.ignition_row.unwrap_or(self.rows / 2),
            self.ignition_col.unwrap_or(self.cols / 2),
        )
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    println!("=== Wildfire Spread Experiments ===\n");

    let seeded = matches!(args.experiment, Experiment::Batch | Experiment::Seasons);
    let ignition = seeded.then(|| args.ignition());
    let terrain = TerrainConfig {
        rows: args.rows,
        cols: args.cols,
        ignition,
        seed: args.terrain_seed,
        ..Default::default()
    };
    let (grid, vegetation) = generate_terrain(&terrain)?;
    print_terrain(&grid);

    let config = args.simulation_config();
    info!(
        "Wind {} m/s from {}, season {}, wind effect {}",
        config.wind_speed,
        config.wind_direction,
        config.season.map_or("default", Season::label),
        config.wind_effect
    );

    let table = VegetationTable::default();
    match args.experiment {
        Experiment::Batch => {
            let batch =
                MonteCarloSimulation::with_table(grid.clone(), vegetation.clone(), table, &config)?;
            let result = batch.run()?;
            println!("Seed: {}", result.seed);
            print_run_statistics("All runs", &result.records);
            print_probability_report(&grid, &vegetation, &result.burn_probability, args.map);
        }
        Experiment::Bush => {
            let result = compare_bush_non_bush(&grid, &vegetation, &table, &config)?;
            print_scenario(&result, &["fire_at_bush", "fire_at_non_bush"]);
        }
        Experiment::WindSweep => {
            let result = compare_wind_speeds(&grid, &vegetation, &table, &args.speeds, &config)?;
            let categories: Vec<_> = args.speeds.iter().map(|s| format!("wind_{s}")).collect();
            let labels: Vec<&str> = categories.iter().map(String::as_str).collect();
            print_scenario(&result, &labels);
            if let Some(probability) = &result.burn_probability {
                println!("\nLast wind speed:");
                print_probability_report(&grid, &vegetation, probability, args.map);
            }
        }
        Experiment::Seasons => {
            let comparison = compare_seasons(&grid, &vegetation, &table, &config)?;
            print_scenario(&comparison.scenario, &["summer", "winter"]);
            println!("\nBurn probability over all cells:");
            for outcome in &comparison.seasons {
                let label = outcome.season.label();
                if let Some(summary) = &outcome.summary {
                    println!("  {label:<7} {summary}");
                } else {
                    println!("  {label:<7} none");
                }
            }
            for outcome in &comparison.seasons {
                println!("\n{}:", outcome.season.label());
                let probability = &outcome.burn_probability;
                print_probability_report(&grid, &vegetation, probability, args.map);
            }
        }
    }

    Ok(())
}

fn print_terrain(grid: &TerrainGrid) {
    println!("Terrain: {}x{}", grid.rows(), grid.cols());
    for state in [
        CellState::Vegetation,
        CellState::Bush,
        CellState::Water,
        CellState::Empty,
        CellState::Burning,
    ] {
        let label = format!("{state:?}");
        println!("  {label:<10} {:5}", grid.count(state));
    }
    println!();
}

fn print_run_statistics(label: &str, records: &[SimulationRecord]) {
    if let Some(stats) = RunStatistics::from_records(records) {
        println!("{label} ({} runs)", records.len());
        println!("  Burned area: {}", stats.burned_area);
        println!("  Duration:    {}", stats.duration);
    } else {
        println!("{label}: no runs");
    }
}

fn print_scenario(result: &ScenarioResult, categories: &[&str]) {
    println!("Category           | Runs | Mean area | Mean hours");
    println!("-------------------|------|-----------|-----------");
    for &category in categories {
        let records: Vec<SimulationRecord> =
            result.category(category).map(|r| r.record).collect();
        if let Some(stats) = RunStatistics::from_records(&records) {
            println!(
                "{:<18} | {:4} | {:9.2} | {:10.2}",
                category,
                records.len(),
                stats.burned_area.mean,
                stats.duration.mean
            );
        } else {
            println!("{:<18} | {:4} | {:>9} | {:>10}", category, 0, "-", "-");
        }
    }
}

fn print_probability_report(
    grid: &TerrainGrid,
    vegetation: &VegetationMap,
    probability: &Field<f64>,
    show_map: bool,
) {
    println!("\nBurn probability by distance to water:");
    let split = water_proximity_split(grid, probability, DEFAULT_WATER_THRESHOLD);
    for (bound, summary) in [("<=", split.near), (">", split.far)] {
        if let Some(summary) = summary {
            println!("  {bound:<2} {DEFAULT_WATER_THRESHOLD} cells: {summary}");
        } else {
            println!("  {bound:<2} {DEFAULT_WATER_THRESHOLD} cells: none");
        }
    }

    println!("\nBurn probability by vegetation:");
    let by_type = summary_by_vegetation(vegetation, probability);
    for vegetation_type in VegetationType::ALL {
        if let Some(summary) = by_type.get(&vegetation_type) {
            println!("  {:<7} {}", vegetation_type.label(), summary);
        }
    }

    if show_map {
        println!("\nBurn probability map (' ' = 0, '@' = 1, '~' = water):");
        print_map(grid, probability);
    }
}

fn print_map(grid: &TerrainGrid, probability: &Field<f64>) {
    const SHADES: &[u8] = b" .:-=+*#%@";
    for row in 0..grid.rows() {
        let line: String = (0..grid.cols())
            .map(|col| {
                if grid[(row, col)] == CellState::Water {
                    '~'
                } else {
                    let p = probability[(row, col)].clamp(0.0, 1.0);
                    let shade = (p * (SHADES.len() - 1) as f64).round() as usize;
                    char::from(SHADES[shade])
                }
            })
            .collect();
        println!("|{line}|");
    }
}
