//! Behavioral properties of the fire transition rule
//!
//! Covers the invariants every run must satisfy (inert cells, extinction),
//! cooldown timing, the shape of a certain-ignition fire front and the
//! absence of directional bias without wind.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use wildfire_ca_core::grid::{generate_terrain, TerrainConfig};
use wildfire_ca_core::simulation::{MonteCarloSimulation, SpreadModel};
use wildfire_ca_core::{
    CellState, FireSimError, Season, SimulationConfig, TerrainGrid, VegetationMap,
    VegetationProperties, VegetationTable, VegetationType, WindDirection,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every tree type ignites with flammability 1 and the given burn rate
fn uniform_table(burn_rate: f64) -> VegetationTable {
    VegetationTable::new(
        VegetationType::TREES
            .into_iter()
            .map(|v| (v, VegetationProperties::new(1.0, burn_rate))),
    )
    .unwrap()
}

fn vegetation_grid(rows: usize, cols: usize, fire: (usize, usize)) -> TerrainGrid {
    let mut grid = TerrainGrid::with_value(rows, cols, CellState::Vegetation);
    grid[fire] = CellState::Burning;
    grid
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[test]
fn test_inert_cells_never_change() {
    for seed in 0..8 {
        let (grid, vegetation) = generate_terrain(&TerrainConfig {
            rows: 20,
            cols: 20,
            ignition: Some((10, 10)),
            seed,
            ..Default::default()
        })
        .unwrap();
        let config = SimulationConfig {
            wind_speed: 4.0,
            wind_direction: WindDirection::South,
            season: Some(Season::Summer),
            ..Default::default()
        };
        let model = SpreadModel::new(grid.clone(), vegetation, &config).unwrap();

        let mut sim = model.start();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut observer = |current: &TerrainGrid, _: &VegetationMap, _: u32| {
            for ((row, col), &state) in grid.indexed_iter() {
                if state.is_inert() {
                    assert_eq!(current[(row, col)], state, "({row}, {col}) changed");
                }
            }
        };
        sim.run_with_observer(&mut rng, &mut observer).unwrap();
    }
}

#[test]
fn test_no_burning_cells_at_termination() {
    for seed in 0..8 {
        let (grid, vegetation) = generate_terrain(&TerrainConfig {
            rows: 25,
            cols: 25,
            ignition: Some((3, 20)),
            seed: 100 + seed,
            ..Default::default()
        })
        .unwrap();
        let model = SpreadModel::new(grid, vegetation, &SimulationConfig::default()).unwrap();
        let mut sim = model.start();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let summary = sim.run_to_extinction(&mut rng).unwrap();

        assert_eq!(sim.grid().count(CellState::Burning), 0);
        assert!(!sim.is_burning());
        assert_eq!(summary.burned_area, sim.grid().count(CellState::BurnedOut));
    }
}

#[test]
fn test_burned_cells_were_flammable() {
    let (grid, vegetation) = generate_terrain(&TerrainConfig {
        rows: 20,
        cols: 20,
        ignition: Some((5, 5)),
        seed: 7,
        ..Default::default()
    })
    .unwrap();
    let model = SpreadModel::new(grid.clone(), vegetation, &SimulationConfig::default()).unwrap();
    let mut sim = model.start();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    sim.run_to_extinction(&mut rng).unwrap();

    for &index in sim.burned_cells() {
        let before = grid.as_slice()[index];
        assert!(
            before.is_flammable() || before == CellState::Burning,
            "cell {index} burned from state {before:?}"
        );
    }
}

#[test]
fn test_same_seed_same_run() {
    let (grid, vegetation) = generate_terrain(&TerrainConfig {
        rows: 20,
        cols: 20,
        ignition: Some((10, 4)),
        seed: 3,
        ..Default::default()
    })
    .unwrap();
    let config = SimulationConfig {
        wind_speed: 2.0,
        wind_direction: WindDirection::East,
        ..Default::default()
    };
    let model = SpreadModel::new(grid, vegetation, &config).unwrap();

    let run = |seed: u64| {
        let mut sim = model.start();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let summary = sim.run_to_extinction(&mut rng).unwrap();
        (summary, sim.into_grid())
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn test_cooldown_delays_spread_by_ceil_inverse_rate() {
    let config = SimulationConfig {
        wind_effect: false,
        ..Default::default()
    };

    for (burn_rate, wait) in [
        (1.0, 1),
        (0.5, 2),
        (0.3, 4),
        (0.25, 4),
        (0.2, 5),
        (20.0 / 46.0, 3),
    ] {
        let grid = TerrainGrid::from_code_rows(&[vec![2, 1, 1]]).unwrap();
        let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Pine);
        let model =
            SpreadModel::with_table(grid, vegetation, uniform_table(burn_rate), &config).unwrap();
        let mut sim = model.start();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // Step 1: the seed spreads into the middle cell and burns out
        sim.step(&mut rng).unwrap();
        assert_eq!(sim.grid()[(0, 0)], CellState::BurnedOut);
        assert_eq!(sim.grid()[(0, 1)], CellState::Burning);

        // The middle cell keeps burning without spreading while cooling down
        for hour in 2..=wait {
            sim.step(&mut rng).unwrap();
            assert_eq!(sim.hours(), hour);
            assert_eq!(
                sim.grid()[(0, 1)],
                CellState::Burning,
                "rate {burn_rate}: spread too early at hour {hour}"
            );
            assert_eq!(sim.grid()[(0, 2)], CellState::Vegetation);
        }

        // Then spreads and burns out in the same step
        let outcome = sim.step(&mut rng).unwrap();
        assert_eq!(outcome.hours, 1 + wait);
        assert_eq!(outcome.burned_out, vec![1]);
        assert_eq!(sim.grid()[(0, 1)], CellState::BurnedOut);
        assert_eq!(sim.grid()[(0, 2)], CellState::Burning);
    }
}

#[test]
fn test_certain_ignition_burns_a_diamond() {
    let center = (7, 7);
    let grid = vegetation_grid(15, 15, center);
    let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Oak);
    let model = SpreadModel::with_table(
        grid,
        vegetation,
        uniform_table(1.0),
        &SimulationConfig::default(),
    )
    .unwrap();
    let mut sim = model.start();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    for hours in 1..=6 {
        sim.step(&mut rng).unwrap();
        let burned: BTreeSet<(usize, usize)> = sim
            .grid()
            .indexed_iter()
            .filter(|(_, &state)| state == CellState::BurnedOut)
            .map(|(pos, _)| pos)
            .collect();
        let diamond: BTreeSet<(usize, usize)> = (0..15)
            .flat_map(|r| (0..15).map(move |c| (r, c)))
            .filter(|&pos| manhattan(pos, center) < hours)
            .collect();
        assert_eq!(burned, diamond, "after {hours} hours");

        // The front is the next ring out
        for ((row, col), &state) in sim.grid().indexed_iter() {
            let on_front = manhattan((row, col), center) == hours;
            assert_eq!(state == CellState::Burning, on_front);
        }
    }
}

#[test]
fn test_uncertain_ignition_stays_inside_the_ball() {
    let center = (6, 6);
    let table = VegetationTable::new(
        VegetationType::TREES
            .into_iter()
            .map(|v| (v, VegetationProperties::new(0.6, 1.0))),
    )
    .unwrap();

    let config = SimulationConfig::default();
    for seed in 0..10 {
        let grid = vegetation_grid(13, 13, center);
        let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Willow);
        let model =
            SpreadModel::with_table(grid, vegetation, table.clone(), &config).unwrap();
        let mut sim = model.start();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        while let Some(outcome) = sim.step(&mut rng) {
            for ((row, col), &state) in sim.grid().indexed_iter() {
                if state == CellState::BurnedOut || state == CellState::Burning {
                    assert!(manhattan((row, col), center) <= outcome.hours as usize);
                }
            }
        }
    }
}

#[test]
fn test_no_directional_bias_without_wind() {
    let center = (10, 10);
    let grid = vegetation_grid(21, 21, center);
    let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Pine);
    let table = VegetationTable::new(
        VegetationType::TREES
            .into_iter()
            .map(|v| (v, VegetationProperties::new(0.55, 1.0))),
    )
    .unwrap();

    for direction in [WindDirection::North, WindDirection::East] {
        let config = SimulationConfig {
            wind_speed: 0.5,
            wind_direction: direction,
            simulations: 400,
            seed: Some(2024),
            ..Default::default()
        };
        let batch = MonteCarloSimulation::with_table(
            grid.clone(),
            vegetation.clone(),
            table.clone(),
            &config,
        )
        .unwrap();
        let probability = batch.run().unwrap().burn_probability;

        // Mean burn probability along each arm, distances 1..=6
        let arm = |dr: isize, dc: isize| {
            (1..=6_isize)
                .map(|d| {
                    let row = (center.0 as isize + dr * d) as usize;
                    let col = (center.1 as isize + dc * d) as usize;
                    probability[(row, col)]
                })
                .sum::<f64>()
                / 6.0
        };
        let arms = [arm(-1, 0), arm(1, 0), arm(0, -1), arm(0, 1)];
        let mean = arms.iter().sum::<f64>() / 4.0;
        for value in arms {
            assert!(
                (value - mean).abs() < 0.08,
                "arm means {arms:?} are biased under {direction} calm wind"
            );
        }
    }
}

#[test]
fn test_wind_pushes_fire_downwind() {
    let center = (10, 10);
    let grid = vegetation_grid(21, 21, center);
    let vegetation = VegetationMap::uniform_for(&grid, VegetationType::Oak);
    // Wind from the west drives fire east
    let config = SimulationConfig {
        wind_speed: 3.0,
        wind_direction: WindDirection::West,
        simulations: 200,
        seed: Some(5),
        ..Default::default()
    };
    let result = MonteCarloSimulation::new(grid, vegetation, &config)
        .unwrap()
        .run()
        .unwrap();

    let downwind: f64 = (11..21).map(|c| result.burn_probability[(10, c)]).sum();
    let upwind: f64 = (0..10).map(|c| result.burn_probability[(10, c)]).sum();
    assert!(downwind > upwind, "downwind {downwind} <= upwind {upwind}");
}

#[test]
fn test_shape_mismatch_is_rejected() {
    let grid = TerrainGrid::new(4, 4);
    let vegetation = VegetationMap::new(4, 5);
    let config = SimulationConfig::default();
    let err = MonteCarloSimulation::new(grid, vegetation, &config).unwrap_err();
    assert_eq!(
        err,
        FireSimError::ShapeMismatch {
            grid: (4, 4),
            vegetation: (4, 5)
        }
    );
}

#[test]
fn test_unknown_labels_fail_fast() {
    assert_eq!(
        "NE".parse::<WindDirection>(),
        Err(FireSimError::UnknownWindDirection("NE".to_string()))
    );
    assert!(matches!(
        VegetationMap::from_labels(&[vec!["pine", "eucalyptus"]]),
        Err(FireSimError::UnknownVegetationType(label)) if label == "eucalyptus"
    ));
    assert!("autumn".parse::<Season>().is_err());
}
