//! Directional wind bias
//!
//! Wind is reduced to four scalar factors, one per cardinal neighbor in the
//! [`NEIGHBOR_OFFSETS`](crate::grid::NEIGHBOR_OFFSETS) order (N, S, W, E).
//! A factor multiplies into both the ignition probability and the effective
//! burn rate of the neighbor it points at.
//!
//! Below 1 m/s the wind has no effect and every factor is 1. Above that the
//! downwind ("tailwind") factor grows linearly with speed:
//!
//! ```text
//! tailwind = 0.49 × speed + 0.5
//! against  = max(1 - tailwind, 0)
//! ```
//!
//! `against` is floored at 0 so strong wind can only suppress upwind spread,
//! never produce a negative burn rate or probability.

use crate::core_types::WindDirection;
use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};

/// Speeds below this have no directional effect
pub const CALM_WIND_THRESHOLD: f64 = 1.0;

/// Slope of the tailwind factor against wind speed
const TAILWIND_SLOPE: f64 = 0.49;

/// Tailwind factor intercept
const TAILWIND_OFFSET: f64 = 0.5;

/// Wind speed and direction for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindModel {
    speed: f64,
    direction: WindDirection,
}

impl WindModel {
    /// Create a wind model
    ///
    /// Speed must be finite and non-negative.
    pub fn new(speed: f64, direction: WindDirection) -> Result<Self> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(FireSimError::InvalidWindSpeed(speed));
        }
        Ok(Self { speed, direction })
    }

    /// Still air
    pub fn calm() -> Self {
        Self {
            speed: 0.0,
            direction: WindDirection::default(),
        }
    }

    /// Wind speed
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Direction the wind comes from
    pub fn direction(&self) -> WindDirection {
        self.direction
    }

    /// `(tailwind, against_wind)` factors for the current speed
    pub fn tailwind_and_against(&self) -> (f64, f64) {
        if self.speed < CALM_WIND_THRESHOLD {
            return (1.0, 1.0);
        }
        let tailwind = TAILWIND_SLOPE * self.speed + TAILWIND_OFFSET;
        let against = (1.0 - tailwind).max(0.0);
        (tailwind, against)
    }

    /// Factors for the N, S, W, E neighbors
    pub fn factors(&self) -> [f64; 4] {
        let (tail, against) = self.tailwind_and_against();
        match self.direction {
            WindDirection::North => [against, tail, 1.0, 1.0],
            WindDirection::South => [tail, against, 1.0, 1.0],
            WindDirection::East => [1.0, 1.0, tail, against],
            WindDirection::West => [1.0, 1.0, against, tail],
        }
    }
}

impl Default for WindModel {
    fn default() -> Self {
        Self::calm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calm_wind_is_neutral() {
        for direction in [
            WindDirection::North,
            WindDirection::East,
            WindDirection::South,
            WindDirection::West,
        ] {
            for speed in [0.0, 0.5, 0.999] {
                let wind = WindModel::new(speed, direction).unwrap();
                assert_eq!(wind.factors(), [1.0; 4]);
            }
        }
    }

    #[test]
    fn test_direction_table() {
        let speed = 1.0;
        let tail = 0.99;
        let against = 0.01;
        let factors = |direction| WindModel::new(speed, direction).unwrap().factors();

        let north = factors(WindDirection::North);
        assert_relative_eq!(north[0], against, epsilon = 1e-12);
        assert_relative_eq!(north[1], tail, epsilon = 1e-12);
        assert_eq!(&north[2..], &[1.0, 1.0]);

        let south = factors(WindDirection::South);
        assert_relative_eq!(south[0], tail, epsilon = 1e-12);
        assert_relative_eq!(south[1], against, epsilon = 1e-12);

        let east = factors(WindDirection::East);
        assert_eq!(&east[..2], &[1.0, 1.0]);
        assert_relative_eq!(east[2], tail, epsilon = 1e-12);
        assert_relative_eq!(east[3], against, epsilon = 1e-12);

        let west = factors(WindDirection::West);
        assert_relative_eq!(west[2], against, epsilon = 1e-12);
        assert_relative_eq!(west[3], tail, epsilon = 1e-12);
    }

    #[test]
    fn test_strong_wind_floors_against_factor() {
        let wind = WindModel::new(10.0, WindDirection::North).unwrap();
        let (tail, against) = wind.tailwind_and_against();
        assert_relative_eq!(tail, 5.4, epsilon = 1e-12);
        assert_eq!(against, 0.0);
        assert!(wind.factors().iter().all(|&f| f >= 0.0));
    }

    #[test]
    fn test_invalid_speed_rejected() {
        assert_eq!(
            WindModel::new(-1.0, WindDirection::North),
            Err(FireSimError::InvalidWindSpeed(-1.0))
        );
        assert!(WindModel::new(f64::INFINITY, WindDirection::North).is_err());
        assert!(WindModel::new(f64::NAN, WindDirection::North).is_err());
    }
}
