//! Error types for the fire spread simulator
//!
//! Every variant is a configuration or programming error. Degenerate but valid
//! inputs (zero simulations, empty grids, grids with nothing to burn) are not
//! errors and never produce one.

use std::fmt;

/// Errors raised while building or running a fire simulation
#[derive(Debug, Clone, PartialEq)]
pub enum FireSimError {
    /// Terrain grid and vegetation map have different shapes
    ShapeMismatch {
        /// `(rows, cols)` of the terrain grid
        grid: (usize, usize),
        /// `(rows, cols)` of the vegetation map
        vegetation: (usize, usize),
    },
    /// Integer cell code outside the known state set (0..=5)
    InvalidCellCode(u8),
    /// Vegetation label not present in the closed label set
    UnknownVegetationType(String),
    /// Wind direction symbol other than N, E, S or W
    UnknownWindDirection(String),
    /// Season label other than summer or winter
    UnknownSeason(String),
    /// Wind speed that is negative or not finite
    InvalidWindSpeed(f64),
    /// Terrain vegetation density that is not finite
    InvalidVegetationDensity(f64),
    /// Vegetation table entry that would break the transition rule
    InvalidVegetationProperties {
        /// Label of the offending entry
        vegetation: String,
        /// What is wrong with it
        reason: String,
    },
    /// Flat cell buffer whose length is not `rows * cols`
    BufferSizeMismatch {
        /// `rows * cols`
        expected: usize,
        /// Length of the buffer
        found: usize,
    },
    /// Row-based grid input whose rows differ in length
    RaggedRows {
        /// Index of the first row with the wrong length
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },
    /// Coordinates outside the grid
    OutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Rows in the grid
        rows: usize,
        /// Columns in the grid
        cols: usize,
    },
    /// A run was still burning after the configured number of steps
    StepLimitExceeded {
        /// The configured cap
        limit: u32,
    },
}

impl fmt::Display for FireSimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireSimError::ShapeMismatch { grid, vegetation } => write!(
                f,
                "Grid shape {}x{} does not match vegetation map shape {}x{}",
                grid.0, grid.1, vegetation.0, vegetation.1
            ),
            FireSimError::InvalidCellCode(code) => {
                write!(f, "Invalid cell code {code}, expected 0..=5")
            }
            FireSimError::UnknownVegetationType(label) => {
                write!(f, "Unknown vegetation type '{label}'")
            }
            FireSimError::UnknownWindDirection(label) => {
                write!(f, "Unknown wind direction '{label}', expected N, E, S or W")
            }
            FireSimError::UnknownSeason(label) => {
                write!(f, "Unknown season '{label}', expected summer or winter")
            }
            FireSimError::InvalidWindSpeed(speed) => {
                write!(f, "Wind speed must be finite and non-negative, got {speed}")
            }
            FireSimError::InvalidVegetationDensity(density) => {
                write!(f, "Vegetation density must be finite, got {density}")
            }
            FireSimError::InvalidVegetationProperties { vegetation, reason } => write!(
                f,
                "Invalid properties for vegetation '{vegetation}': {reason}"
            ),
            FireSimError::BufferSizeMismatch { expected, found } => {
                write!(f, "Expected {expected} cells, got {found}")
            }
            FireSimError::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {row} has {found} cells, expected {expected} like the first row"
            ),
            FireSimError::OutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(f, "Cell ({row}, {col}) is outside the {rows}x{cols} grid"),
            FireSimError::StepLimitExceeded { limit } => {
                write!(f, "Fire still burning after {limit} steps")
            }
        }
    }
}

impl std::error::Error for FireSimError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FireSimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FireSimError::UnknownWindDirection("NE".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown wind direction 'NE', expected N, E, S or W"
        );

        let err = FireSimError::ShapeMismatch {
            grid: (3, 3),
            vegetation: (3, 4),
        };
        assert_eq!(
            err.to_string(),
            "Grid shape 3x3 does not match vegetation map shape 3x4"
        );

        let err = FireSimError::StepLimitExceeded { limit: 10 };
        assert_eq!(err.to_string(), "Fire still burning after 10 steps");

        let err = FireSimError::OutOfBounds {
            row: 7,
            col: 1,
            rows: 5,
            cols: 5,
        };
        assert_eq!(err.to_string(), "Cell (7, 1) is outside the 5x5 grid");

        let err = FireSimError::InvalidVegetationDensity(f64::NAN);
        assert_eq!(err.to_string(), "Vegetation density must be finite, got NaN");
    }

    #[test]
    fn test_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&FireSimError::InvalidCellCode(9));
    }
}
