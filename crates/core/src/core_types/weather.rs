//! Seasonal and wind inputs for the fire spread model

use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season selecting the baseline humidity and temperature
///
/// Experiments without a season tag use `Option<Season>::None`, which maps to
/// the mild default baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Hot and dry: humidity 0.1, 30°C
    Summer,
    /// Cool and damp: humidity 0.4, 12°C
    Winter,
}

impl Season {
    /// Label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = FireSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summer" => Ok(Season::Summer),
            "winter" => Ok(Season::Winter),
            _ => Err(FireSimError::UnknownSeason(s.to_string())),
        }
    }
}

/// Compass direction the wind comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindDirection {
    /// Northerly wind, pushes fire south
    North,
    /// Easterly wind, pushes fire west
    East,
    /// Southerly wind, pushes fire north
    South,
    /// Westerly wind, pushes fire east
    #[default]
    West,
}

impl WindDirection {
    /// Single-letter symbol
    pub fn symbol(self) -> &'static str {
        match self {
            WindDirection::North => "N",
            WindDirection::East => "E",
            WindDirection::South => "S",
            WindDirection::West => "W",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for WindDirection {
    type Err = FireSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(WindDirection::North),
            "E" | "EAST" => Ok(WindDirection::East),
            "S" | "SOUTH" => Ok(WindDirection::South),
            "W" | "WEST" => Ok(WindDirection::West),
            _ => Err(FireSimError::UnknownWindDirection(s.to_string())),
        }
    }
}
