//! Vegetation types and their fire behavior constants
//!
//! Each cell carries a vegetation label assigned at terrain generation time.
//! The label selects two constants from a [`VegetationTable`]:
//! - flammability: base ignition likelihood in `[0, 1]`
//! - burn rate: inverse of the refractory period after ignition, in
//!   "fraction of grid covered per simulated hour"
//!
//! The table is an immutable value handed to the simulation, so several
//! scenarios with different flammability sets can run side by side.

use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vegetation label of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VegetationType {
    /// Pine, high flammability
    Pine,
    /// Oak, medium flammability
    Oak,
    /// Willow, low flammability and slow burning
    Willow,
    /// Bush, very high flammability, burns out in a single step
    Bush,
    /// Empty or unplanted land (label `none`), never ignites
    #[default]
    Bare,
}

impl VegetationType {
    /// All labels in table order
    pub const ALL: [VegetationType; 5] = [
        VegetationType::Pine,
        VegetationType::Oak,
        VegetationType::Willow,
        VegetationType::Bush,
        VegetationType::Bare,
    ];

    /// Tree species used when planting ordinary vegetation cells
    pub const TREES: [VegetationType; 3] = [
        VegetationType::Pine,
        VegetationType::Oak,
        VegetationType::Willow,
    ];

    /// Label used in grid files and reports
    pub fn label(self) -> &'static str {
        match self {
            VegetationType::Pine => "pine",
            VegetationType::Oak => "oak",
            VegetationType::Willow => "willow",
            VegetationType::Bush => "bush",
            VegetationType::Bare => "none",
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            VegetationType::Pine => 0,
            VegetationType::Oak => 1,
            VegetationType::Willow => 2,
            VegetationType::Bush => 3,
            VegetationType::Bare => 4,
        }
    }
}

impl fmt::Display for VegetationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VegetationType {
    type Err = FireSimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pine" => Ok(VegetationType::Pine),
            "oak" => Ok(VegetationType::Oak),
            "willow" => Ok(VegetationType::Willow),
            "bush" => Ok(VegetationType::Bush),
            "none" => Ok(VegetationType::Bare),
            _ => Err(FireSimError::UnknownVegetationType(s.to_string())),
        }
    }
}

/// Fire behavior constants of one vegetation type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationProperties {
    /// Base ignition likelihood (0-1)
    pub flammability: f64,
    /// Inverse of the cooldown duration after ignition
    pub burn_rate: f64,
}

impl VegetationProperties {
    /// Create a property pair
    pub const fn new(flammability: f64, burn_rate: f64) -> Self {
        Self {
            flammability,
            burn_rate,
        }
    }

    /// Pine tree with high flammability
    pub const PINE: VegetationProperties = VegetationProperties::new(0.8, 20.0 / 46.0);

    /// Oak tree with medium flammability, burns slower than pine
    pub const OAK: VegetationProperties = VegetationProperties::new(0.7, 15.0 / 46.0);

    /// Willow with low flammability, slowest burning tree
    pub const WILLOW: VegetationProperties = VegetationProperties::new(0.5, 10.0 / 46.0);

    /// Bush burns the fastest, fully burning in one step
    pub const BUSH: VegetationProperties = VegetationProperties::new(0.95, 1.0);

    /// Unplanted land does not burn
    pub const BARE: VegetationProperties = VegetationProperties::new(0.0, 0.0);

    fn validate(&self, vegetation: VegetationType) -> Result<()> {
        let invalid = |reason: String| FireSimError::InvalidVegetationProperties {
            vegetation: vegetation.label().to_string(),
            reason,
        };

        if !self.flammability.is_finite() || !(0.0..=1.0).contains(&self.flammability) {
            return Err(invalid(format!(
                "flammability must be within [0, 1], got {}",
                self.flammability
            )));
        }
        if !self.burn_rate.is_finite() || self.burn_rate < 0.0 {
            return Err(invalid(format!(
                "burn rate must be finite and non-negative, got {}",
                self.burn_rate
            )));
        }
        // An ignitable cell with no burn rate would keep burning forever
        if self.flammability > 0.0 && self.burn_rate <= 0.0 {
            return Err(invalid(
                "flammable vegetation needs a positive burn rate".to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable lookup of vegetation constants
///
/// Every [`VegetationType`] has an entry, so lookups cannot miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationTable {
    entries: [VegetationProperties; 5],
}

impl Default for VegetationTable {
    fn default() -> Self {
        Self {
            entries: [
                VegetationProperties::PINE,
                VegetationProperties::OAK,
                VegetationProperties::WILLOW,
                VegetationProperties::BUSH,
                VegetationProperties::BARE,
            ],
        }
    }
}

impl VegetationTable {
    /// Build a table from explicit entries
    ///
    /// Types missing from `entries` keep their default constants.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (VegetationType, VegetationProperties)>,
    {
        entries
            .into_iter()
            .try_fold(Self::default(), |table, (vegetation, properties)| {
                table.with_properties(vegetation, properties)
            })
    }

    /// Return a copy with one entry replaced
    pub fn with_properties(
        mut self,
        vegetation: VegetationType,
        properties: VegetationProperties,
    ) -> Result<Self> {
        properties.validate(vegetation)?;
        self.entries[vegetation.index()] = properties;
        Ok(self)
    }

    /// Constants for a vegetation type
    #[inline]
    pub fn properties(&self, vegetation: VegetationType) -> VegetationProperties {
        self.entries[vegetation.index()]
    }

    /// Flammability for a vegetation type
    #[inline]
    pub fn flammability(&self, vegetation: VegetationType) -> f64 {
        self.properties(vegetation).flammability
    }

    /// Burn rate for a vegetation type
    #[inline]
    pub fn burn_rate(&self, vegetation: VegetationType) -> f64 {
        self.properties(vegetation).burn_rate
    }
}
