//! Descriptive statistics for burn probabilities and run records

use crate::core_types::VegetationType;
use crate::grid::{Field, VegetationMap};
use crate::simulation::SimulationRecord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count, moments, extremes and quartiles of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// 25th percentile
    pub p25: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub p75: f64,
}

impl Summary {
    /// Summarize `values`, `None` when there are none
    ///
    /// Percentiles interpolate linearly between the two closest ranks.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = values.into_iter().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            p75: percentile(&sorted, 0.75),
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.4} std={:.4} min={:.4} p25={:.4} median={:.4} p75={:.4} max={:.4}",
            self.count,
            self.mean,
            self.std_dev,
            self.min,
            self.p25,
            self.median,
            self.p75,
            self.max
        )
    }
}

/// Percentile `q` in `[0, 1]` of sorted, non-empty values
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Burn-probability summary per vegetation type
///
/// Types that occur nowhere in the map are absent.
pub fn summary_by_vegetation(
    vegetation: &VegetationMap,
    probabilities: &Field<f64>,
) -> FxHashMap<VegetationType, Summary> {
    let mut groups: FxHashMap<VegetationType, Vec<f64>> = FxHashMap::default();
    for (&label, &probability) in vegetation.iter().zip(probabilities.iter()) {
        groups.entry(label).or_default().push(probability);
    }

    groups
        .into_iter()
        .filter_map(|(label, values)| {
            Summary::from_values(values).map(|summary| (label, summary))
        })
        .collect()
}

/// Burned area and duration statistics over a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Cells burned out per run
    pub burned_area: Summary,
    /// Simulated hours per run
    pub duration: Summary,
}

impl RunStatistics {
    /// `None` for an empty record list
    pub fn from_records(records: &[SimulationRecord]) -> Option<Self> {
        Some(Self {
            burned_area: Summary::from_values(records.iter().map(|r| r.burned_area as f64))?,
            duration: Summary::from_values(records.iter().map(|r| f64::from(r.duration)))?,
        })
    }
}
