// 🧮 Aggregations - the small derivations the views share
//
// Unit conversions, the year-keyed target split, the completeness matrix,
// histogram binning, and the seeded synthetic contract labor sample.

use crate::error::{DashboardError, Result};
use crate::sample_data::{ContractLaborRecord, OperatingMetricsRecord};
use crate::table::{DataTable, Value};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};
use serde::Serialize;

pub const MILLION: f64 = 1_000_000.0;
pub const BILLION: f64 = 1_000_000_000.0;

/// Contract labor target band, in percent
pub const TARGET_MIN_PCT: f64 = 3.0;
pub const TARGET_MAX_PCT: f64 = 5.0;

/// Allowed drift of below+within+above from 100%
pub const TARGET_SUM_TOLERANCE: f64 = 0.1;

pub const SYNTHETIC_SEED: u64 = 42;
pub const SYNTHETIC_SAMPLES: usize = 1000;
pub const SYNTHETIC_CLIP_MAX: f64 = 45.0;
const GAMMA_SHAPE: f64 = 2.0;
const GAMMA_SCALE: f64 = 1.0;

// ============================================================================
// UNIT CONVERSION
// ============================================================================

pub fn to_millions(raw: f64) -> f64 {
    raw / MILLION
}

pub fn to_billions(raw: f64) -> f64 {
    raw / BILLION
}

pub fn fte_per_bed(fte: f64, beds: f64) -> f64 {
    fte / beds
}

// ============================================================================
// TARGET SPLIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetDistribution {
    pub year: u16,
    pub below: f64,
    pub within: f64,
    pub above: f64,
}

impl TargetDistribution {
    pub const BELOW_LABEL: &'static str = "Below Target (<3%)";
    pub const WITHIN_LABEL: &'static str = "Within Target (3-5%)";
    pub const ABOVE_LABEL: &'static str = "Above Target (>5%)";

    pub fn total(&self) -> f64 {
        self.below + self.within + self.above
    }

    pub fn is_balanced(&self) -> bool {
        (self.total() - 100.0).abs() <= TARGET_SUM_TOLERANCE + 1e-9
    }

    pub fn to_table(&self) -> DataTable {
        let mut table = DataTable::new(&["Category", "Percentage"]);
        table.push_row(vec![Self::BELOW_LABEL.into(), self.below.into()]);
        table.push_row(vec![Self::WITHIN_LABEL.into(), self.within.into()]);
        table.push_row(vec![Self::ABOVE_LABEL.into(), self.above.into()]);
        table
    }
}

/// Below/within/above split for one year, looked up in the contract table
pub fn target_distribution(records: &[ContractLaborRecord], year: u16) -> Result<TargetDistribution> {
    records
        .iter()
        .find(|r| r.year == year)
        .map(|r| TargetDistribution {
            year,
            below: r.below_target_pct,
            within: r.within_target_pct,
            above: r.above_target_pct,
        })
        .ok_or_else(|| DashboardError::missing_year("contract labor targets", year))
}

// ============================================================================
// COMPLETENESS MATRIX
// ============================================================================

/// Completeness percentages laid out metric × year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessMatrix {
    pub years: Vec<u16>,
    pub metrics: Vec<&'static str>,
    /// values[metric][year]
    pub values: Vec<Vec<f64>>,
}

impl CompletenessMatrix {
    pub fn get(&self, metric: &str, year: u16) -> Option<f64> {
        let m = self.metrics.iter().position(|x| *x == metric)?;
        let y = self.years.iter().position(|x| *x == year)?;
        Some(self.values[m][y])
    }

    /// Long layout (Year, Data Type, Completeness) for heatmap renderers
    pub fn to_long_table(&self) -> DataTable {
        let mut table = DataTable::new(&["Year", "Data Type", "Completeness"]);
        for (m, metric) in self.metrics.iter().enumerate() {
            for (y, year) in self.years.iter().enumerate() {
                table.push_row(vec![
                    (*year).into(),
                    metric_label(metric).into(),
                    self.values[m][y].into(),
                ]);
            }
        }
        table
    }
}

pub fn completeness_matrix(records: &[OperatingMetricsRecord]) -> CompletenessMatrix {
    let metrics: Vec<&'static str> = vec![
        "Revenue_Complete",
        "Cost_Complete",
        "FTE_Complete",
        "Contract_Complete",
    ];

    let values = (0..metrics.len())
        .map(|m| records.iter().map(|r| r.completeness()[m].1).collect())
        .collect();

    CompletenessMatrix {
        years: records.iter().map(|r| r.year).collect(),
        metrics,
        values,
    }
}

/// "Revenue_Complete" -> "Revenue Data"
pub fn metric_label(column: &str) -> String {
    match column.strip_suffix("_Complete") {
        Some(stem) => format!("{} Data", stem),
        None => column.to_string(),
    }
}

// ============================================================================
// SYNTHETIC DISTRIBUTION
// ============================================================================

/// Seeded contract labor sample used only to give the histogram texture.
///
/// Gamma(shape 2, scale 1) has mean 2, so scaling by `mean / 2` centres the
/// sample on the year's mean. Values are clipped to [0, 45].
pub fn synthetic_contract_sample(mean: f64, seed: u64) -> Result<Vec<f64>> {
    let gamma = Gamma::new(GAMMA_SHAPE, GAMMA_SCALE)
        .map_err(|e| DashboardError::Distribution(e.to_string()))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    Ok((0..SYNTHETIC_SAMPLES)
        .map(|_| {
            let draw: f64 = gamma.sample(&mut rng);
            (draw * mean / 2.0).clamp(0.0, SYNTHETIC_CLIP_MAX)
        })
        .collect())
}

pub fn sample_table(column: &str, values: &[f64]) -> DataTable {
    let mut table = DataTable::new(&[column]);
    for v in values {
        table.push_row(vec![Value::Float(*v)]);
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over [min, max]; the last bin is closed on the right
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count,
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
