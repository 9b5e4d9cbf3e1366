//! Order statistics and percentile interpolation.
//!
//! [`compute_stats`] summarizes one numeric series into a [`StatRecord`];
//! [`percentile`] interpolates over an already-sorted series. Both are total:
//! an empty series yields zeros rather than an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Summary of one team's values for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub mean: f64,
    /// Upper quartile, picked at index `floor(0.75 * n)` of the sorted series.
    pub q3: f64,
}

impl StatRecord {
    /// Every field set to the same value (used for externally supplied ratings).
    pub fn uniform(value: f64) -> Self {
        Self {
            max: value,
            min: value,
            median: value,
            mean: value,
            q3: value,
        }
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Max => self.max,
            StatKind::Min => self.min,
            StatKind::Median => self.median,
            StatKind::Mean => self.mean,
            StatKind::Q3 => self.q3,
        }
    }

    /// Round every field to one decimal place.
    pub fn rounded(&self) -> Self {
        Self {
            max: round1(self.max),
            min: round1(self.min),
            median: round1(self.median),
            mean: round1(self.mean),
            q3: round1(self.q3),
        }
    }
}

/// Which [`StatRecord`] field a percentile band or ranking is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Min,
    Max,
    Median,
    Mean,
    Q3,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::Min,
        StatKind::Max,
        StatKind::Median,
        StatKind::Mean,
        StatKind::Q3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Min => "min",
            StatKind::Max => "max",
            StatKind::Median => "median",
            StatKind::Mean => "mean",
            StatKind::Q3 => "q3",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        StatKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown statistic: {s} (expected min, max, median, mean, q3)"))
    }
}

/// 10th/25th/75th/90th percentiles of one statistic across teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

impl PercentileBand {
    /// Compute the band over an ascending series. The series is not re-sorted.
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p10: percentile(sorted, 10.0),
            p25: percentile(sorted, 25.0),
            p75: percentile(sorted, 75.0),
            p90: percentile(sorted, 90.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Summarize a series: max, min, median, mean and index-picked q3.
///
/// The even-count median and the mean are rounded to one decimal; the
/// odd-count median, extremes and q3 are element values and stay exact.
pub fn compute_stats(values: &[f64]) -> StatRecord {
    if values.is_empty() {
        return StatRecord::default();
    }

    let mut sorted = values.to_vec();
    sort_ascending(&mut sorted);
    let n = sorted.len();

    let median = if n % 2 == 0 {
        round1((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        sorted[n / 2]
    };
    let mean = round1(sorted.iter().sum::<f64>() / n as f64);
    // floor(0.75 n) < n for every n >= 1.
    let q3 = sorted[(n as f64 * 0.75).floor() as usize];

    StatRecord {
        max: sorted[n - 1],
        min: sorted[0],
        median,
        mean,
        q3,
    }
}

/// Linear-interpolated percentile `p` (0–100) of an ascending series.
///
/// Returns 0 for an empty series. `p` is clamped to 0–100. The caller sorts.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (sorted[upper] - sorted[lower]) * (idx - lower as f64)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Round half-up to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0 + 0.5).floor() / 10.0
}

/// Round half-up to an integer.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

pub(crate) fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}
