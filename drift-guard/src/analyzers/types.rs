//! Result types produced by the analysis engine.
//!
//! An [`Observation`] is the complete analysis record for one numeric
//! column. Statistics that cannot be computed (empty or all-missing input)
//! are represented as `None` and serialize to JSON `null` — never as a
//! fabricated number.

use serde::{Deserialize, Serialize};

/// The structured analysis result for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Descriptive statistics.
    pub stats: SeriesStats,
    /// Rolling z-score outlier summary.
    pub outliers: OutlierSummary,
    /// Rupture (change-point) markers.
    pub ruptures: RuptureSummary,
    /// Spectral periodicity peaks.
    pub seasonality: SeasonalitySummary,
}

/// Descriptive statistics for a numeric series.
///
/// `count` is the total observation count, `finite_count` the number of
/// finite values, `missing_count` the number of missing (NaN) markers.
/// All value statistics are `None` when no finite value exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub finite_count: usize,
    pub missing_count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor n−1); 0.0 for a single value.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    /// 5th percentile, linear interpolation between order statistics.
    pub p05: Option<f64>,
    /// 95th percentile, linear interpolation between order statistics.
    pub p95: Option<f64>,
    /// Ordinary-least-squares slope of value against row position.
    pub trend_slope: Option<f64>,
}

/// Summary of rolling z-score outlier detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Number of points flagged as outliers.
    pub outlier_count: usize,
    /// Number of positions with a fully defined rolling window.
    pub observed_count: usize,
    /// `outlier_count / observed_count`, or 0.0 when nothing was observed.
    pub density: f64,
}

/// Ordered rupture markers, highest score first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuptureSummary {
    /// Descriptive method label from the configuration.
    pub method: String,
    pub marks: Vec<RuptureMark>,
}

/// A single detected rupture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuptureMark {
    /// Index immediately following the rolling-mean pair that produced the
    /// difference.
    pub index: usize,
    /// Absolute rolling-mean difference.
    pub score: f64,
}

/// Ordered spectral peaks, highest amplitude first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalitySummary {
    pub peaks: Vec<SeasonalityPeak>,
}

/// A single spectral peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityPeak {
    /// Frequency in cycles per sample.
    pub frequency: f64,
    /// Period in samples (`1 / frequency`).
    pub period: f64,
    /// Amplitude of the spectrum bin.
    pub amplitude: f64,
}
