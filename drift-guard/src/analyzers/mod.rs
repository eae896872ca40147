//! The analysis engine: pure, deterministic functions mapping one numeric
//! series (plus parameters) to a structured [`Observation`].
//!
//! Missing values are represented as NaN throughout. None of these routines
//! touch the filesystem or hold state; given identical inputs and
//! parameters they produce identical results.

mod outliers;
mod rolling;
mod ruptures;
mod seasonality;
mod stats;
mod types;

pub use outliers::rolling_outliers;
pub use ruptures::rupture_marks;
pub use seasonality::spectral_peaks;
pub use stats::{describe, trend_slope};
pub use types::{
    Observation, OutlierSummary, RuptureMark, RuptureSummary, SeasonalityPeak,
    SeasonalitySummary, SeriesStats,
};

use crate::config::RunConfig;

/// Engine parameters for one run, extracted once from the resolved
/// configuration.
#[derive(Debug, Clone)]
pub struct AnalysisParams {
    pub outlier_window: usize,
    pub z_threshold: f64,
    pub rupture_window: usize,
    pub rupture_topk: usize,
    pub rupture_method: String,
    pub fft_topk: usize,
    pub min_period: f64,
}

impl From<&RunConfig> for AnalysisParams {
    fn from(config: &RunConfig) -> Self {
        Self {
            outlier_window: config.outliers.window,
            z_threshold: config.outliers.z_threshold,
            rupture_window: config.rupture.window,
            rupture_topk: config.rupture.topk,
            rupture_method: config.rupture.method.clone(),
            fft_topk: config.seasonality.fft_topk,
            min_period: config.seasonality.min_period,
        }
    }
}

/// Runs all four analyses over one series and assembles the observation.
pub fn analyze_series(values: &[f64], params: &AnalysisParams) -> Observation {
    Observation {
        stats: describe(values),
        outliers: rolling_outliers(values, params.outlier_window, params.z_threshold),
        ruptures: RuptureSummary {
            method: params.rupture_method.clone(),
            marks: rupture_marks(values, params.rupture_window, params.rupture_topk),
        },
        seasonality: SeasonalitySummary {
            peaks: spectral_peaks(values, params.fft_topk, params.min_period),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_series_assembles_all_sections() {
        let params = AnalysisParams::from(&RunConfig::default());
        let values: Vec<f64> = (0..40).map(|i| (i as f64 * 0.4).sin() * 3.0).collect();
        let obs = analyze_series(&values, &params);

        assert_eq!(obs.stats.count, 40);
        assert_eq!(obs.ruptures.method, "rolling_mean_delta");
        assert!(obs.outliers.observed_count > 0);
        assert!(obs.ruptures.marks.len() <= params.rupture_topk);
    }

    #[test]
    fn test_analyze_series_deterministic() {
        let params = AnalysisParams::from(&RunConfig::default());
        let values: Vec<f64> = (0..64).map(|i| ((i * 7) % 13) as f64).collect();
        let a = analyze_series(&values, &params);
        let b = analyze_series(&values, &params);
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    #[test]
    fn test_all_missing_series() {
        let params = AnalysisParams::from(&RunConfig::default());
        let obs = analyze_series(&[f64::NAN; 10], &params);
        assert_eq!(obs.stats.finite_count, 0);
        assert_eq!(obs.stats.mean, None);
        assert_eq!(obs.outliers.observed_count, 0);
        assert!(obs.ruptures.marks.is_empty());
        assert!(obs.seasonality.peaks.is_empty());
    }
}
