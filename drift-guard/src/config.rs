//! Run configuration.
//!
//! A run is driven by a single JSON configuration document, deserialized once
//! into [`RunConfig`] and resolved once at run start via
//! [`RunConfig::validated`]. Analysis routines receive plain parameters and
//! never re-interpret the configuration mapping.

use serde::{Deserialize, Serialize};

/// Minimum rolling window for outlier detection.
pub const MIN_OUTLIER_WINDOW: usize = 5;
/// Minimum rolling window for rupture detection.
pub const MIN_RUPTURE_WINDOW: usize = 2;

/// Resolved per-run configuration.
///
/// Unknown keys in the document are ignored; every recognized field has a
/// default, so an empty document `{}` is a valid configuration.
///
/// # Examples
///
/// ```rust
/// use drift_guard::config::RunConfig;
///
/// let config: RunConfig = serde_json::from_str(r#"{"outliers": {"window": 30}}"#).unwrap();
/// assert_eq!(config.outliers.window, 30);
/// assert_eq!(config.rupture.topk, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Logical series name; defaults to the input file stem.
    pub series_name: Option<String>,
    /// Single value column to analyze (legacy spelling of a one-element
    /// `series_columns` list).
    pub value_col: Option<String>,
    /// Explicit list of columns to analyze. Unset means numeric-column
    /// auto-detection.
    pub series_columns: Option<Vec<String>>,
    /// Optional timestamp column, carried into the cleaned series artifact.
    #[serde(alias = "timestamp_column")]
    pub time_col: Option<String>,
    /// Seed for randomized sub-steps. Echoed into `config_used.json`; the
    /// shipped analyses are all deterministic.
    pub seed: u64,
    /// Rolling z-score outlier parameters.
    pub outliers: OutlierParams,
    /// Rupture (change-point) parameters.
    pub rupture: RuptureParams,
    /// Spectral periodicity parameters.
    pub seasonality: SeasonalityParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            series_name: None,
            value_col: None,
            series_columns: None,
            time_col: None,
            seed: 0,
            outliers: OutlierParams::default(),
            rupture: RuptureParams::default(),
            seasonality: SeasonalityParams::default(),
        }
    }
}

/// Parameters for rolling z-score outlier detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierParams {
    /// Trailing window length; clamped to [`MIN_OUTLIER_WINDOW`].
    pub window: usize,
    /// Z-score threshold at or above which a point is an outlier.
    pub z_threshold: f64,
}

impl Default for OutlierParams {
    fn default() -> Self {
        Self {
            window: 20,
            z_threshold: 3.0,
        }
    }
}

/// Parameters for rupture detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuptureParams {
    /// Trailing window length; clamped to [`MIN_RUPTURE_WINDOW`].
    pub window: usize,
    /// Number of top markers to report.
    pub topk: usize,
    /// Descriptive method label, echoed into observations.
    pub method: String,
}

impl Default for RuptureParams {
    fn default() -> Self {
        Self {
            window: 5,
            topk: 3,
            method: "rolling_mean_delta".to_string(),
        }
    }
}

/// Parameters for spectral periodicity detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityParams {
    /// Number of top amplitude peaks to report.
    pub fft_topk: usize,
    /// Peaks with a period below this are discarded.
    pub min_period: f64,
}

impl Default for SeasonalityParams {
    fn default() -> Self {
        Self {
            fft_topk: 3,
            min_period: 2.0,
        }
    }
}

impl RunConfig {
    /// Resolves the configuration for a run, clamping window parameters to
    /// their minimums. Each clamp is reported as a warning so the run record
    /// shows what was actually used.
    pub fn validated(&self) -> (RunConfig, Vec<String>) {
        let mut resolved = self.clone();
        let mut warnings = Vec::new();

        if resolved.outliers.window < MIN_OUTLIER_WINDOW {
            warnings.push(format!(
                "config_clamped:outliers.window:{}:{}",
                resolved.outliers.window, MIN_OUTLIER_WINDOW
            ));
            resolved.outliers.window = MIN_OUTLIER_WINDOW;
        }
        if resolved.rupture.window < MIN_RUPTURE_WINDOW {
            warnings.push(format!(
                "config_clamped:rupture.window:{}:{}",
                resolved.rupture.window, MIN_RUPTURE_WINDOW
            ));
            resolved.rupture.window = MIN_RUPTURE_WINDOW;
        }

        (resolved, warnings)
    }

    /// The explicit column selection, if one was configured.
    ///
    /// `series_columns` wins over `value_col`; returns `None` when neither
    /// is set, which means numeric-column auto-detection.
    pub fn explicit_columns(&self) -> Option<Vec<String>> {
        if let Some(cols) = &self.series_columns {
            Some(cols.clone())
        } else {
            self.value_col.clone().map(|c| vec![c])
        }
    }
}
