//! Rolling z-score outlier detection.

use super::rolling::rolling_moments;
use super::types::OutlierSummary;
use crate::config::MIN_OUTLIER_WINDOW;

/// Flags points whose distance from the trailing rolling mean, in units of
/// the rolling population standard deviation, reaches `z_threshold`.
///
/// A position is *observed* when its trailing window of `window` values is
/// fully defined. A rolling standard deviation of zero is treated as "no
/// signal": the position stays observed but can never be an outlier.
/// The density is `outlier_count / observed_count`, or 0.0 when no window
/// was ever defined.
pub fn rolling_outliers(values: &[f64], window: usize, z_threshold: f64) -> OutlierSummary {
    let window = window.max(MIN_OUTLIER_WINDOW);
    let moments = rolling_moments(values, window);

    let mut outlier_count = 0;
    let mut observed_count = 0;
    for (i, moment) in moments.iter().enumerate() {
        let Some((mean, std)) = moment else { continue };
        observed_count += 1;
        if *std > 0.0 && (values[i] - mean).abs() / std >= z_threshold {
            outlier_count += 1;
        }
    }

    let density = if observed_count > 0 {
        outlier_count as f64 / observed_count as f64
    } else {
        0.0
    };

    OutlierSummary {
        outlier_count,
        observed_count,
        density,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_has_no_observations() {
        let summary = rolling_outliers(&[1.0, 2.0, 3.0], 5, 3.0);
        assert_eq!(summary.outlier_count, 0);
        assert_eq!(summary.observed_count, 0);
        assert_eq!(summary.density, 0.0);
    }

    #[test]
    fn test_constant_series_zero_density() {
        // Window std is uniformly zero: observed, but never an outlier.
        let summary = rolling_outliers(&[4.0; 20], 5, 3.0);
        assert_eq!(summary.outlier_count, 0);
        assert_eq!(summary.observed_count, 16);
        assert_eq!(summary.density, 0.0);
    }

    #[test]
    fn test_spike_is_flagged() {
        let mut values = vec![0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 1.0];
        values.push(50.0);
        let summary = rolling_outliers(&values, 5, 3.0);
        assert!(summary.outlier_count >= 1);
        assert!(summary.density > 0.0);
    }

    #[test]
    fn test_density_bounds() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin()).collect();
        let summary = rolling_outliers(&values, 5, 1.0);
        assert!(summary.density >= 0.0 && summary.density <= 1.0);
        assert!(summary.outlier_count <= summary.observed_count);
    }

    #[test]
    fn test_window_clamped_to_minimum() {
        // window 1 would make every point its own mean; clamped to 5.
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let summary = rolling_outliers(&values, 1, 3.0);
        assert_eq!(summary.observed_count, 2);
    }

    #[test]
    fn test_missing_values_shrink_observed_count() {
        let mut values: Vec<f64> = (0..20).map(|i| i as f64).collect();
        values[10] = f64::NAN;
        let full = rolling_outliers(&(0..20).map(|i| i as f64).collect::<Vec<_>>(), 5, 3.0);
        let gapped = rolling_outliers(&values, 5, 3.0);
        assert!(gapped.observed_count < full.observed_count);
    }
}
