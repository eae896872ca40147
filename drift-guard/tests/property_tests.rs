//! Property-based tests for the analysis engine.
//!
//! These tests verify invariants that must hold for all inputs:
//! - descriptive statistics stay ordered (min ≤ median ≤ max, and the mean
//!   lies inside the observed range)
//! - rolling outlier density is always a proper fraction
//! - rupture detection never reports marks for inputs shorter than two
//!   windows
//! - a pure sinusoid's period is recovered by the spectral detector

use proptest::prelude::*;

use drift_guard::analyzers::{describe, rolling_outliers, rupture_marks, spectral_peaks};

/// Tolerance for floating-point accumulation in mean/percentile checks.
const TOL: f64 = 1e-9;

fn finite_series(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1e6f64..1e6f64, 1..max_len)
}

fn gappy_series(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            8 => (-1e6f64..1e6f64).prop_map(Some),
            2 => Just(None),
        ],
        0..max_len,
    )
    .prop_map(|values| {
        values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_descriptive_stats_are_ordered(values in finite_series(200)) {
        let stats = describe(&values);
        let min = stats.min.unwrap();
        let max = stats.max.unwrap();
        let median = stats.median.unwrap();
        let mean = stats.mean.unwrap();

        prop_assert!(min <= median + TOL);
        prop_assert!(median <= max + TOL);
        prop_assert!(min - TOL <= mean && mean <= max + TOL);
        prop_assert!(stats.p05.unwrap() <= stats.p95.unwrap() + TOL);
        prop_assert!(stats.std.unwrap() >= 0.0);
    }

    #[test]
    fn prop_counts_partition_with_missing(values in gappy_series(200)) {
        let stats = describe(&values);
        prop_assert_eq!(stats.count, values.len());
        prop_assert_eq!(stats.finite_count + stats.missing_count, values.len());
        if stats.finite_count == 0 {
            prop_assert_eq!(stats.mean, None);
            prop_assert_eq!(stats.median, None);
            prop_assert_eq!(stats.trend_slope, None);
        } else {
            let min = stats.min.unwrap();
            let max = stats.max.unwrap();
            prop_assert!(min <= stats.median.unwrap() + TOL);
            prop_assert!(stats.median.unwrap() <= max + TOL);
        }
    }

    #[test]
    fn prop_outlier_density_is_a_fraction(
        values in gappy_series(300),
        window in 5usize..40,
        z in 0.5f64..6.0,
    ) {
        let summary = rolling_outliers(&values, window, z);
        prop_assert!(summary.density >= 0.0);
        prop_assert!(summary.density <= 1.0);
        prop_assert!(summary.outlier_count <= summary.observed_count);
        prop_assert!(summary.observed_count <= values.len());
    }

    #[test]
    fn prop_constant_series_never_flags_outliers(
        value in -1e6f64..1e6f64,
        len in 5usize..100,
        window in 5usize..20,
    ) {
        // Window std is uniformly zero: "no signal", density exactly 0.
        let values = vec![value; len];
        let summary = rolling_outliers(&values, window, 0.5);
        prop_assert_eq!(summary.outlier_count, 0);
        prop_assert_eq!(summary.density, 0.0);
    }

    #[test]
    fn prop_short_input_yields_no_ruptures(
        values in finite_series(60),
        window in 2usize..32,
    ) {
        if values.len() < 2 * window {
            prop_assert!(rupture_marks(&values, window, 10).is_empty());
        }
    }

    #[test]
    fn prop_rupture_marks_sorted_and_bounded(
        values in finite_series(120),
        window in 2usize..10,
        topk in 1usize..8,
    ) {
        let marks = rupture_marks(&values, window, topk);
        prop_assert!(marks.len() <= topk);
        for pair in marks.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].index < pair[1].index)
            );
        }
        for mark in &marks {
            prop_assert!(mark.index < values.len());
            prop_assert!(mark.score >= 0.0);
        }
    }

    #[test]
    fn prop_sinusoid_period_recovered(period in 4usize..33) {
        // Sampled well above twice the signal frequency, whole cycles.
        let n = period * 8;
        let values: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period as f64).sin())
            .collect();
        let peaks = spectral_peaks(&values, 1, 2.0);
        prop_assert!(!peaks.is_empty());
        prop_assert!(
            (peaks[0].period - period as f64).abs() <= 1.0,
            "recovered period {} for true period {}",
            peaks[0].period,
            period
        );
    }

    #[test]
    fn prop_step_change_localized(
        base in -100.0f64..100.0,
        magnitude in 1.0f64..1000.0,
        step_at in 10usize..40,
        window in 2usize..6,
    ) {
        let len = 60;
        let mut values = vec![base; len];
        for v in values.iter_mut().skip(step_at) {
            *v = base + magnitude;
        }
        let marks = rupture_marks(&values, window, 1);
        prop_assert_eq!(marks.len(), 1);
        let idx = marks[0].index;
        prop_assert!(
            idx >= step_at && idx <= step_at + window,
            "top mark {} outside window-width neighborhood of step {}",
            idx,
            step_at
        );
    }
}
