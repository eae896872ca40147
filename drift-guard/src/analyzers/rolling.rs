//! Trailing rolling-window helpers shared by the outlier and rupture
//! detectors.
//!
//! Windows end at the current index and cover exactly `window` consecutive
//! observations. A window is defined only when every value in it is finite;
//! positions before the first full window, or whose window contains a
//! missing value, yield `None`.

/// Rolling mean over trailing windows of exactly `window` observations.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_moments(values, window)
        .into_iter()
        .map(|m| m.map(|(mean, _)| mean))
        .collect()
}

/// Rolling mean and population standard deviation (divisor n) over trailing
/// windows of exactly `window` observations.
pub(crate) fn rolling_moments(values: &[f64], window: usize) -> Vec<Option<(f64, f64)>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window as f64;
        out[i] = Some((mean, var.sqrt()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_trailing() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let means = rolling_mean(&values, 2);
        assert_eq!(means, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_window_larger_than_input() {
        let means = rolling_mean(&[1.0, 2.0], 3);
        assert_eq!(means, vec![None, None]);
    }

    #[test]
    fn test_missing_value_undefines_window() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let means = rolling_mean(&values, 2);
        // Windows touching the NaN at index 1 are undefined.
        assert_eq!(means, vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn test_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let moments = rolling_moments(&values, 8);
        let (mean, std) = moments[7].expect("full window");
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_window_has_zero_std() {
        let moments = rolling_moments(&[3.0; 6], 5);
        let (_, std) = moments[5].expect("full window");
        assert_eq!(std, 0.0);
    }
}
