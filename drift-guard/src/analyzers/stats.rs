//! Descriptive statistics for a numeric series.
//!
//! Missing values are represented as NaN. Every statistic is computed over
//! the finite subset only; when that subset is empty the whole record is
//! reported as undefined (`None`) rather than as any computed number.

use super::types::SeriesStats;

/// Computes descriptive statistics for one series.
///
/// # Semantics
///
/// - `count` is the total length, `finite_count` the number of finite
///   values, `missing_count` the number of NaN markers.
/// - `std` is the sample standard deviation (divisor `finite_count - 1`),
///   reported as 0.0 when only one finite value exists.
/// - `p05`/`median`/`p95` use linear interpolation between order statistics.
/// - `trend_slope` is the least-squares slope of value against row
///   position, over finite points at their original positions; undefined
///   with fewer than two finite points or zero position variance.
pub fn describe(values: &[f64]) -> SeriesStats {
    let count = values.len();
    let finite_count = values.iter().filter(|v| v.is_finite()).count();
    let missing_count = values.iter().filter(|v| v.is_nan()).count();

    if finite_count == 0 {
        return SeriesStats {
            count,
            finite_count,
            missing_count,
            mean: None,
            std: None,
            min: None,
            max: None,
            median: None,
            p05: None,
            p95: None,
            trend_slope: None,
        };
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let std = if finite.len() > 1 {
        let ss = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    let mut sorted = finite.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    SeriesStats {
        count,
        finite_count,
        missing_count,
        mean: Some(mean),
        std: Some(std),
        min: Some(sorted[0]),
        max: Some(sorted[sorted.len() - 1]),
        median: Some(percentile(&sorted, 0.5)),
        p05: Some(percentile(&sorted, 0.05)),
        p95: Some(percentile(&sorted, 0.95)),
        trend_slope: trend_slope(values),
    }
}

/// Linear-interpolation percentile over an already sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let m = sorted.len();
    if m == 1 {
        return sorted[0];
    }
    let h = q * (m - 1) as f64;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 >= m {
        sorted[m - 1]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Ordinary-least-squares slope of value against row position.
///
/// Only finite points participate, at their original positions. Returns
/// `None` with fewer than two finite points or zero position variance.
pub fn trend_slope(values: &[f64]) -> Option<f64> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect();
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let denom = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum::<f64>();
    if denom == 0.0 {
        return None;
    }
    let num = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum::<f64>();
    Some(num / denom)
}
