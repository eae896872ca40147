//! Spectral periodicity detection.
//!
//! The detector drops missing values, mean-centers the remainder, and takes
//! the discrete Fourier amplitude spectrum over non-negative frequencies.
//! The DC component is zeroed before peak selection so a constant offset
//! never masquerades as a period.

use rustfft::{num_complex::Complex, FftPlanner};

use super::types::SeasonalityPeak;

/// Minimum number of finite samples for a meaningful spectrum.
const MIN_SAMPLES: usize = 8;

/// Selects the `topk` largest-amplitude spectrum bins and reports them as
/// (frequency, period, amplitude) peaks, highest amplitude first.
///
/// Selection happens before filtering: of the `topk` selected bins, any
/// with non-positive frequency or with period below `min_period` is
/// discarded, so the result may hold fewer than `topk` peaks. Fewer than
/// eight finite samples yield an empty list.
pub fn spectral_peaks(values: &[f64], topk: usize, min_period: f64) -> Vec<SeasonalityPeak> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < MIN_SAMPLES || topk == 0 {
        return Vec::new();
    }

    let mean = finite.iter().sum::<f64>() / n as f64;
    let mut buffer: Vec<Complex<f64>> = finite
        .iter()
        .map(|&v| Complex::new(v - mean, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    // Non-negative frequencies only: bins 0..=n/2, frequency k/n.
    let half = n / 2;
    let mut amplitudes: Vec<f64> = buffer[..=half].iter().map(|c| c.norm()).collect();
    amplitudes[0] = 0.0;

    let mut order: Vec<usize> = (0..amplitudes.len()).collect();
    order.sort_by(|&a, &b| amplitudes[b].total_cmp(&amplitudes[a]).then(a.cmp(&b)));

    order
        .into_iter()
        .take(topk)
        .filter_map(|k| {
            let frequency = k as f64 / n as f64;
            if frequency <= 0.0 {
                return None;
            }
            let period = 1.0 / frequency;
            if period < min_period {
                return None;
            }
            Some(SeasonalityPeak {
                frequency,
                period,
                amplitude: amplitudes[k],
            })
        })
        .collect()
}
