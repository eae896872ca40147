//! Rupture (change-point) detection over a rolling-mean signal.

use super::rolling::rolling_mean;
use super::types::RuptureMark;
use crate::config::MIN_RUPTURE_WINDOW;

/// Selects the `topk` largest absolute first differences of the trailing
/// rolling-mean series.
///
/// Marks are ordered by descending score, ties broken by earlier index.
/// Each mark carries the index immediately following the rolling-mean pair
/// that produced the difference. Inputs shorter than `2 * window` yield an
/// empty list — too short to contain two disjoint windows.
pub fn rupture_marks(values: &[f64], window: usize, topk: usize) -> Vec<RuptureMark> {
    let window = window.max(MIN_RUPTURE_WINDOW);
    if values.len() < 2 * window || topk == 0 {
        return Vec::new();
    }

    let means = rolling_mean(values, window);
    let mut candidates: Vec<RuptureMark> = Vec::new();
    for i in 0..means.len().saturating_sub(1) {
        if let (Some(a), Some(b)) = (means[i], means[i + 1]) {
            candidates.push(RuptureMark {
                index: i + 1,
                score: (b - a).abs(),
            });
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    candidates.truncate(topk);
    candidates
}
