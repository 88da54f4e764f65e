//! Percentile Computation
//!
//! Percentiles via linear interpolation between nearest ranks, used for
//! bootstrap confidence bounds and rounds-played medians. Callers that need
//! several quantiles of the same sample sort once and use
//! [`percentile_of_sorted`] directly.

/// Percentile of an already-sorted sample, interpolating linearly between
/// nearest ranks. Empty input yields 0.0.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let rank = percentile / 100.0 * (sorted.len() - 1) as f64;
            let lower_idx = rank.floor() as usize;
            let upper_idx = (lower_idx + 1).min(sorted.len() - 1);
            let fraction = rank - lower_idx as f64;
            sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
        }
    }
}

/// Percentile of an unsorted sample. Sorts in place; NaNs sort as equal, so
/// inputs are expected to be NaN-free.
pub fn compute_percentile(samples: &mut [f64], percentile: f64) -> f64 {
    samples.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile_of_sorted(samples, percentile)
}

/// Median shorthand
pub fn compute_median(samples: &mut [f64]) -> f64 {
    compute_percentile(samples, 50.0)
}
