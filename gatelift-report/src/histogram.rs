//! Histogram Binning
//!
//! Fixed-width binning of the bootstrap distribution. The dashboard plots the
//! bins client-side, so the report carries counts rather than raw samples
//! twice.

use serde::{Deserialize, Serialize};

/// Binned distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Bins in ascending order, contiguous
    pub bins: Vec<HistogramBin>,
    /// Total number of samples binned
    pub total: usize,
}

/// One histogram bin; samples satisfy `lower <= x < upper` (the last bin is
/// closed on both ends)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: f64,
    /// Upper edge
    pub upper: f64,
    /// Samples in the bin
    pub count: usize,
}

/// Bin samples into `bin_count` equal-width bins spanning their range.
/// Degenerate input (empty, or all values equal) collapses to a single bin.
pub fn build_histogram(samples: &[f64], bin_count: usize) -> Histogram {
    if samples.is_empty() {
        return Histogram {
            bins: Vec::new(),
            total: 0,
        };
    }

    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min == max || bin_count == 0 {
        return Histogram {
            bins: vec![HistogramBin {
                lower: min,
                upper: max,
                count: samples.len(),
            }],
            total: samples.len(),
        };
    }

    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];
    for &sample in samples {
        let idx = (((sample - min) / width) as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect();

    Histogram {
        bins,
        total: samples.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_total() {
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64).sin()).collect();
        let hist = build_histogram(&samples, 20);

        assert_eq!(hist.bins.len(), 20);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 1000);
        assert_eq!(hist.total, 1000);
    }

    #[test]
    fn test_bins_are_contiguous() {
        let samples: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let hist = build_histogram(&samples, 10);

        for pair in hist.bins.windows(2) {
            assert!((pair[0].upper - pair[1].lower).abs() < 1e-9);
        }
        assert!((hist.bins[0].lower - 0.0).abs() < 1e-9);
        assert!((hist.bins[9].upper - 9.9).abs() < 1e-9);
    }

    #[test]
    fn test_max_value_lands_in_last_bin() {
        let samples = vec![0.0, 0.5, 1.0];
        let hist = build_histogram(&samples, 2);

        assert_eq!(hist.bins[1].count, 2); // 0.5 and 1.0
    }

    #[test]
    fn test_identical_values_single_bin() {
        let samples = vec![0.25; 50];
        let hist = build_histogram(&samples, 20);

        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 50);
    }

    #[test]
    fn test_empty_samples() {
        let hist = build_histogram(&[], 20);
        assert!(hist.bins.is_empty());
        assert_eq!(hist.total, 0);
    }
}
