//! Mann-Whitney U Test
//!
//! Two-sided non-parametric rank-sum test for whether two independent samples
//! come from the same distribution. Ties receive average ranks; the p-value
//! uses the normal approximation with tie correction and continuity
//! correction, which is accurate for the sample sizes this crate targets.

use crate::normal::normal_cdf;
use thiserror::Error;

/// Result of a Mann-Whitney U test
#[derive(Debug, Clone)]
pub struct MannWhitneyResult {
    /// U statistic for the first sample
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Size of the first sample
    pub n1: usize,
    /// Size of the second sample
    pub n2: usize,
    /// Rank-biserial correlation: 1 - 2U/(n1*n2), in [-1, 1].
    /// Positive means the first sample tends to rank lower.
    pub rank_biserial: f64,
}

impl MannWhitneyResult {
    /// Whether the null hypothesis (same distribution) is rejected at `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Errors from the rank-sum test
#[derive(Debug, Clone, Error)]
pub enum MannWhitneyError {
    /// The first sample contains no values
    #[error("first sample is empty")]
    EmptyFirstSample,
    /// The second sample contains no values
    #[error("second sample is empty")]
    EmptySecondSample,
    /// A sample contains a NaN, which has no rank
    #[error("samples contain NaN values")]
    NanInSamples,
}

/// Run the two-sided Mann-Whitney U test on two independent samples.
///
/// Returns the U statistic of `first` along with the two-sided p-value.
/// Swapping the samples yields U' = n1*n2 - U with an identical p-value.
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<MannWhitneyResult, MannWhitneyError> {
    if first.is_empty() {
        return Err(MannWhitneyError::EmptyFirstSample);
    }
    if second.is_empty() {
        return Err(MannWhitneyError::EmptySecondSample);
    }
    if first.iter().chain(second.iter()).any(|v| v.is_nan()) {
        return Err(MannWhitneyError::NanInSamples);
    }

    let n1 = first.len();
    let n2 = second.len();
    let n = n1 + n2;

    // Pool and sort, remembering which sample each value came from.
    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // Assign average ranks to runs of tied values and accumulate the tie
    // correction term sum(t^3 - t) over tie groups.
    let mut rank_sum_first = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        let run = j - i;
        // Ranks are 1-based; a run spanning positions i..j averages to this.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for entry in &pooled[i..j] {
            if entry.1 {
                rank_sum_first += avg_rank;
            }
        }
        if run > 1 {
            let t = run as f64;
            tie_term += t * t * t - t;
        }
        i = j;
    }

    let u = rank_sum_first - (n1 * (n1 + 1)) as f64 / 2.0;
    let product = (n1 * n2) as f64;
    let rank_biserial = 1.0 - 2.0 * u / product;

    // Normal approximation with tie correction.
    let mean_u = product / 2.0;
    let n_f = n as f64;
    let variance = product / 12.0 * ((n_f + 1.0) - tie_term / (n_f * (n_f - 1.0)));

    let p_value = if variance <= 0.0 {
        // Every pooled value identical: no evidence of any difference.
        1.0
    } else {
        let delta = u - mean_u;
        // Continuity correction pulls |z| toward zero by half a rank unit.
        let corrected = delta.abs() - 0.5;
        let z = corrected.max(0.0) / variance.sqrt();
        (2.0 * (1.0 - normal_cdf(z))).min(1.0)
    };

    Ok(MannWhitneyResult {
        u_statistic: u,
        p_value,
        n1,
        n2,
        rank_biserial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disjoint_samples() {
        // All of `first` ranks below all of `second`: U = 0.
        let first = vec![1.0, 2.0, 3.0];
        let second = vec![4.0, 5.0, 6.0];

        let result = mann_whitney_u(&first, &second).unwrap();

        assert!((result.u_statistic - 0.0).abs() < f64::EPSILON);
        // Normal approximation with continuity correction gives p ~ 0.08 here.
        assert!(result.p_value > 0.05 && result.p_value < 0.15);
        assert!((result.rank_biserial - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tied_values_average_ranks() {
        let first = vec![1.0, 2.0, 2.0, 3.0];
        let second = vec![2.0, 3.0, 3.0, 4.0];

        let result = mann_whitney_u(&first, &second).unwrap();

        // Rank sum of first = 1 + 3 + 3 + 6 = 13, so U = 13 - 10 = 3.
        assert!((result.u_statistic - 3.0).abs() < f64::EPSILON);
        assert!(result.p_value > 0.1 && result.p_value < 0.25);
    }

    #[test]
    fn test_symmetry_under_swap() {
        let first = vec![12.0, 7.0, 3.0, 55.0, 0.0, 1.0, 2.0];
        let second = vec![9.0, 14.0, 6.0, 6.0, 20.0];

        let forward = mann_whitney_u(&first, &second).unwrap();
        let reverse = mann_whitney_u(&second, &first).unwrap();

        let product = (first.len() * second.len()) as f64;
        assert!((forward.u_statistic + reverse.u_statistic - product).abs() < 1e-9);
        assert!((forward.p_value - reverse.p_value).abs() < 1e-9);
    }

    #[test]
    fn test_identical_samples_not_significant() {
        let sample = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

        let result = mann_whitney_u(&sample, &sample).unwrap();

        // U should sit at its mean n1*n2/2 and p should be near 1.
        assert!((result.u_statistic - 32.0).abs() < f64::EPSILON);
        assert!(result.p_value > 0.9);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_all_values_tied() {
        let first = vec![7.0; 10];
        let second = vec![7.0; 10];

        let result = mann_whitney_u(&first, &second).unwrap();

        assert!((result.p_value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear_separation_significant() {
        let first: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let second: Vec<f64> = (0..50).map(|i| (i + 100) as f64).collect();

        let result = mann_whitney_u(&first, &second).unwrap();

        assert!(result.p_value < 0.001);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_empty_samples() {
        assert!(matches!(
            mann_whitney_u(&[], &[1.0]),
            Err(MannWhitneyError::EmptyFirstSample)
        ));
        assert!(matches!(
            mann_whitney_u(&[1.0], &[]),
            Err(MannWhitneyError::EmptySecondSample)
        ));
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            mann_whitney_u(&[1.0, f64::NAN], &[2.0]),
            Err(MannWhitneyError::NanInSamples)
        ));
    }
}
