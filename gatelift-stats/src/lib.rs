#![warn(missing_docs)]
//! Gatelift Statistical Engine
//!
//! Provides the statistical core for A/B test analysis:
//! - Mann-Whitney U rank-sum test with tie handling (non-parametric, suited to
//!   skewed engagement metrics like game rounds)
//! - Bootstrap resampling of retention-rate differences with percentile
//!   confidence intervals and probability-of-improvement
//! - Percentile calculation via linear interpolation

mod bootstrap;
mod mann_whitney;
mod normal;
mod percentiles;

pub use bootstrap::{
    BootstrapError, ConfidenceInterval, RateBootstrap, RateBootstrapConfig,
    bootstrap_rate_difference,
};
pub use mann_whitney::{MannWhitneyError, MannWhitneyResult, mann_whitney_u};
pub use percentiles::{compute_median, compute_percentile, percentile_of_sorted};

/// Default number of bootstrap iterations
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 1000;

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Default two-sided significance threshold
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BOOTSTRAP_ITERATIONS, 1000);
        assert!((DEFAULT_CONFIDENCE_LEVEL - 0.95).abs() < f64::EPSILON);
        assert!((DEFAULT_SIGNIFICANCE_LEVEL - 0.05).abs() < f64::EPSILON);
    }
}
