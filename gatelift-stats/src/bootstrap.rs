//! Bootstrap Resampling of Retention-Rate Differences
//!
//! Builds an empirical sampling distribution of the difference in retention
//! rate between a test and a control group by resampling each group's
//! retention indicators with replacement. Percentile quantiles of that
//! distribution approximate a confidence interval; the fraction of resampled
//! differences above zero serves as an informal probability of improvement.

use crate::percentiles::percentile_of_sorted;
use crate::{DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CONFIDENCE_LEVEL};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, thread_rng};
use rayon::prelude::*;
use thiserror::Error;

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct RateBootstrapConfig {
    /// Number of bootstrap iterations (default: 1000)
    pub iterations: usize,
    /// Confidence level (default: 0.95 for 95% CI)
    pub confidence_level: f64,
    /// Use the parallel resampling path. Ignored when `seed` is set, since
    /// seeded runs must be reproducible.
    pub parallel: bool,
    /// Fixed RNG seed for deterministic runs
    pub seed: Option<u64>,
}

impl Default for RateBootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            parallel: false,
            seed: None,
        }
    }
}

/// Confidence interval bounds
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Confidence level the bounds were computed at
    pub level: f64,
}

/// Result of a rate-difference bootstrap
#[derive(Debug, Clone)]
pub struct RateBootstrap {
    /// Observed rate difference (test - control) in the original data
    pub observed_diff: f64,
    /// Resampled differences, in generation order; length equals the
    /// configured iteration count
    pub diffs: Vec<f64>,
    /// Percentile confidence interval over the resampled differences
    pub confidence_interval: ConfidenceInterval,
    /// Fraction of resampled differences favoring the test group (> 0)
    pub probability_improvement: f64,
}

/// Errors that can occur during bootstrap
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The control group has no retention indicators
    #[error("control group is empty")]
    EmptyControl,
    /// The test group has no retention indicators
    #[error("test group is empty")]
    EmptyTest,
    /// Confidence level outside (0, 1)
    #[error("invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),
    /// Iteration count of zero produces no distribution
    #[error("bootstrap iterations must be at least 1")]
    ZeroIterations,
}

/// Bootstrap the distribution of the retention-rate difference between two
/// groups of boolean retention indicators.
pub fn bootstrap_rate_difference(
    control: &[bool],
    test: &[bool],
    config: &RateBootstrapConfig,
) -> Result<RateBootstrap, BootstrapError> {
    if control.is_empty() {
        return Err(BootstrapError::EmptyControl);
    }
    if test.is_empty() {
        return Err(BootstrapError::EmptyTest);
    }
    if config.confidence_level <= 0.0 || config.confidence_level >= 1.0 {
        return Err(BootstrapError::InvalidConfidenceLevel(
            config.confidence_level,
        ));
    }
    if config.iterations == 0 {
        return Err(BootstrapError::ZeroIterations);
    }

    let observed_diff = rate(test) - rate(control);

    let diffs = match config.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            resample_serial(control, test, config.iterations, &mut rng)
        }
        None if config.parallel => resample_parallel(control, test, config.iterations),
        None => {
            let mut rng = thread_rng();
            resample_serial(control, test, config.iterations, &mut rng)
        }
    };

    let confidence_interval = percentile_interval(&diffs, config.confidence_level);
    let improvements = diffs.iter().filter(|&&d| d > 0.0).count();
    let probability_improvement = improvements as f64 / diffs.len() as f64;

    Ok(RateBootstrap {
        observed_diff,
        diffs,
        confidence_interval,
        probability_improvement,
    })
}

/// Proportion of true indicators
fn rate(flags: &[bool]) -> f64 {
    flags.iter().filter(|&&f| f).count() as f64 / flags.len() as f64
}

/// One resampled rate: draw `flags.len()` indicators with replacement
fn resample_rate<R: Rng>(flags: &[bool], rng: &mut R) -> f64 {
    let n = flags.len();
    let mut retained = 0usize;
    for _ in 0..n {
        if flags[rng.gen_range(0..n)] {
            retained += 1;
        }
    }
    retained as f64 / n as f64
}

fn resample_serial<R: Rng>(
    control: &[bool],
    test: &[bool],
    iterations: usize,
    rng: &mut R,
) -> Vec<f64> {
    (0..iterations)
        .map(|_| resample_rate(test, rng) - resample_rate(control, rng))
        .collect()
}

fn resample_parallel(control: &[bool], test: &[bool], iterations: usize) -> Vec<f64> {
    (0..iterations)
        .into_par_iter()
        .map_init(thread_rng, |rng, _| {
            resample_rate(test, rng) - resample_rate(control, rng)
        })
        .collect()
}

/// Standard percentile interval over the bootstrap distribution
fn percentile_interval(diffs: &[f64], confidence: f64) -> ConfidenceInterval {
    let mut sorted = diffs.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let alpha = (1.0 - confidence) / 2.0;

    ConfidenceInterval {
        lower: percentile_of_sorted(&sorted, alpha * 100.0),
        upper: percentile_of_sorted(&sorted, (1.0 - alpha) * 100.0),
        level: confidence,
    }
}
