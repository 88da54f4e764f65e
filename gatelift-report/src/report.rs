//! Report Data Structures

use crate::histogram::Histogram;
use chrono::{DateTime, Utc};
use gatelift_core::GroupSummary;
use serde::{Deserialize, Serialize};

/// Complete analysis report for one uploaded dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// What the cleaner removed
    pub cleaning: CleaningSummary,
    /// Per-arm summaries, control first
    pub groups: Vec<GroupSummary>,
    /// One bootstrap analysis per retention window
    pub retention: Vec<RetentionAnalysis>,
    /// Mann-Whitney comparison of rounds played
    pub engagement: EngagementAnalysis,
    /// Overall recommendation
    pub verdict: Verdict,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// JSON schema version
    pub schema_version: u32,
    /// Crate version that produced the report
    pub version: String,
    /// When the analysis ran
    pub timestamp: DateTime<Utc>,
    /// Effective configuration for this run
    pub config: ReportConfig,
}

/// The configuration an analysis actually ran with, echoed into the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rounds-played outlier cutoff
    pub rounds_cutoff: u32,
    /// Bootstrap iteration count
    pub bootstrap_iterations: usize,
    /// Confidence level for bootstrap intervals
    pub confidence_level: f64,
    /// Two-sided significance threshold for the rank-sum test
    pub significance_level: f64,
    /// RNG seed, if the run was seeded
    pub seed: Option<u64>,
}

/// Cleaning stage summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Rows in the uploaded file
    pub rows_loaded: usize,
    /// Rows removed as outliers
    pub rows_removed: usize,
    /// Rows analyzed
    pub rows_analyzed: usize,
    /// The cutoff applied
    pub rounds_cutoff: u32,
}

/// Which retention window an analysis covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionWindow {
    /// Returned 1 day after install
    Day1,
    /// Returned 7 days after install
    Day7,
}

impl std::fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionWindow::Day1 => write!(f, "1-day retention"),
            RetentionWindow::Day7 => write!(f, "7-day retention"),
        }
    }
}

/// Bootstrap analysis of one retention window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionAnalysis {
    /// Retention window
    pub window: RetentionWindow,
    /// Control arm retention rate
    pub control_rate: f64,
    /// Test arm retention rate
    pub test_rate: f64,
    /// Observed difference (test - control)
    pub observed_diff: f64,
    /// Lower bound of the bootstrap percentile interval
    pub ci_lower: f64,
    /// Upper bound of the bootstrap percentile interval
    pub ci_upper: f64,
    /// Confidence level of the interval
    pub ci_level: f64,
    /// Fraction of bootstrap resamples favoring the test arm
    pub probability_test_better: f64,
    /// Binned bootstrap distribution for the dashboard plot
    pub histogram: Histogram,
}

/// Mann-Whitney comparison of rounds played between arms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementAnalysis {
    /// U statistic for the test arm
    pub u_statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Rank-biserial correlation effect size
    pub rank_biserial: f64,
    /// Null rejected at the configured significance level
    pub is_significant: bool,
    /// Control arm median rounds
    pub control_median_rounds: f64,
    /// Test arm median rounds
    pub test_median_rounds: f64,
    /// Control arm rounds-played distribution, binned over log10(rounds + 1)
    pub control_rounds_histogram: Histogram,
    /// Test arm rounds-played distribution, binned over log10(rounds + 1)
    pub test_rounds_histogram: Histogram,
}

/// Overall recommendation derived from the primary retention metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Which arm, if any, the evidence favors
    pub decision: Decision,
    /// Probability the test arm is better on the primary metric
    pub probability_test_better: f64,
    /// Retention window the decision is based on
    pub primary_window: RetentionWindow,
    /// Whether play behavior differs significantly between arms
    pub engagement_differs: bool,
    /// Significance threshold the verdict was stated at
    pub significance_level: f64,
    /// One-line human-readable summary
    pub summary: String,
}

/// Verdict outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The test arm is the statistically credible winner
    TestWins,
    /// The control arm is the statistically credible winner
    ControlWins,
    /// No credible difference detected
    Inconclusive,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::TestWins => write!(f, "test wins"),
            Decision::ControlWins => write!(f, "control wins"),
            Decision::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_display() {
        assert_eq!(RetentionWindow::Day1.to_string(), "1-day retention");
        assert_eq!(RetentionWindow::Day7.to_string(), "7-day retention");
    }

    #[test]
    fn test_window_serde_tag() {
        let json = serde_json::to_string(&RetentionWindow::Day7).unwrap();
        assert_eq!(json, "\"day7\"");
    }

    #[test]
    fn test_decision_round_trip() {
        for decision in [
            Decision::TestWins,
            Decision::ControlWins,
            Decision::Inconclusive,
        ] {
            let json = serde_json::to_string(&decision).unwrap();
            let back: Decision = serde_json::from_str(&json).unwrap();
            assert_eq!(decision, back);
        }
    }
}
