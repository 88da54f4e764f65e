//! Group Aggregation
//!
//! Collapses the cleaned dataset into one summary per experiment arm:
//! sample size, retention rates, and the rounds-played distribution's central
//! tendency. Summaries are derived fresh on every analysis and never cached.

use crate::dataset::{Dataset, Group};
use gatelift_stats::compute_median;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-group summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Which experiment arm this summarizes
    pub group: Group,
    /// Number of rows with this group label after cleaning
    pub count: usize,
    /// Fraction of players retained at day 1, in [0, 1]
    pub retention_1_rate: f64,
    /// Fraction of players retained at day 7, in [0, 1]
    pub retention_7_rate: f64,
    /// Mean rounds played
    pub mean_rounds: f64,
    /// Median rounds played
    pub median_rounds: f64,
}

/// Errors from aggregation
#[derive(Debug, Clone, Error)]
pub enum AggregateError {
    /// A group has no rows left after cleaning, so its rates are undefined
    #[error("{0} group has no observations after cleaning")]
    EmptyGroup(Group),
}

/// Summarize both experiment arms. Output order is control, then test.
pub fn summarize_groups(dataset: &Dataset) -> Result<Vec<GroupSummary>, AggregateError> {
    [Group::Control, Group::Test]
        .into_iter()
        .map(|group| summarize_one(dataset, group))
        .collect()
}

fn summarize_one(dataset: &Dataset, group: Group) -> Result<GroupSummary, AggregateError> {
    let mut rounds = dataset.rounds_played(group);
    let count = rounds.len();
    if count == 0 {
        return Err(AggregateError::EmptyGroup(group));
    }

    let retention_1_rate = rate(&dataset.retention_1(group));
    let retention_7_rate = rate(&dataset.retention_7(group));
    let mean_rounds = rounds.iter().sum::<f64>() / count as f64;
    let median_rounds = compute_median(&mut rounds);

    Ok(GroupSummary {
        group,
        count,
        retention_1_rate,
        retention_7_rate,
        mean_rounds,
        median_rounds,
    })
}

fn rate(flags: &[bool]) -> f64 {
    flags.iter().filter(|&&f| f).count() as f64 / flags.len() as f64
}
