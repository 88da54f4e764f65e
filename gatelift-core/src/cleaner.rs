//! Outlier Cleaner
//!
//! Removes rows whose rounds-played count exceeds a cutoff. Players logging
//! tens of thousands of rounds in a week are bots or logging artifacts, and a
//! handful of them dominate any mean-based engagement comparison.

use crate::dataset::Dataset;

/// Result of the cleaning pass
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Rows that survived the cutoff, schema unchanged
    pub dataset: Dataset,
    /// How many rows were removed
    pub removed: usize,
    /// The cutoff that was applied
    pub cutoff: u32,
}

/// Remove rows with `rounds_played` above `cutoff`. Retained rows satisfy
/// `rounds_played <= cutoff`.
pub fn remove_outliers(dataset: &Dataset, cutoff: u32) -> CleanOutcome {
    let before = dataset.len();
    let kept: Vec<_> = dataset
        .observations()
        .iter()
        .filter(|o| o.rounds_played <= cutoff)
        .cloned()
        .collect();
    let removed = before - kept.len();

    CleanOutcome {
        dataset: Dataset::new(kept),
        removed,
        cutoff,
    }
}
