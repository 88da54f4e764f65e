#![warn(missing_docs)]
//! Gatelift Core
//!
//! Domain model and pipeline stages for A/B test log analysis:
//! - CSV loader with header aliases matching the Cookie Cats dataset
//! - Outlier cleaner (rounds-played cutoff)
//! - Per-group aggregation into retention summaries

mod aggregate;
mod cleaner;
mod dataset;
mod loader;

pub use aggregate::{AggregateError, GroupSummary, summarize_groups};
pub use cleaner::{CleanOutcome, remove_outliers};
pub use dataset::{Dataset, Group, Observation};
pub use loader::{LoadError, read_csv, read_csv_path};

/// Default rounds-played cutoff above which a row is treated as a bot or
/// logging artifact and removed
pub const DEFAULT_ROUNDS_CUTOFF: u32 = 3000;
