#![warn(missing_docs)]
//! Gatelift Report - Analysis Results and Output Formats
//!
//! Serializable report structures for one analysis run, plus:
//! - JSON (machine-readable, consumed by the dashboard)
//! - Human-readable terminal text
//! - Histogram binning of the bootstrap distribution for plotting

mod histogram;
mod human;
mod json;
mod report;

pub use histogram::{Histogram, HistogramBin, build_histogram};
pub use human::format_human_report;
pub use json::generate_json_report;
pub use report::{
    AnalysisReport, CleaningSummary, Decision, EngagementAnalysis, ReportConfig, ReportMeta,
    RetentionAnalysis, RetentionWindow, Verdict,
};

/// Version of the report JSON schema
pub const SCHEMA_VERSION: u32 = 1;
