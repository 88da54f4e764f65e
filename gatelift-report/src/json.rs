//! JSON Output

use crate::report::AnalysisReport;

/// Generate a prettified JSON report.
///
/// This is the payload the dashboard consumes.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
