//! Human-Readable Output
//!
//! Terminal-friendly rendering of an analysis report: cleaning summary,
//! per-arm tables, bootstrap intervals, and the verdict.

use crate::report::{AnalysisReport, Decision};

/// Format a report for terminal display
pub fn format_human_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Gatelift A/B Test Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let cleaning = &report.cleaning;
    output.push_str(&format!(
        "Cleaning: {} rows loaded, {} removed (rounds > {}), {} analyzed\n\n",
        cleaning.rows_loaded, cleaning.rows_removed, cleaning.rounds_cutoff, cleaning.rows_analyzed
    ));

    output.push_str("Groups\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for group in &report.groups {
        output.push_str(&format!(
            "  {:<8} n={:<7} ret1: {:>6.2}%  ret7: {:>6.2}%  rounds: mean {:.1} / median {:.1}\n",
            group.group.to_string(),
            group.count,
            group.retention_1_rate * 100.0,
            group.retention_7_rate * 100.0,
            group.mean_rounds,
            group.median_rounds,
        ));
    }
    output.push('\n');

    output.push_str("Retention (bootstrap)\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for retention in &report.retention {
        output.push_str(&format!(
            "  {}: {:+.2}pp (test - control)\n",
            retention.window,
            retention.observed_diff * 100.0
        ));
        output.push_str(&format!(
            "      {:.0}% CI: [{:+.2}pp, {:+.2}pp]  P(test better): {:.1}%\n",
            retention.ci_level * 100.0,
            retention.ci_lower * 100.0,
            retention.ci_upper * 100.0,
            retention.probability_test_better * 100.0,
        ));
    }
    output.push('\n');

    let engagement = &report.engagement;
    output.push_str("Engagement (Mann-Whitney U on rounds played)\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  U = {:.1}  p = {:.5}  rank-biserial = {:+.3}\n",
        engagement.u_statistic, engagement.p_value, engagement.rank_biserial
    ));
    output.push_str(&format!(
        "  medians: control {:.1} vs test {:.1} rounds ({})\n\n",
        engagement.control_median_rounds,
        engagement.test_median_rounds,
        if engagement.is_significant {
            "distributions differ significantly"
        } else {
            "no significant difference in play habits"
        }
    ));

    let verdict = &report.verdict;
    let icon = match verdict.decision {
        Decision::TestWins | Decision::ControlWins => "✓",
        Decision::Inconclusive => "≈",
    };
    output.push_str("Verdict\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!("  {} {}\n", icon, verdict.summary));

    output
}
