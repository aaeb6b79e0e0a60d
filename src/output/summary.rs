use std::fmt::Write;
use std::path::Path;

use crate::backport::BackportAuditSummary;
use crate::flake::aggregate::{calculate_rate, sorted_failing};
use crate::flake::FlakeStats;

use super::styling::{bright, bright_green, bright_red, bright_yellow, cyan, dim};
use super::tables::{color_coded_failure_cell, create_cyan_header, create_table};

/// Prints the backport audit counts and where the report landed.
pub fn print_backport_summary(summary: &BackportAuditSummary, report_path: &Path) {
    println!("{}", render_backport_summary(summary, report_path));
}

fn render_backport_summary(summary: &BackportAuditSummary, report_path: &Path) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "🔁", "Backport Audit");

    let missing_display = if summary.missing.is_empty() {
        bright_green("0".to_string())
    } else {
        bright_red(summary.missing.len())
    };

    let _ = write!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n",
        dim("Pull requests fetched:"),
        bright_yellow(summary.total_fetched),
        dim("Needing validation:"),
        bright_yellow(summary.needing_validation),
        dim("Missing backports:"),
        missing_display,
    );

    if summary.missing.is_empty() {
        let _ = writeln!(
            output,
            "\n{}",
            bright_green("Every backport label has a matching pull request.")
        );
    } else {
        let _ = writeln!(
            output,
            "  {} {}",
            dim("Report:"),
            cyan(report_path.display())
        );
    }

    output
}

/// Prints a human-readable summary of CI failure statistics to stdout.
///
/// Displays color-coded tables showing the run outcome distribution, the
/// workflows and jobs sorted by failure count, and the failed-jobs ratio
/// within failed runs. Zero-failure groups are left out of the tables.
pub fn print_flake_summary(stats: &FlakeStats) {
    println!("{}", render_flake_summary(stats));
}

#[allow(clippy::format_push_string)]
fn render_flake_summary(stats: &FlakeStats) -> String {
    let mut output = String::new();

    // Overview section
    add_section_header(&mut output, "📊", "Overview");
    output.push_str(&format!(
        "  {} {}\n  {} {}\n  {} {}\n\n",
        dim("Repository:"),
        cyan(&stats.repository),
        dim("Workflow runs analyzed:"),
        bright_yellow(stats.runs_analyzed),
        dim("Analysis date:"),
        dim(stats.collected_at.format("%Y-%m-%d %H:%M UTC"))
    ));

    if stats.runs_analyzed == 0 {
        output.push_str(&format!("{}\n", bright_yellow("No workflow runs found.")));
        return output;
    }

    // Outcome distribution
    add_section_header(&mut output, "🧮", "Run Outcomes");

    let mut outcome_table = create_table();
    outcome_table.set_header(create_cyan_header(&["Outcome", "Count", "Share"]));
    let outcomes = [
        ("success", stats.outcomes.success),
        ("failure", stats.outcomes.failure),
        ("skipped", stats.outcomes.skipped),
        ("in progress", stats.outcomes.in_progress),
        ("other", stats.outcomes.other),
    ];
    for (label, count) in outcomes {
        let share = calculate_rate(count, stats.outcomes.total);
        outcome_table.add_row(vec![
            label.to_string(),
            count.to_string(),
            format!("{share:.2}%"),
        ]);
    }
    let _ = writeln!(output, "{outcome_table}\n");

    // Failing workflows
    add_section_header(&mut output, "🚨", "Failing Workflows");
    let failing_workflows = sorted_failing(&stats.workflow_failures);
    if failing_workflows.is_empty() {
        output.push_str(&format!("  {}\n\n", bright_green("No failing workflows.")));
    } else {
        let mut workflow_table = create_table();
        workflow_table.set_header(create_cyan_header(&[
            "Workflow",
            "Failures",
            "Total",
            "Failure rate",
        ]));
        for (name, bucket) in &failing_workflows {
            workflow_table.add_row(vec![
                comfy_table::Cell::new(name),
                comfy_table::Cell::new(bucket.failures),
                comfy_table::Cell::new(bucket.total),
                color_coded_failure_cell(calculate_rate(bucket.failures, bucket.total)),
            ]);
        }
        let _ = writeln!(output, "{workflow_table}\n");
    }

    // Failing jobs, normalized names
    add_section_header(&mut output, "🔧", "Failing Jobs");
    let failing_jobs = sorted_failing(&stats.job_failures);
    if failing_jobs.is_empty() {
        output.push_str(&format!("  {}\n\n", bright_green("No failing jobs.")));
    } else {
        let mut job_table = create_table();
        job_table.set_header(create_cyan_header(&[
            "Job",
            "Failures",
            "Total",
            "Failure rate",
        ]));
        for (name, bucket) in &failing_jobs {
            job_table.add_row(vec![
                comfy_table::Cell::new(name),
                comfy_table::Cell::new(bucket.failures),
                comfy_table::Cell::new(bucket.total),
                color_coded_failure_cell(calculate_rate(bucket.failures, bucket.total)),
            ]);
        }
        let _ = writeln!(output, "{job_table}\n");
    }

    // Jobs inside failed runs
    let ratio = calculate_rate(stats.failed_run_jobs_failed, stats.failed_run_jobs_total);
    let _ = writeln!(
        output,
        "  {} {} of {} ({})",
        dim("Failed jobs within failed runs:"),
        bright_yellow(stats.failed_run_jobs_failed),
        bright_yellow(stats.failed_run_jobs_total),
        bright_red(format!("{ratio:.2}%"))
    );

    output
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flake::aggregate::{FailureBucket, OutcomeDistribution};
    use chrono::Utc;
    use indexmap::IndexMap;

    fn create_stats() -> FlakeStats {
        let mut workflow_failures = IndexMap::new();
        workflow_failures.insert(
            "Build and test".to_string(),
            FailureBucket {
                total: 10,
                failures: 4,
            },
        );
        workflow_failures.insert(
            "Lint".to_string(),
            FailureBucket {
                total: 10,
                failures: 0,
            },
        );

        let mut job_failures = IndexMap::new();
        job_failures.insert(
            "Backwards compatibility tests on all versions".to_string(),
            FailureBucket {
                total: 8,
                failures: 3,
            },
        );

        FlakeStats {
            repository: "acme/widgets".to_string(),
            collected_at: Utc::now(),
            runs_analyzed: 20,
            outcomes: OutcomeDistribution {
                total: 20,
                success: 14,
                failure: 4,
                skipped: 1,
                in_progress: 1,
                other: 0,
            },
            workflow_failures,
            job_failures,
            failed_run_jobs_total: 16,
            failed_run_jobs_failed: 5,
        }
    }

    #[test]
    fn summary_includes_failing_groups_and_ratio() {
        let rendered = render_flake_summary(&create_stats());

        assert!(rendered.contains("acme/widgets"));
        assert!(rendered.contains("Build and test"));
        assert!(rendered.contains("Backwards compatibility tests on all versions"));
        assert!(rendered.contains("31.25%"), "5/16 must render as 31.25%");
    }

    #[test]
    fn summary_omits_zero_failure_groups() {
        let rendered = render_flake_summary(&create_stats());
        let jobs_section = rendered
            .split("Failing Workflows")
            .nth(1)
            .expect("summary must have a failing workflows section");

        assert!(
            !jobs_section.contains("Lint"),
            "Zero-failure workflows must not be listed"
        );
    }

    #[test]
    fn empty_run_set_renders_without_panicking() {
        let stats = FlakeStats {
            repository: "acme/widgets".to_string(),
            collected_at: Utc::now(),
            runs_analyzed: 0,
            outcomes: OutcomeDistribution::default(),
            workflow_failures: IndexMap::new(),
            job_failures: IndexMap::new(),
            failed_run_jobs_total: 0,
            failed_run_jobs_failed: 0,
        };

        let rendered = render_flake_summary(&stats);
        assert!(rendered.contains("No workflow runs found."));
    }
}
