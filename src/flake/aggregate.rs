use indexmap::IndexMap;
use serde::Serialize;

use crate::github::types::{WorkflowJob, WorkflowRun};

/// Bucket name that absorbs every versioned backwards-compatibility job.
const BWC_BUCKET: &str = "Backwards compatibility tests on all versions";
const BWC_PREFIX: &str = "Run backwards compatibility tests";

const FAILURE: &str = "failure";

/// Running counts for one grouping key. Counts only increase during a pass,
/// and `total >= failures` holds at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureBucket {
    pub total: usize,
    pub failures: usize,
}

/// Groups records by key in a single pass, counting total occurrences and
/// failures per key. Keys appear in first-encounter order.
pub fn aggregate_failures<T>(
    items: &[T],
    key: impl Fn(&T) -> String,
    is_failure: impl Fn(&T) -> bool,
) -> IndexMap<String, FailureBucket> {
    items.iter().fold(IndexMap::new(), |mut buckets, item| {
        let bucket: &mut FailureBucket = buckets.entry(key(item)).or_default();
        bucket.total += 1;
        if is_failure(item) {
            bucket.failures += 1;
        }
        buckets
    })
}

/// Buckets prepared for reporting: descending failure count, zero-failure
/// buckets dropped.
pub fn sorted_failing(buckets: &IndexMap<String, FailureBucket>) -> Vec<(String, FailureBucket)> {
    let mut failing: Vec<(String, FailureBucket)> = buckets
        .iter()
        .filter(|(_, bucket)| bucket.failures > 0)
        .map(|(name, bucket)| (name.clone(), *bucket))
        .collect();
    failing.sort_by(|a, b| b.1.failures.cmp(&a.1.failures));
    failing
}

/// Collapses versioned backwards-compatibility job names into one bucket so
/// per-version entries do not drown out the rest of the report.
pub fn normalize_job_name(name: &str) -> String {
    if name.starts_with(BWC_PREFIX) {
        BWC_BUCKET.to_string()
    } else {
        name.to_string()
    }
}

pub fn run_key(run: &WorkflowRun) -> String {
    run.name
        .clone()
        .unwrap_or_else(|| "(unnamed workflow)".to_string())
}

pub fn is_failed_run(run: &WorkflowRun) -> bool {
    run.conclusion.as_deref() == Some(FAILURE)
}

pub fn is_failed_job(job: &WorkflowJob) -> bool {
    job.conclusion.as_deref() == Some(FAILURE)
}

#[allow(clippy::cast_precision_loss)]
pub fn calculate_rate(count: usize, total: usize) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Outcome counts over a whole run set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutcomeDistribution {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub skipped: usize,
    pub in_progress: usize,
    pub other: usize,
}

impl OutcomeDistribution {
    /// Tallies run conclusions in one pass. Runs without a conclusion yet are
    /// counted as in progress.
    pub fn from_runs(runs: &[WorkflowRun]) -> Self {
        let mut dist = Self {
            total: runs.len(),
            ..Self::default()
        };

        for run in runs {
            match run.conclusion.as_deref() {
                Some("success") => dist.success += 1,
                Some(FAILURE) => dist.failure += 1,
                Some("skipped") => dist.skipped += 1,
                Some("in_progress") | None => dist.in_progress += 1,
                Some(_) => dist.other += 1,
            }
        }

        dist
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn create_run(id: u64, name: Option<&str>, conclusion: Option<&str>) -> WorkflowRun {
        WorkflowRun {
            id,
            name: name.map(ToString::to_string),
            status: "completed".to_string(),
            conclusion: conclusion.map(ToString::to_string),
            event: "push".to_string(),
            html_url: format!("https://github.com/acme/widgets/actions/runs/{id}"),
        }
    }

    fn create_job(id: u64, run_id: u64, name: &str, conclusion: &str) -> WorkflowJob {
        WorkflowJob {
            id,
            run_id,
            name: name.to_string(),
            status: "completed".to_string(),
            conclusion: Some(conclusion.to_string()),
            html_url: format!("https://github.com/acme/widgets/actions/runs/{run_id}/job/{id}"),
        }
    }

    #[cfg(test)]
    mod aggregate_failures {
        use super::*;

        #[test]
        fn counts_totals_and_failures_per_key() {
            let runs = vec![
                create_run(1, Some("Build"), Some("success")),
                create_run(2, Some("Build"), Some("failure")),
                create_run(3, Some("Lint"), Some("success")),
            ];

            let buckets = aggregate_failures(&runs, run_key, is_failed_run);

            assert_eq!(buckets.len(), 2);
            assert_eq!(
                buckets["Build"],
                FailureBucket {
                    total: 2,
                    failures: 1
                }
            );
            assert_eq!(
                buckets["Lint"],
                FailureBucket {
                    total: 1,
                    failures: 0
                }
            );
        }

        #[test]
        fn totals_sum_to_the_input_length() {
            let runs = vec![
                create_run(1, Some("Build"), Some("success")),
                create_run(2, Some("Lint"), Some("failure")),
                create_run(3, None, Some("failure")),
                create_run(4, Some("Build"), Some("skipped")),
            ];

            let buckets = aggregate_failures(&runs, run_key, is_failed_run);
            let total: usize = buckets.values().map(|bucket| bucket.total).sum();
            assert_eq!(total, runs.len());
        }

        #[test]
        fn every_bucket_satisfies_total_at_least_failures() {
            let runs = vec![
                create_run(1, Some("Build"), Some("failure")),
                create_run(2, Some("Build"), Some("failure")),
                create_run(3, Some("Lint"), Some("success")),
            ];

            let buckets = aggregate_failures(&runs, run_key, is_failed_run);
            for (name, bucket) in &buckets {
                assert!(
                    bucket.total >= bucket.failures,
                    "Bucket {name} violates total >= failures"
                );
            }
        }

        #[test]
        fn keys_appear_in_first_encounter_order() {
            let runs = vec![
                create_run(1, Some("Lint"), Some("success")),
                create_run(2, Some("Build"), Some("success")),
                create_run(3, Some("Lint"), Some("success")),
            ];

            let buckets = aggregate_failures(&runs, run_key, is_failed_run);
            let keys: Vec<&String> = buckets.keys().collect();
            assert_eq!(keys, vec!["Lint", "Build"]);
        }

        #[test]
        fn handles_empty_input() {
            let runs: Vec<WorkflowRun> = vec![];
            let buckets = aggregate_failures(&runs, run_key, is_failed_run);
            assert!(buckets.is_empty());
        }
    }

    #[cfg(test)]
    mod sorted_failing {
        use super::*;

        #[test]
        fn sorts_descending_by_failures_and_drops_zero_failure_buckets() {
            let jobs = vec![
                create_job(1, 1, "build", "failure"),
                create_job(2, 1, "test", "failure"),
                create_job(3, 2, "test", "failure"),
                create_job(4, 2, "lint", "success"),
            ];

            let buckets = aggregate_failures(&jobs, |job| job.name.clone(), is_failed_job);
            let failing = sorted_failing(&buckets);

            let names: Vec<&str> = failing.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["test", "build"]);
            assert_eq!(failing[0].1.failures, 2);
        }

        #[test]
        fn zero_failure_buckets_stay_in_the_computed_map() {
            let jobs = vec![create_job(1, 1, "lint", "success")];

            let buckets = aggregate_failures(&jobs, |job| job.name.clone(), is_failed_job);
            assert!(buckets.contains_key("lint"));
            assert!(sorted_failing(&buckets).is_empty());
        }
    }

    #[cfg(test)]
    mod normalize_job_name {
        use super::*;

        #[test]
        fn collapses_versioned_backwards_compatibility_jobs() {
            assert_eq!(
                normalize_job_name("Run backwards compatibility tests (7.10)"),
                "Backwards compatibility tests on all versions"
            );
            assert_eq!(
                normalize_job_name("Run backwards compatibility tests (7.9)"),
                "Backwards compatibility tests on all versions"
            );
        }

        #[test]
        fn leaves_other_jobs_untouched() {
            assert_eq!(normalize_job_name("Build and test"), "Build and test");
        }

        #[test]
        fn collapsed_jobs_share_one_bucket() {
            let jobs = vec![
                create_job(1, 1, "Run backwards compatibility tests (7.10)", "failure"),
                create_job(2, 1, "Run backwards compatibility tests (7.9)", "success"),
            ];

            let buckets =
                aggregate_failures(&jobs, |job| normalize_job_name(&job.name), is_failed_job);

            assert_eq!(buckets.len(), 1);
            assert_eq!(
                buckets["Backwards compatibility tests on all versions"],
                FailureBucket {
                    total: 2,
                    failures: 1
                }
            );
        }
    }

    #[cfg(test)]
    mod calculate_rate {
        use super::*;

        #[test]
        fn returns_zero_when_total_is_zero() {
            assert_eq!(calculate_rate(5, 0), 0.0, "Should return 0.0 when total is 0");
        }

        #[test]
        fn calculates_percentage_correctly() {
            assert_eq!(calculate_rate(25, 100), 25.0);
        }

        #[test]
        fn handles_fractional_percentages() {
            let result = calculate_rate(1, 3);
            assert!(
                (result - 33.333_333).abs() < 0.001,
                "Should handle fractional percentages, got {result}"
            );
        }
    }

    #[cfg(test)]
    mod outcome_distribution {
        use super::*;

        #[test]
        fn tallies_each_conclusion() {
            let runs = vec![
                create_run(1, Some("Build"), Some("success")),
                create_run(2, Some("Build"), Some("failure")),
                create_run(3, Some("Build"), Some("skipped")),
                create_run(4, Some("Build"), Some("in_progress")),
                create_run(5, Some("Build"), Some("cancelled")),
                create_run(6, Some("Build"), None),
            ];

            let dist = OutcomeDistribution::from_runs(&runs);

            assert_eq!(dist.total, 6);
            assert_eq!(dist.success, 1);
            assert_eq!(dist.failure, 1);
            assert_eq!(dist.skipped, 1);
            assert_eq!(dist.in_progress, 2, "Missing conclusions count as in progress");
            assert_eq!(dist.other, 1);
        }

        #[test]
        fn empty_run_set_is_all_zeroes() {
            let dist = OutcomeDistribution::from_runs(&[]);
            assert_eq!(dist.total, 0);
            assert_eq!(dist.success, 0);
        }
    }
}
