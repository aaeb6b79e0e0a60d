use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::aggregate::{FailureBucket, OutcomeDistribution};

/// Aggregated CI health statistics for one repository.
///
/// Serializable so a run's statistics can be exported as JSON next to the
/// console report.
#[derive(Debug, Serialize)]
pub struct FlakeStats {
    pub repository: String,
    pub collected_at: DateTime<Utc>,
    pub runs_analyzed: usize,
    pub outcomes: OutcomeDistribution,
    /// Failure buckets keyed by workflow name, over all fetched runs
    pub workflow_failures: IndexMap<String, FailureBucket>,
    /// Failure buckets keyed by normalized job name, over jobs of failed runs
    pub job_failures: IndexMap<String, FailureBucket>,
    /// All jobs belonging to runs that concluded in failure
    pub failed_run_jobs_total: usize,
    /// The subset of those jobs that themselves concluded in failure
    pub failed_run_jobs_failed: usize,
}
