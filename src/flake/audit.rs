use chrono::Utc;
use log::info;

use crate::error::Result;
use crate::github::cache::{CacheKind, CacheStore};
use crate::github::client::GitHubClient;
use crate::github::types::{WorkflowJob, WorkflowRun};
use crate::output::FetchProgress;

use super::aggregate::{
    aggregate_failures, is_failed_job, is_failed_run, normalize_job_name, run_key,
    OutcomeDistribution,
};
use super::stats::FlakeStats;

/// Runs the flake audit: fetch (or load cached) workflow runs, fetch the jobs
/// of every failed run, and reduce both collections into failure statistics.
pub async fn run(
    client: &GitHubClient,
    cache: &CacheStore,
    limit: usize,
    branch: Option<&str>,
) -> Result<FlakeStats> {
    let runs = match cache.load::<WorkflowRun>(CacheKind::WorkflowRuns)? {
        Some(runs) => {
            info!("Loaded {} workflow runs from cache", runs.len());
            runs
        }
        None => {
            let progress = FetchProgress::start("Fetching workflow runs");
            let runs = client.fetch_workflow_runs(limit, branch, &progress).await?;
            progress.finish(runs.len(), "workflow runs");
            cache.save(CacheKind::WorkflowRuns, &runs)?;
            runs
        }
    };

    let failed_runs: Vec<&WorkflowRun> = runs.iter().filter(|run| is_failed_run(run)).collect();
    info!(
        "Analyzing {} workflow runs ({} failed)",
        runs.len(),
        failed_runs.len()
    );

    let jobs = match cache.load::<WorkflowJob>(CacheKind::Jobs)? {
        Some(jobs) => {
            info!("Loaded {} jobs from cache", jobs.len());
            jobs
        }
        None => {
            let progress = FetchProgress::start("Fetching jobs for failed runs");
            let mut jobs = Vec::new();
            for (index, run) in failed_runs.iter().enumerate() {
                jobs.extend(client.fetch_jobs_for_run(run.id).await?);
                progress.page(index + 1, jobs.len());
            }
            progress.finish(jobs.len(), "jobs");
            cache.save(CacheKind::Jobs, &jobs)?;
            jobs
        }
    };

    let workflow_failures = aggregate_failures(&runs, run_key, is_failed_run);
    let job_failures =
        aggregate_failures(&jobs, |job| normalize_job_name(&job.name), is_failed_job);
    let failed_run_jobs_failed = jobs.iter().filter(|job| is_failed_job(job)).count();

    Ok(FlakeStats {
        repository: format!("{}/{}", client.owner(), client.repo()),
        collected_at: Utc::now(),
        runs_analyzed: runs.len(),
        outcomes: OutcomeDistribution::from_runs(&runs),
        workflow_failures,
        job_failures,
        failed_run_jobs_total: jobs.len(),
        failed_run_jobs_failed,
    })
}
