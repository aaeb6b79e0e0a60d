use serde::Deserialize;
use url::Url;

use crate::error::{AuditError, Result};
use crate::github::types::{WorkflowJob, WorkflowRun};
use crate::output::FetchProgress;

use super::core::{GitHubClient, PAGE_SIZE};

#[derive(Deserialize)]
struct WorkflowRunsResponse {
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Deserialize)]
struct WorkflowJobsResponse {
    jobs: Vec<WorkflowJob>,
}

impl GitHubClient {
    /// Fetches workflow runs, newest first, up to `limit` records.
    ///
    /// Pages are requested sequentially until one comes back empty or the
    /// limit is reached; the last page may overshoot the limit, so the result
    /// is truncated to exactly `limit`.
    ///
    /// # Errors
    ///
    /// Any request or parse failure aborts the fetch; no partial results are
    /// returned.
    pub async fn fetch_workflow_runs(
        &self,
        limit: usize,
        branch: Option<&str>,
        progress: &FetchProgress,
    ) -> Result<Vec<WorkflowRun>> {
        let mut all_runs = Vec::new();
        let mut page = 1usize;
        let per_page = PAGE_SIZE.min(limit.max(1));

        loop {
            let mut url = self.runs_endpoint(None)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("per_page", &per_page.to_string());
                query.append_pair("page", &page.to_string());
                if let Some(branch) = branch {
                    query.append_pair("branch", branch);
                }
            }

            let response: WorkflowRunsResponse = self.get_json(url).await?;
            if response.workflow_runs.is_empty() {
                break;
            }

            all_runs.extend(response.workflow_runs);
            progress.page(page, all_runs.len());

            if all_runs.len() >= limit {
                break;
            }

            page += 1;
        }

        all_runs.truncate(limit);

        Ok(all_runs)
    }

    /// Fetches every job of one workflow run.
    ///
    /// # Errors
    ///
    /// Any request or parse failure aborts the fetch.
    pub async fn fetch_jobs_for_run(&self, run_id: u64) -> Result<Vec<WorkflowJob>> {
        let mut all_jobs = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.runs_endpoint(Some(run_id))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("per_page", &PAGE_SIZE.to_string());
                query.append_pair("page", &page.to_string());
            }

            let response: WorkflowJobsResponse = self.get_json(url).await?;
            if response.jobs.is_empty() {
                break;
            }

            all_jobs.extend(response.jobs);
            page += 1;
        }

        Ok(all_jobs)
    }

    fn runs_endpoint(&self, run_id: Option<u64>) -> Result<Url> {
        let path = match run_id {
            Some(run_id) => format!(
                "repos/{}/{}/actions/runs/{run_id}/jobs",
                self.owner(),
                self.repo()
            ),
            None => format!("repos/{}/{}/actions/runs", self.owner(), self.repo()),
        };

        self.rest_url
            .join(&path)
            .map_err(|e| AuditError::Config(format!("Invalid API URL: {e}")))
    }
}
