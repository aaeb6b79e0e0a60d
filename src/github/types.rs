use serde::{Deserialize, Serialize};

/// Lifecycle state of a pull request as reported by the GraphQL API.
///
/// `Other` absorbs any state the API may add later so a single unknown
/// value does not abort a whole audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
    #[serde(other)]
    Other,
}

/// A label attached to a pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A pull request with the fields the backport audit needs.
///
/// `number` is unique and stable within a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: PullRequestState,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub url: String,
}

/// A GitHub Actions workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    /// Workflow name; absent for runs of deleted workflow files
    pub name: Option<String>,
    /// Lifecycle status (e.g., "completed", "in_progress")
    pub status: String,
    /// Final outcome (e.g., "success", "failure", "skipped"); `None` while running
    pub conclusion: Option<String>,
    /// Event that triggered the run (e.g., "push", "pull_request")
    pub event: String,
    pub html_url: String,
}

/// A job within a workflow run. Each job belongs to exactly one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    pub id: u64,
    pub run_id: u64,
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub html_url: String,
}
