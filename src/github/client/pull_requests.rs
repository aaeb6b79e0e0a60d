use serde::Deserialize;
use serde_json::json;

use crate::error::{AuditError, Result};
use crate::github::types::{Label, PullRequest, PullRequestState};
use crate::output::FetchProgress;

use super::core::{GitHubClient, PAGE_SIZE};

/// Cursor-paginated GraphQL query for pull requests with the fields the
/// backport audit needs. The GitHub schema is far too large to vendor for
/// generated bindings, so the query is kept as a plain document with
/// hand-written response types.
const PULL_REQUESTS_QUERY: &str = r"
query PullRequests($owner: String!, $name: String!, $first: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $first, after: $after, orderBy: {field: CREATED_AT, direction: DESC}) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        number
        title
        state
        url
        labels(first: 100) {
          nodes {
            name
          }
        }
      }
    }
  }
}
";

#[derive(Deserialize)]
struct ResponseData {
    repository: Option<Repository>,
}

#[derive(Deserialize)]
struct Repository {
    #[serde(rename = "pullRequests")]
    pull_requests: PullRequestConnection,
}

#[derive(Deserialize)]
struct PullRequestConnection {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    nodes: Vec<PullRequestNode>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct PullRequestNode {
    number: u64,
    title: String,
    state: PullRequestState,
    url: String,
    labels: Option<LabelConnection>,
}

#[derive(Deserialize)]
struct LabelConnection {
    nodes: Vec<Label>,
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        Self {
            number: node.number,
            title: node.title,
            state: node.state,
            url: node.url,
            labels: node.labels.map(|labels| labels.nodes).unwrap_or_default(),
        }
    }
}

impl GitHubClient {
    /// Fetches every pull request in the repository via cursor pagination.
    ///
    /// Pages arrive in the API's default order (newest first) and are
    /// concatenated as returned. The loop ends when the server reports no
    /// next page or a page comes back empty.
    ///
    /// # Errors
    ///
    /// Any request failure, GraphQL error, or missing repository aborts the
    /// fetch; no partial results are returned.
    pub async fn fetch_pull_requests(&self, progress: &FetchProgress) -> Result<Vec<PullRequest>> {
        let mut all_prs: Vec<PullRequest> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 1usize;

        loop {
            let variables = json!({
                "owner": self.owner(),
                "name": self.repo(),
                "first": PAGE_SIZE,
                "after": cursor,
            });

            let data: ResponseData = self.post_graphql(PULL_REQUESTS_QUERY, variables).await?;

            let repository = data.repository.ok_or_else(|| {
                AuditError::RepositoryNotFound(format!("{}/{}", self.owner(), self.repo()))
            })?;
            let connection = repository.pull_requests;

            if connection.nodes.is_empty() {
                break;
            }

            all_prs.extend(connection.nodes.into_iter().map(PullRequest::from));
            progress.page(page, all_prs.len());

            if !connection.page_info.has_next_page {
                break;
            }

            cursor = connection.page_info.end_cursor;
            // An exhausted cursor with hasNextPage still set would loop forever
            if cursor.is_none() {
                break;
            }

            page += 1;
        }

        Ok(all_prs)
    }
}
