use indexmap::IndexMap;
use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::github::cache::{CacheKind, CacheStore};
use crate::github::client::GitHubClient;
use crate::github::links::pull_request_search_url;
use crate::github::types::{PullRequest, PullRequestState};
use crate::output::FetchProgress;

use super::matching::{backport_labels, is_backport_of, is_backport_title, normalize_title};

/// A merged pull request with at least one backport label for which no
/// matching backport pull request was found.
#[derive(Debug, Clone, Serialize)]
pub struct MissingBackport {
    pub number: u64,
    pub title: String,
    /// Backport labels with no satisfying candidate, in encounter order
    pub labels: Vec<String>,
    pub url: String,
    /// Search link for manually verifying the miss
    pub search_url: String,
}

/// Result of one backport audit run.
pub struct BackportAuditSummary {
    pub total_fetched: usize,
    pub needing_validation: usize,
    pub missing: IndexMap<u64, MissingBackport>,
}

/// Pull requests eligible to be someone's backport: backport-prefixed title,
/// state open or merged.
pub fn backport_candidates(prs: &[PullRequest]) -> Vec<&PullRequest> {
    prs.iter()
        .filter(|pr| {
            matches!(
                pr.state,
                PullRequestState::Open | PullRequestState::Merged
            ) && is_backport_title(&pr.title)
        })
        .collect()
}

/// Pull requests whose backports need verifying: terminal but not closed,
/// carrying at least one backport label.
pub fn validation_set(prs: &[PullRequest]) -> Vec<&PullRequest> {
    prs.iter()
        .filter(|pr| {
            !matches!(
                pr.state,
                PullRequestState::Open | PullRequestState::Closed
            )
        })
        .filter(|pr| !backport_labels(pr).is_empty())
        .collect()
}

/// Single reduction over the validation set producing the missing-backport
/// records.
///
/// A pull request appears at most once regardless of how many of its labels
/// are missing, and each label at most once per record, in encounter order.
pub fn find_missing_backports(
    owner: &str,
    repo: &str,
    prs: &[PullRequest],
) -> IndexMap<u64, MissingBackport> {
    let candidates = backport_candidates(prs);
    let mut missing: IndexMap<u64, MissingBackport> = IndexMap::new();

    for pr in validation_set(prs) {
        let satisfied = candidates
            .iter()
            .any(|candidate| is_backport_of(pr, candidate));
        if satisfied {
            continue;
        }

        let record = missing.entry(pr.number).or_insert_with(|| MissingBackport {
            number: pr.number,
            title: pr.title.clone(),
            labels: Vec::new(),
            url: pr.url.clone(),
            search_url: pull_request_search_url(owner, repo, &normalize_title(&pr.title)),
        });

        for label in backport_labels(pr) {
            if !record.labels.iter().any(|existing| existing == label) {
                record.labels.push(label.to_string());
            }
        }
    }

    missing
}

/// Runs the backport audit: fetch (or load cached) pull requests, then find
/// every labeled pull request with no matching backport.
pub async fn run(client: &GitHubClient, cache: &CacheStore) -> Result<BackportAuditSummary> {
    let prs = match cache.load::<PullRequest>(CacheKind::PullRequests)? {
        Some(prs) => {
            info!("Loaded {} pull requests from cache", prs.len());
            prs
        }
        None => {
            let progress = FetchProgress::start("Fetching pull requests");
            let prs = client.fetch_pull_requests(&progress).await?;
            progress.finish(prs.len(), "pull requests");
            cache.save(CacheKind::PullRequests, &prs)?;
            prs
        }
    };

    let needing_validation = validation_set(&prs).len();
    let missing = find_missing_backports(client.owner(), client.repo(), &prs);

    info!(
        "Audited {} pull requests, {} needing validation, {} missing backports",
        prs.len(),
        needing_validation,
        missing.len()
    );

    Ok(BackportAuditSummary {
        total_fetched: prs.len(),
        needing_validation,
        missing,
    })
}
