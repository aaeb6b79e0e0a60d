use std::sync::LazyLock;

use regex::Regex;

use crate::github::types::PullRequest;

/// Backport pull-request titles: `[Backport 2.x] ...`, `[backport main] ...`.
static BACKPORT_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\[backport\s+[^\]]+\]\s*").unwrap());

/// A leading bracketed namespace: `[Discover] ...`, `[CI] ...`.
static LEADING_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*").unwrap());

/// A trailing pull-request reference: `... (#1234)`.
static TRAILING_PR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(#\d{4}\)\s*$").unwrap());

/// Backport labels: `backport 2.x`, `Backport main`.
static BACKPORT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^backport\s+\S+").unwrap());

/// Whether a title marks its pull request as a backport.
pub fn is_backport_title(title: &str) -> bool {
    BACKPORT_TITLE.is_match(title)
}

/// Whether a label requests a backport to some branch or version.
pub fn is_backport_label(name: &str) -> bool {
    BACKPORT_LABEL.is_match(name.trim())
}

/// Backport labels carried by a pull request, in label order.
pub fn backport_labels(pr: &PullRequest) -> Vec<&str> {
    pr.labels
        .iter()
        .map(|label| label.name.as_str())
        .filter(|name| is_backport_label(name))
        .collect()
}

/// Reduces a pull-request title to the search string used for locating its
/// backports.
///
/// Applied in order: drop a `[Backport <version>]` prefix, otherwise drop a
/// leading bracketed namespace, then drop a trailing `(#NNNN)` reference.
/// The result is trimmed.
pub fn normalize_title(title: &str) -> String {
    let reduced = if let Some(m) = BACKPORT_TITLE.find(title) {
        &title[m.end()..]
    } else if let Some(m) = LEADING_NAMESPACE.find(title) {
        &title[m.end()..]
    } else {
        title
    };

    TRAILING_PR_REF.replace(reduced, "").trim().to_string()
}

/// Decides whether `candidate` is a backport of `original`.
///
/// A candidate qualifies when its own title carries the backport prefix and
/// either names the original by number (`#123`) or contains the original's
/// normalized title, case-insensitively. An empty normalized title never
/// matches by containment since every title would satisfy it.
///
/// The decision is existence-only: one candidate may satisfy several
/// originals and vice versa.
pub fn is_backport_of(original: &PullRequest, candidate: &PullRequest) -> bool {
    if !is_backport_title(&candidate.title) {
        return false;
    }

    let candidate_title = candidate.title.to_lowercase();
    if candidate_title.contains(&format!("#{}", original.number)) {
        return true;
    }

    let search = normalize_title(&original.title).to_lowercase();
    !search.is_empty() && candidate_title.contains(&search)
}
