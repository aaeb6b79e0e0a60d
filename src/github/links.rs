use url::form_urlencoded;

/// Builds a GitHub pull-request search URL for manually verifying a
/// suspected missing backport.
///
/// The query is the normalized title of the original pull request, so the
/// search surfaces any backport the heuristic matching may have missed.
pub fn pull_request_search_url(owner: &str, repo: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://github.com/{owner}/{repo}/pulls?q=is%3Apr+{encoded}")
}
