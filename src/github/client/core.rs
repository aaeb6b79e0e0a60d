use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::auth::Token;
use crate::error::{AuditError, Result};

pub(super) const PAGE_SIZE: usize = 100;

/// GitHub API client covering the REST and GraphQL endpoints the audits use.
///
/// Requests are issued strictly sequentially and never retried: any failure
/// aborts the audit run.
pub struct GitHubClient {
    pub(super) client: reqwest::Client,
    pub(super) rest_url: Url,
    pub(super) graphql_url: Url,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Creates a client for one repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, owner: String, repo: String, token: Option<&Token>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repoaudit/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| AuditError::Config(format!("Invalid auth token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AuditError::Config(format!("Failed to create HTTP client: {e}")))?;

        let rest_url = Url::parse(base_url)
            .map_err(|e| AuditError::Config(format!("Invalid base URL: {e}")))?;

        let graphql_url = rest_url
            .join("graphql")
            .map_err(|e| AuditError::Config(format!("Invalid GraphQL URL: {e}")))?;

        Ok(Self {
            client,
            rest_url,
            graphql_url,
            owner,
            repo,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Issues a GET request and deserializes the JSON response body.
    pub(super) async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AuditError::RepositoryNotFound(format!(
                "{}/{}",
                self.owner, self.repo
            )));
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(AuditError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Posts a GraphQL query and unwraps the response envelope, surfacing any
    /// GraphQL-level errors before handing back the data.
    pub(super) async fn post_graphql<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        debug!("POST {}", self.graphql_url);

        let response = self
            .client
            .post(self.graphql_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(AuditError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GraphQlEnvelope<T> = response.json().await?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                return Err(AuditError::GraphQl(
                    errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join(", "),
                ));
            }
        }

        envelope
            .data
            .ok_or_else(|| AuditError::GraphQl("response contained no data".to_string()))
    }
}

#[derive(Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}
