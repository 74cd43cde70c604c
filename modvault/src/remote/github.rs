//! GitHub releases implementation of the repository client.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::{ModRepositoryClient, RemoteError};

/// Default HTTP request timeout (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// GitHub-backed implementation of [`ModRepositoryClient`].
///
/// Resolves the latest tag through the public releases API. A repository
/// without any published release answers 404, which maps to `Ok(None)` so
/// untagged repositories read as "no newer version known".
///
/// # Example
///
/// ```ignore
/// use modvault::remote::{GithubReleaseClient, ModRepositoryClient};
///
/// let client = GithubReleaseClient::new()?;
/// let tag = client.latest_tag("acme/signals").await?;
/// ```
#[derive(Clone)]
pub struct GithubReleaseClient {
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for GithubReleaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubReleaseClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GithubReleaseClient {
    /// Create a client with default settings.
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("modvault/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }
}

impl ModRepositoryClient for GithubReleaseClient {
    async fn latest_tag(&self, repository: &str) -> Result<Option<String>, RemoteError> {
        let url = releases_url(repository);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout {
                        url: url.clone(),
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    RemoteError::Http(e.to_string())
                }
            })?;

        // No release has ever been published for this repository.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::Http(e.to_string()))?;

        match body["tag_name"].as_str() {
            Some(tag) => Ok(Some(tag.to_string())),
            None => Err(RemoteError::InvalidResponse {
                url,
                reason: "tag_name missing from release".to_string(),
            }),
        }
    }
}

/// URL of the latest-release endpoint for a repository.
fn releases_url(repository: &str) -> String {
    format!("https://api.github.com/repos/{}/releases/latest", repository)
}
