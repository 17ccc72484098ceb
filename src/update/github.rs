//! GitHub Releases API client implementation

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::config::{DEFAULT_API_BASE_URL, FETCH_TIMEOUT_MS, USER_AGENT, UpdateConfig};
use crate::update::error::RemoteError;
use crate::update::release::ReleaseClient;
use crate::update::types::ReleaseDescriptor;

/// Release client for the GitHub Releases API
pub struct GitHubReleaseClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubReleaseClient {
    /// Creates a new GitHubReleaseClient with a custom base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &UpdateConfig) -> Self {
        let client = Self::new(&config.api_base_url, config.fetch_timeout());
        match &config.github_token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// Sends `token` as a bearer credential with every request
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Appends `segments` to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteError::Unknown(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Unknown(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_release(&self, url: Url, subject: &str) -> Result<ReleaseDescriptor, RemoteError> {
        debug!("Fetching release from {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.inspect_err(|e| {
            warn!("Release request to {} failed: {}", url, e);
        })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RemoteError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status.is_client_error() {
            debug!("GitHub API returned status {}: {}", status, url);
            return Err(RemoteError::NotFound(subject.to_string()));
        }

        if status.is_server_error() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RemoteError::Server {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RemoteError::Unknown(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub release response: {}", e);
            if e.is_timeout() {
                RemoteError::Timeout
            } else {
                RemoteError::InvalidResponse(e.to_string())
            }
        })
    }
}

impl Default for GitHubReleaseClient {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_BASE_URL,
            Duration::from_millis(FETCH_TIMEOUT_MS),
        )
    }
}

#[async_trait::async_trait]
impl ReleaseClient for GitHubReleaseClient {
    async fn fetch_latest(&self, owner: &str, repo: &str) -> Result<ReleaseDescriptor, RemoteError> {
        let url = self.endpoint(&["repos", owner, repo, "releases", "latest"])?;
        self.get_release(url, &format!("{}/{}", owner, repo)).await
    }

    async fn fetch_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseDescriptor, RemoteError> {
        let url = self.endpoint(&["repos", owner, repo, "releases", "tags", tag])?;
        self.get_release(url, &format!("{}/{}@{}", owner, repo, tag))
            .await
    }
}
