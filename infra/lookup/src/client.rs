use crate::error::{LookupError, LookupErrorExt};
use crate::profile::CompanyProfile;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("orgdir/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`RegistryClient`].
#[derive(Debug, Clone)]
pub struct RegistryClientConfig {
    /// Endpoint root; the identifier is appended as the last path segment.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl RegistryClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: Duration::from_secs(10), user_agent: None }
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Reads company records from the registry: `GET {base_url}/{identifier}`.
///
/// Shares one connection pool; clone freely across tasks.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// # Errors
    /// [`LookupError::Configuration`] for an empty base URL or an unusable user agent,
    /// [`LookupError::Transport`] when the TLS backend cannot be initialised.
    pub fn new(config: RegistryClientConfig) -> Result<Self, LookupError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(LookupError::Configuration {
                message: "base_url cannot be empty".into(),
                context: None,
            });
        }

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let user_agent =
            HeaderValue::from_str(user_agent).map_err(|e| LookupError::Configuration {
                message: e.to_string().into(),
                context: Some("Invalid user agent".into()),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build registry HTTP client")?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the company registered under `identifier` (digits only).
    ///
    /// # Errors
    /// [`LookupError::NotFound`] on HTTP 404, [`LookupError::Status`] for any other
    /// non-success status, and [`LookupError::Transport`] for connection failures,
    /// timeouts and bodies that are not a JSON company record.
    pub async fn lookup(&self, identifier: &str) -> Result<CompanyProfile, LookupError> {
        let url = format!("{}/{identifier}", self.base_url);
        debug!(%url, "Querying company registry");

        let response = self.http.get(&url).send().await.context(format!("GET {url}"))?;

        match response.status() {
            status if status.is_success() => {
                response.json::<CompanyProfile>().await.context("Malformed registry body")
            },
            StatusCode::NOT_FOUND => {
                Err(LookupError::NotFound { identifier: identifier.to_owned(), context: None })
            },
            status => Err(LookupError::Status { status: status.as_u16(), context: None }),
        }
    }
}
