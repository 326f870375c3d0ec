use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default GitHub API host.
pub(crate) const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default character cap for [`ReleaseInfo::truncated_body`].
pub const DEFAULT_BODY_LIMIT: usize = 500;

/// Configuration for the UpdateChecker.
#[derive(Debug, Clone)]
pub struct UpdateCheckerConfig {
    /// The repository, either a GitHub URL or "owner/repo".
    pub repo_reference: String,
    /// Timeout for a single request. Default is 10 seconds.
    pub timeout: Duration,
    /// Maximum number of request attempts. Default is 3.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later one. Default is 1 second.
    pub backoff_base: Duration,
    /// Optional User-Agent override.
    pub user_agent: Option<String>,
    /// Base URL for GitHub API (for testing). Defaults to "https://api.github.com".
    pub(crate) api_base_url: String,
}

impl UpdateCheckerConfig {
    /// Creates a new config for the given repository reference.
    pub fn new(repo_reference: impl Into<String>) -> Self {
        Self {
            repo_reference: repo_reference.into(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            user_agent: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Sets a custom API base URL (for testing or GitHub Enterprise).
    #[doc(hidden)]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of attempts.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base backoff delay.
    pub fn backoff_base(mut self, delay: Duration) -> Self {
        self.backoff_base = delay;
        self
    }

    /// Sets the User-Agent header sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The User-Agent to send: the override, or one naming this client and the repository.
    pub(crate) fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!(
                "{}/{} ({})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                self.repo_reference.trim()
            )
        })
    }
}

/// A published GitHub release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    /// The release tag name (e.g., "v1.0.0").
    pub tag_name: String,
    /// The release name/title.
    pub name: String,
    /// The URL to the release page.
    pub html_url: String,
    /// When the release was published, as returned by the API.
    pub published_at: String,
    /// The release notes.
    pub body: String,
}

impl ReleaseInfo {
    /// The release notes capped at [`DEFAULT_BODY_LIMIT`] characters.
    pub fn truncated_body(&self) -> String {
        self.truncated_body_to(DEFAULT_BODY_LIMIT)
    }

    /// The release notes capped at `limit` characters, with "..." appended when cut.
    pub fn truncated_body_to(&self, limit: usize) -> String {
        match self.body.char_indices().nth(limit) {
            Some((end, _)) => format!("{}...", &self.body[..end]),
            None => self.body.clone(),
        }
    }
}

/// Internal structure for GitHub API response.
///
/// Every field is optional; GitHub sends `null` for unset names and bodies.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubReleaseResponse {
    pub tag_name: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub published_at: Option<String>,
    pub body: Option<String>,
}

impl From<GitHubReleaseResponse> for ReleaseInfo {
    fn from(response: GitHubReleaseResponse) -> Self {
        Self {
            tag_name: response.tag_name.unwrap_or_else(|| "unknown".to_string()),
            name: response.name.unwrap_or_default(),
            html_url: response.html_url.unwrap_or_default(),
            published_at: response.published_at.unwrap_or_default(),
            body: response.body.unwrap_or_default(),
        }
    }
}

/// Outcome of an update check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    UpToDate,
    Outdated,
    Ahead,
    Error,
    FetchFailed,
    InvalidVersion,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpToDate => "up_to_date",
            Self::Outdated => "outdated",
            Self::Ahead => "ahead",
            Self::Error => "error",
            Self::FetchFailed => "fetch_failed",
            Self::InvalidVersion => "invalid_version",
        }
    }
}

impl std::fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of comparing the running version against the latest release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionComparison {
    pub status: UpdateStatus,
    /// Human-readable summary, quoting the raw version strings.
    pub message: String,
    pub current_version: String,
    /// The latest release tag, or "unknown" when it could not be fetched.
    pub latest_version: String,
    /// Empty unless both versions parsed.
    pub current_normalized: String,
    /// Empty unless both versions parsed.
    pub latest_normalized: String,
    pub release_info: Option<ReleaseInfo>,
}

impl VersionComparison {
    /// A result for a check that never got as far as a release.
    pub(crate) fn failed(
        status: UpdateStatus,
        message: impl Into<String>,
        current_version: &str,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            current_version: current_version.to_string(),
            latest_version: "unknown".to_string(),
            current_normalized: String::new(),
            latest_normalized: String::new(),
            release_info: None,
        }
    }

    /// Whether a newer release exists.
    pub fn update_available(&self) -> bool {
        self.status == UpdateStatus::Outdated
    }

    /// Flattens the result into a string-keyed map.
    ///
    /// Release fields are only present when release info is attached, and the
    /// notes are truncated.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("status".into(), self.status.as_str().into());
        map.insert("message".into(), self.message.clone().into());
        map.insert("current_version".into(), self.current_version.clone().into());
        map.insert("latest_version".into(), self.latest_version.clone().into());
        map.insert(
            "current_normalized".into(),
            self.current_normalized.clone().into(),
        );
        map.insert(
            "latest_normalized".into(),
            self.latest_normalized.clone().into(),
        );

        if let Some(ref release) = self.release_info {
            map.insert("release_name".into(), release.name.clone().into());
            map.insert("release_url".into(), release.html_url.clone().into());
            map.insert("release_date".into(), release.published_at.clone().into());
            map.insert("release_notes".into(), release.truncated_body().into());
        }

        map
    }
}
