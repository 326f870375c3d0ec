use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while checking for updates.
///
/// These never escape [`UpdateChecker::check_for_updates`](crate::UpdateChecker::check_for_updates),
/// which turns every one of them into an [`UpdateStatus`](crate::UpdateStatus).
#[derive(Error, Debug)]
pub enum UpdateCheckError {
    /// The repository reference matched neither a GitHub URL nor "owner/repo".
    #[error("Invalid repository reference: expected a GitHub URL or 'owner/repo', got '{0}'")]
    InvalidRepositoryReference(String),

    /// Invalid API base URL.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A single request did not complete within the configured timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure (connection refused, reset, DNS, ...).
    #[error("Network error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The repository does not exist or has no published release.
    #[error("Repository not found or no releases available (HTTP 404)")]
    NotFound,

    /// The API refused the request, usually because of rate limiting.
    #[error("API rate limit exceeded (HTTP 403)")]
    RateLimited,

    /// Any other non-200 status.
    #[error("HTTP {status}: {reason}")]
    ApiError { status: u16, reason: String },

    /// The response body was not a release object.
    #[error("Failed to parse release data: {0}")]
    ParseError(#[from] serde_json::Error),

    /// No attempt was made, or none left an error behind.
    #[error("All retry attempts failed")]
    AllAttemptsFailed,
}

impl UpdateCheckError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::HttpError(_))
    }
}

/// Result type alias for update check operations.
pub type Result<T> = std::result::Result<T, UpdateCheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_failures_are_transient() {
        assert!(UpdateCheckError::Timeout(Duration::from_secs(10)).is_transient());
        assert!(!UpdateCheckError::NotFound.is_transient());
        assert!(!UpdateCheckError::RateLimited.is_transient());
        assert!(!UpdateCheckError::AllAttemptsFailed.is_transient());
        assert!(!UpdateCheckError::ApiError {
            status: 500,
            reason: "Internal Server Error".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_status_is_embedded_in_message() {
        let err = UpdateCheckError::ApiError {
            status: 502,
            reason: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
        assert!(UpdateCheckError::NotFound.to_string().contains("404"));
        assert!(UpdateCheckError::RateLimited.to_string().contains("403"));
    }
}
