use tracing::{error, info};
use url::Url;

use crate::error::{Result, UpdateCheckError};
use crate::fetcher::ReleaseFetcher;
use crate::resolver::resolve_with_base;
use crate::types::{UpdateCheckerConfig, UpdateStatus, VersionComparison};
use crate::version::compare;

/// Checks a running version against the latest release of a repository.
pub struct UpdateChecker {
    config: UpdateCheckerConfig,
    fetcher: ReleaseFetcher,
}

impl UpdateChecker {
    /// Creates a new UpdateChecker with the given configuration.
    ///
    /// The repository reference is not validated here; an unresolvable
    /// reference is reported by [`check_for_updates`](Self::check_for_updates).
    pub fn new(config: UpdateCheckerConfig) -> Result<Self> {
        if Url::parse(&config.api_base_url).is_err() {
            return Err(UpdateCheckError::InvalidBaseUrl(config.api_base_url.clone()));
        }

        let fetcher = ReleaseFetcher::new(&config);

        Ok(Self { config, fetcher })
    }

    /// Checks whether `current_version` is behind, equal to, or ahead of the
    /// latest release.
    ///
    /// Never fails: resolution, network and API problems are reported as
    /// [`UpdateStatus::Error`] or [`UpdateStatus::FetchFailed`] with
    /// `latest_version` set to "unknown".
    pub async fn check_for_updates(&self, current_version: &str) -> VersionComparison {
        let api_url =
            match resolve_with_base(&self.config.repo_reference, &self.config.api_base_url) {
                Ok(url) => url,
                Err(err) => {
                    error!("{}", err);
                    return VersionComparison::failed(
                        UpdateStatus::Error,
                        err.to_string(),
                        current_version,
                    );
                }
            };

        let result = match self.fetcher.fetch_latest_release(&api_url).await {
            Ok(Some(release)) => compare(current_version, &release),
            Ok(None) => VersionComparison::failed(
                UpdateStatus::FetchFailed,
                "Failed to fetch release information",
                current_version,
            ),
            Err(err) => {
                error!("Release API error: {}", err);
                VersionComparison::failed(
                    UpdateStatus::Error,
                    format!("Release API error: {}", err),
                    current_version,
                )
            }
        };

        info!(
            status = %result.status,
            current = %result.current_version,
            latest = %result.latest_version,
            "update check finished"
        );
        result
    }
}

/// Checks `current_version` against the latest release of `repo_reference`
/// using the default configuration.
pub async fn check_for_updates(current_version: &str, repo_reference: &str) -> VersionComparison {
    match UpdateChecker::new(UpdateCheckerConfig::new(repo_reference)) {
        Ok(checker) => checker.check_for_updates(current_version).await,
        Err(err) => VersionComparison::failed(UpdateStatus::Error, err.to_string(), current_version),
    }
}
