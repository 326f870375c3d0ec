//! Version normalization and comparison against a release tag.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use thiserror::Error;
use tracing::{debug, error};

use crate::types::{ReleaseInfo, UpdateStatus, VersionComparison};

/// Returned by [`normalize`] when the input holds no version number.
pub const FALLBACK_VERSION: &str = "0.0.0";

static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:version|release|tag|v)[\s\-_]*").expect("label prefix regex is valid")
});

/// Why a version string could not be compared.
#[derive(Error, Debug)]
enum VersionError {
    #[error("'{0}' contains no version number")]
    NoDigits(String),

    #[error("'{version}': {source}")]
    Semver {
        version: String,
        source: semver::Error,
    },
}

/// Strips labels and stray characters from a version string.
///
/// Removes one leading "v", "version", "release" or "tag" (any case) with the
/// separators after it, then everything up to the first digit. Returns
/// [`FALLBACK_VERSION`] if no digit is left.
pub fn normalize(raw: &str) -> String {
    normalize_checked(raw).unwrap_or_else(|| FALLBACK_VERSION.to_string())
}

fn normalize_checked(raw: &str) -> Option<String> {
    let unlabeled = LABEL_PREFIX.replace(raw.trim(), "");
    let cleaned = unlabeled.trim_start_matches(|c: char| !c.is_ascii_digit());

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Parses a normalized version, padding "1" and "1.2" out to three components.
fn parse_semver(normalized: &str) -> Result<Version, semver::Error> {
    let (core, suffix) = match normalized.find(['-', '+']) {
        Some(index) => normalized.split_at(index),
        None => (normalized, ""),
    };
    let missing = 2usize.saturating_sub(core.matches('.').count());
    let padded = format!("{}{}{}", core, ".0".repeat(missing), suffix);

    Version::parse(&padded)
}

fn parse_version(raw: &str) -> Result<(String, Version), VersionError> {
    let normalized = normalize_checked(raw).ok_or_else(|| VersionError::NoDigits(raw.to_string()))?;
    let version = parse_semver(&normalized).map_err(|source| VersionError::Semver {
        version: normalized.clone(),
        source,
    })?;
    Ok((normalized, version))
}

/// Compares the running version against a release.
///
/// Never fails: versions that cannot be parsed produce
/// [`UpdateStatus::InvalidVersion`] with the release still attached.
pub fn compare(current_raw: &str, release: &ReleaseInfo) -> VersionComparison {
    let latest_raw = release.tag_name.as_str();

    let parsed = parse_version(current_raw)
        .and_then(|current| parse_version(latest_raw).map(|latest| (current, latest)));

    let ((current_normalized, current), (latest_normalized, latest)) = match parsed {
        Ok(versions) => versions,
        Err(err) => {
            error!("Invalid version format: {}", err);
            return VersionComparison {
                status: UpdateStatus::InvalidVersion,
                message: format!("Invalid version format: {}", err),
                current_version: current_raw.to_string(),
                latest_version: latest_raw.to_string(),
                current_normalized: String::new(),
                latest_normalized: String::new(),
                release_info: Some(release.clone()),
            };
        }
    };

    // Build metadata does not take part in precedence.
    let (status, message) = match current.cmp_precedence(&latest) {
        Ordering::Less => (
            UpdateStatus::Outdated,
            format!(
                "Update available: running {}, latest release is {}",
                current_raw, latest_raw
            ),
        ),
        Ordering::Greater => (
            UpdateStatus::Ahead,
            format!(
                "Running ahead of the latest release: running {}, latest release is {}",
                current_raw, latest_raw
            ),
        ),
        Ordering::Equal => (
            UpdateStatus::UpToDate,
            format!("Up to date: running {}", current_raw),
        ),
    };
    debug!(%current, %latest, %status, "compared versions");

    VersionComparison {
        status,
        message,
        current_version: current_raw.to_string(),
        latest_version: latest_raw.to_string(),
        current_normalized,
        latest_normalized,
        release_info: Some(release.clone()),
    }
}
