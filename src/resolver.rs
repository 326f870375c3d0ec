use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, UpdateCheckError};
use crate::types::DEFAULT_API_BASE_URL;

/// Repository reference shapes, tried in order. The first match wins.
static REPO_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        // https://github.com/owner/repo(.git), git@github.com:owner/repo.git
        Regex::new(r"github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$").expect("URL regex is valid"),
        // owner/repo
        Regex::new(r"^([^/]+)/([^/]+)$").expect("short form regex is valid"),
    ]
});

/// Maximum length for a GitHub username/organization name.
/// This limit is enforced by GitHub.
const MAX_GITHUB_OWNER_LENGTH: usize = 39;

/// Maximum length for a GitHub repository name.
/// This limit is enforced by GitHub.
const MAX_GITHUB_REPO_LENGTH: usize = 100;

/// Resolves a repository reference to its GitHub "latest release" endpoint.
///
/// Accepts a repository URL (`https://github.com/owner/repo`, optionally
/// ending in `.git` or `/`) or the short `owner/repo` form.
pub fn resolve(repo_url: &str) -> Result<String> {
    resolve_with_base(repo_url, DEFAULT_API_BASE_URL)
}

/// Like [`resolve`], against a different API host.
pub fn resolve_with_base(repo_url: &str, api_base_url: &str) -> Result<String> {
    let (owner, repo) = parse_repo_reference(repo_url)
        .ok_or_else(|| UpdateCheckError::InvalidRepositoryReference(repo_url.to_string()))?;

    Ok(format!(
        "{}/repos/{}/{}/releases/latest",
        api_base_url.trim_end_matches('/'),
        owner,
        repo
    ))
}

fn parse_repo_reference(repo_url: &str) -> Option<(&str, &str)> {
    let reference = repo_url.trim().trim_end_matches('/');

    let captures = REPO_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(reference))?;
    let owner = captures.get(1)?.as_str();
    let repo = captures.get(2)?.as_str();

    (is_valid_owner(owner) && is_valid_repo_name(repo)).then_some((owner, repo))
}

/// GitHub requirements:
/// - Owner: alphanumeric or hyphens, cannot start/end with hyphen, max 39 chars
fn is_valid_owner(owner: &str) -> bool {
    !owner.is_empty()
        && owner.len() <= MAX_GITHUB_OWNER_LENGTH
        && !owner.starts_with('-')
        && !owner.ends_with('-')
        && owner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// - Repo: alphanumeric, hyphens, underscores, or dots, max 100 chars
fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_GITHUB_REPO_LENGTH
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
