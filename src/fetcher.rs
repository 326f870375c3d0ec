use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{Result, UpdateCheckError};
use crate::types::{GitHubReleaseResponse, ReleaseInfo, UpdateCheckerConfig};

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Fetches the latest release with a bounded number of attempts.
///
/// Timeouts and transport errors are retried after an exponential backoff;
/// any HTTP status other than 200 fails immediately.
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    timeout: Duration,
    max_attempts: u32,
    backoff_base: Duration,
    user_agent: String,
}

impl ReleaseFetcher {
    /// Creates a fetcher from the timing and identity settings of a config.
    pub fn new(config: &UpdateCheckerConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_attempts: config.max_attempts,
            backoff_base: config.backoff_base,
            user_agent: config.effective_user_agent(),
        }
    }

    /// Delay after the zero-indexed failed `attempt`: base, 2 * base, 4 * base, ...
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Fetches the release behind `api_url`.
    ///
    /// # Returns
    /// The release, or None if the API answered 200 with an empty payload.
    ///
    /// # Errors
    /// The last transient error once every attempt has failed, or the first
    /// non-transient one.
    pub async fn fetch_latest_release(&self, api_url: &str) -> Result<Option<ReleaseInfo>> {
        // Dropped on every return path, closing pooled connections.
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;

        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            debug!(attempt = attempt + 1, url = api_url, "fetching latest release");

            match self.try_fetch(&client, api_url).await {
                Ok(payload) => return parse_release(payload),
                Err(err) if err.is_transient() => {
                    warn!("Request failed on attempt {}: {}", attempt + 1, err);
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }

            if attempt + 1 < self.max_attempts {
                let delay = self.backoff_delay(attempt);
                debug!(?delay, "backing off before retry");
                tokio::time::sleep(delay).await;
            }
        }

        let err = last_error.unwrap_or(UpdateCheckError::AllAttemptsFailed);
        error!("All {} attempts failed. Last error: {}", self.max_attempts, err);
        Err(err)
    }

    /// Performs a single GET and returns the decoded JSON body of a 200 response.
    async fn try_fetch(&self, client: &Client, api_url: &str) -> Result<Value> {
        let response = client
            .get(api_url)
            .header("Accept", ACCEPT)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Err(UpdateCheckError::NotFound),
            StatusCode::FORBIDDEN => return Err(UpdateCheckError::RateLimited),
            status => {
                return Err(UpdateCheckError::ApiError {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                })
            }
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn classify(&self, err: reqwest::Error) -> UpdateCheckError {
        if err.is_timeout() {
            UpdateCheckError::Timeout(self.timeout)
        } else {
            UpdateCheckError::HttpError(err)
        }
    }
}

/// Builds a release from a decoded 200 body.
///
/// Empty values (`null`, `{}`, `[]`, `""`, `false`, `0`) carry no release.
fn parse_release(payload: Value) -> Result<Option<ReleaseInfo>> {
    let is_empty = match &payload {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    };
    if is_empty {
        return Ok(None);
    }

    let response: GitHubReleaseResponse = serde_json::from_value(payload)?;
    Ok(Some(response.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backoff_doubles_from_base() {
        let fetcher = ReleaseFetcher::new(&UpdateCheckerConfig::new("acme/widget"));

        assert_eq!(fetcher.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(fetcher.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(fetcher.backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_saturates() {
        let fetcher = ReleaseFetcher::new(&UpdateCheckerConfig::new("acme/widget"));
        assert_eq!(
            fetcher.backoff_delay(40),
            Duration::from_secs(u64::from(u32::MAX))
        );
    }

    #[test]
    fn test_empty_payloads_carry_no_release() {
        assert!(parse_release(Value::Null).unwrap().is_none());
        assert!(parse_release(json!({})).unwrap().is_none());
        assert!(parse_release(json!([])).unwrap().is_none());
        assert!(parse_release(json!("")).unwrap().is_none());
        assert!(parse_release(json!(false)).unwrap().is_none());
        assert!(parse_release(json!(0)).unwrap().is_none());
        assert!(parse_release(json!(0.0)).unwrap().is_none());
    }

    #[test]
    fn test_release_payload() {
        let release = parse_release(json!({
            "tag_name": "v1.2.0",
            "name": "Widget 1.2",
            "html_url": "https://github.com/acme/widget/releases/tag/v1.2.0",
            "published_at": "2024-03-15T10:00:00Z",
            "body": null,
            "prerelease": false
        }))
        .unwrap()
        .unwrap();

        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.name, "Widget 1.2");
        assert_eq!(release.body, "");
    }

    #[test]
    fn test_unexpected_shapes_are_parse_errors() {
        assert!(matches!(
            parse_release(json!([{"tag_name": "v1.0.0"}])),
            Err(UpdateCheckError::ParseError(_))
        ));
        assert!(matches!(
            parse_release(json!({"tag_name": 42})),
            Err(UpdateCheckError::ParseError(_))
        ));
        assert!(matches!(
            parse_release(json!("v1.0.0")),
            Err(UpdateCheckError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_attempts_reports_all_attempts_failed() {
        let config = UpdateCheckerConfig::new("acme/widget").max_attempts(0);
        let fetcher = ReleaseFetcher::new(&config);

        let result = fetcher
            .fetch_latest_release("http://127.0.0.1:9/repos/acme/widget/releases/latest")
            .await;
        assert!(matches!(result, Err(UpdateCheckError::AllAttemptsFailed)));
    }
}
