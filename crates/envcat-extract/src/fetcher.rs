//! Blocking HTTP fetcher with bounded retry, exponential backoff, timeout,
//! and gzip.

use std::time::Duration;

use envcat_core::config::ExtractionConfig;
use envcat_core::errors::{EnvcatResult, ExtractionError};
use envcat_core::traits::ISourceFetcher;
use envcat_core::SourceFormat;
use tracing::{debug, warn};

/// Retry policy for source fetches.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl From<&ExtractionConfig> for RetryPolicy {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

/// Fetches catalogue documents over HTTP(S).
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(config: &ExtractionConfig) -> EnvcatResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .user_agent(concat!("envcat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractionError::FetchFailed {
                format: SourceFormat::Json,
                location: config.base_url.clone(),
                attempts: 0,
                reason: format!("HTTP client construction failed: {e}"),
            })?;
        Ok(Self {
            client,
            policy: RetryPolicy::from(config),
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl ISourceFetcher for HttpFetcher {
    fn fetch(&self, format: SourceFormat, location: &str) -> EnvcatResult<Vec<u8>> {
        let mut last_err = String::new();
        let mut attempts = 0;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                let delay = self.policy.backoff_for(attempt);
                debug!(%format, location, attempt, ?delay, "retrying source fetch");
                std::thread::sleep(delay);
            }
            attempts += 1;

            match self.client.get(location).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        match resp.bytes() {
                            Ok(body) => return Ok(body.to_vec()),
                            Err(e) => last_err = format!("body read failed: {e}"),
                        }
                    } else if status.is_client_error() {
                        // 4xx will not change on retry.
                        return Err(ExtractionError::FetchFailed {
                            format,
                            location: location.to_string(),
                            attempts,
                            reason: format!("HTTP {status}"),
                        }
                        .into());
                    } else {
                        last_err = format!("HTTP {status}");
                    }
                }
                Err(e) => last_err = e.to_string(),
            }
            warn!(%format, location, attempt = attempts, error = %last_err, "source fetch failed");
        }

        Err(ExtractionError::FetchFailed {
            format,
            location: location.to_string(),
            attempts,
            reason: last_err,
        }
        .into())
    }
}
