//! Retrying wrapper around the portal HTTP client.

use std::time::Duration;

use rand::Rng;
use schoolportal_api::Client;

use crate::config::PortalConfig;
use crate::crawl::PageFetcher;
use crate::error::PortalError;
use crate::validation::{validate_base_url, validate_session_cookie};

/// Extra time the HTTP layer allows past the crawl's fetch deadline, so an
/// expired fetch is reported as a timeout rather than a failed request.
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Exponential backoff with jitter for transient failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn from_config(config: &PortalConfig) -> Self {
        Self {
            max_retries: config.retry_max,
            base_delay_ms: config.retry_base_ms,
            max_delay_ms: config.retry_max_ms,
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Portal client used by the crawl.
///
/// Transient failures (network errors, 429, 5xx) are retried up to
/// `max_retries` times; with the default of zero a failing page is reported
/// straight away and the crawl moves on.
#[derive(Clone)]
pub struct PortalClient {
    inner: Client,
    retry: RetryConfig,
}

impl PortalClient {
    pub fn new(inner: Client) -> Self {
        Self {
            inner,
            retry: RetryConfig::default(),
        }
    }

    /// Builds a client from the base URL, session cookie, timeout and retry
    /// settings in `config`. The per-fetch deadline itself is enforced by the
    /// crawl.
    pub fn from_config(config: &PortalConfig) -> Result<Self, PortalError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            PortalError::InvalidInput(
                "no portal base URL configured (set base_url or SCHOOLPORTAL_BASE_URL)"
                    .to_string(),
            )
        })?;
        let mut inner = Client::new(&validate_base_url(base_url)?)
            .with_timeout(config.fetch_timeout().saturating_add(TRANSPORT_GRACE));
        if let Some(cookie) = config.session_cookie.as_deref() {
            inner = inner.with_session_cookie(&validate_session_cookie(cookie)?);
        }
        Ok(Self::new(inner).with_retry_config(RetryConfig::from_config(config)))
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn api(&self) -> &Client {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, PortalError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PortalError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_transient() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fetches one page's markup, retrying transient failures.
    pub async fn fetch_page(&self, url: &str) -> Result<String, PortalError> {
        self.with_retry(url, || async { Ok(self.inner.fetch_html(url).await?) })
            .await
    }
}

impl PageFetcher for PortalClient {
    async fn fetch(&self, url: &str) -> Result<String, PortalError> {
        self.fetch_page(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let retry = RetryConfig {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 3000,
        };
        let first = retry.delay_for_attempt(1).as_millis();
        assert!((800..=1200).contains(&first));
        let second = retry.delay_for_attempt(2).as_millis();
        assert!((1600..=2400).contains(&second));
        let capped = retry.delay_for_attempt(10).as_millis();
        assert!((2400..=3600).contains(&capped));
    }

    #[test]
    fn from_config_requires_base_url() {
        let config = PortalConfig::default();
        assert!(matches!(
            PortalClient::from_config(&config),
            Err(PortalError::InvalidInput(_))
        ));
    }

    #[test]
    fn from_config_rejects_bad_cookie() {
        let config = PortalConfig {
            base_url: Some("https://portal.example.org/".to_string()),
            session_cookie: Some("a=b\nc".to_string()),
            ..PortalConfig::default()
        };
        assert!(PortalClient::from_config(&config).is_err());
    }

    #[test]
    fn from_config_normalizes_base_url() {
        let config = PortalConfig {
            base_url: Some("https://portal.example.org/".to_string()),
            retry_max: 2,
            ..PortalConfig::default()
        };
        let client = PortalClient::from_config(&config).unwrap();
        assert_eq!(client.api().base_url(), "https://portal.example.org");
        assert_eq!(client.retry.max_retries, 2);
    }

    #[test]
    fn from_config_outlasts_long_fetch_timeout() {
        let config = PortalConfig {
            base_url: Some("https://portal.example.org".to_string()),
            fetch_timeout_secs: 90,
            ..PortalConfig::default()
        };
        let client = PortalClient::from_config(&config).unwrap();
        assert_eq!(client.api().timeout(), Duration::from_secs(95));
        assert!(client.api().timeout() > config.fetch_timeout());
    }
}
