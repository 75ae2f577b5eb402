//! HTTP client for the legacy school portal.

use std::time::Duration;

use url::Url;

use crate::{query::Query, user_agent::get_user_agent, Error};

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for portal pages.
///
/// Sends requests with browser-like headers and a randomized user agent, and
/// attaches the session cookie of an already authenticated browser context.
/// Each request builds a fresh `reqwest::Client`.
#[derive(Clone)]
pub struct Client {
    /// Base URL of the portal, without a trailing slash.
    base_url: String,
    /// Raw `Cookie` header value for the authenticated session.
    session_cookie: Option<String>,
    timeout: Duration,
}

impl Client {
    /// Creates a client for the portal at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Attaches a session cookie to every request.
    pub fn with_session_cookie(mut self, cookie: &str) -> Self {
        self.session_cookie = Some(cookie.to_string());
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the absolute URL of a portal page with the query's parameters.
    pub fn page_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}{}", self.base_url, path))
        })?;
        Ok(query.add_to_url(&url))
    }

    /// Builds the absolute URL of a portal page without parameters.
    pub fn plain_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_url, path).as_str())
            .map_err(|_| Error::InvalidUrl(format!("{}{}", self.base_url, path)))
    }

    /// Fetches a page and returns its markup.
    pub async fn fetch_html(&self, url: &str) -> Result<String, Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let mut request = client
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-AU,en;q=0.9")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache");
        if let Some(cookie) = &self.session_cookie {
            request = request.header("cookie", cookie);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get page {}: {}", url, e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!("Page {} returned status {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
