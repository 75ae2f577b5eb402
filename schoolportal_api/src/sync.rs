//! Client for the external sync endpoint that receives crawl results.

use std::time::Duration;

use serde::Serialize;

use crate::{client::truncate_body, user_agent::get_user_agent, Error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Posts crawl results as JSON to the sync endpoint.
///
/// The endpoint's JSON reply is returned untouched; it may carry a one-time
/// login token that only the caller knows how to use.
pub struct SyncClient {
    endpoint: String,
    bearer_token: Option<String>,
}

impl SyncClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    /// Submits `body` and returns the endpoint's reply (`Null` for an empty body).
    pub async fn submit<T: Serialize>(&self, body: &T) -> Result<serde_json::Value, Error> {
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let mut request = client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to submit sync payload: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read sync response: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&text);
            tracing::error!("Sync failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse sync response: {} | body: {}", e, truncate_body(&text));
            Error::RequestFailed
        })
    }
}
