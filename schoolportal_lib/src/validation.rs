use chrono::NaiveDate;
use schoolportal_api::types::UserId;
use url::Url;

use crate::error::PortalError;

pub const MAX_COOKIE_LENGTH: usize = 4096;
pub const MAX_VIEW_LENGTH: usize = 32;

/// Validate a portal user id: ASCII digits only, non-zero.
pub fn validate_user_id(input: &str) -> Result<UserId, PortalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PortalError::InvalidInput(format!(
            "invalid user id '{}'. Expected digits only (e.g., 48213)",
            input
        )));
    }
    match trimmed.parse::<UserId>() {
        Ok(0) | Err(_) => Err(PortalError::InvalidInput(format!(
            "user id '{}' is out of range",
            trimmed
        ))),
        Ok(id) => Ok(id),
    }
}

/// Validate the portal base URL: absolute http(s) with a host. Returned
/// without a trailing slash.
pub fn validate_base_url(input: &str) -> Result<String, PortalError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        PortalError::InvalidInput(format!("invalid base URL '{}': {}", trimmed, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(PortalError::InvalidInput(format!(
            "base URL '{}' must be an http or https address",
            trimmed
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validate a session cookie header value. Control characters would let the
/// value break out of the `Cookie` header, so they are rejected, not stripped.
pub fn validate_session_cookie(input: &str) -> Result<String, PortalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PortalError::InvalidInput("session cookie is empty".to_string()));
    }
    if trimmed.len() > MAX_COOKIE_LENGTH {
        return Err(PortalError::InvalidInput(format!(
            "session cookie exceeds maximum length of {} bytes",
            MAX_COOKIE_LENGTH
        )));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(PortalError::InvalidInput(
            "session cookie contains control characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a classes-page view name such as `current` or `all`.
pub fn validate_view(input: &str) -> Result<String, PortalError> {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || trimmed.len() > MAX_VIEW_LENGTH
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PortalError::InvalidInput(format!(
            "invalid classes view '{}'. Expected a short word (e.g., current, all)",
            input
        )));
    }
    Ok(trimmed.to_lowercase())
}

pub fn validate_date(input: &str) -> Result<NaiveDate, PortalError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        PortalError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2025-03-15)",
            trimmed
        ))
    })
}
