//! Error types for the library layer.

use std::fmt;
use std::time::Duration;

use crate::config::ConfigError;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding configuration and input validation failures.
#[derive(Debug)]
pub enum PortalError {
    /// An error from the underlying HTTP client.
    Api(schoolportal_api::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// The configuration file or an override could not be used.
    Config(ConfigError),
    /// No user id was configured and none could be found on the landing page.
    MissingUserId,
    /// A page fetch did not complete in time.
    Timeout(Duration),
}

impl PortalError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Config(e) => write!(f, "Config error: {}", e),
            Self::MissingUserId => write!(
                f,
                "no user id configured and none found on the portal landing page"
            ),
            Self::Timeout(after) => write!(f, "request timed out after {:.1}s", after.as_secs_f64()),
        }
    }
}

impl std::error::Error for PortalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<schoolportal_api::Error> for PortalError {
    fn from(e: schoolportal_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ConfigError> for PortalError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(PortalError::Api(schoolportal_api::Error::RequestFailed).is_transient());
        assert!(PortalError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(PortalError::Api(schoolportal_api::Error::HttpStatus {
            status: 502,
            body: String::new(),
        })
        .is_transient());
        assert!(!PortalError::Api(schoolportal_api::Error::HttpStatus {
            status: 404,
            body: String::new(),
        })
        .is_transient());
        assert!(!PortalError::MissingUserId.is_transient());
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(
            PortalError::InvalidInput("bad".into()).to_string(),
            "Invalid input: bad"
        );
        assert_eq!(
            PortalError::Timeout(Duration::from_millis(1500)).to_string(),
            "request timed out after 1.5s"
        );
    }
}
