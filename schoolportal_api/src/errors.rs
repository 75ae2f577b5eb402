//! Error types for the portal and sync clients.

/// Errors that can occur when talking to the portal or the sync endpoint.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or unreadable response).
    #[error("Request failed")]
    RequestFailed,
    /// A page or endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The server returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::RequestFailed => true,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Error::InvalidUrl(_) => false,
        }
    }
}
