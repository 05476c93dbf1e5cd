//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect error, timeout, body read).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API rejected the credential (HTTP 401/403).
    #[error("Not authorized (HTTP {status})")]
    Unauthorized { status: u16 },
    /// The base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// The body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl Error {
    /// Transient failures worth retrying: network errors, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::RequestFailed(_) => true,
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
