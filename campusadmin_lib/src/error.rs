//! Error types for the library layer.

use std::fmt;

use thiserror::Error;

/// Errors produced by the library layer outside the list fetch cycle:
/// upstream API failures and rejected operator input.
#[derive(Debug)]
pub enum AdminError {
    /// An error from the underlying API client.
    Api(campusadmin_api::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<campusadmin_api::Error> for AdminError {
    fn from(e: campusadmin_api::Error) -> Self {
        Self::Api(e)
    }
}

/// Failures of a list fetch cycle. All of them are recovered at the
/// controller boundary and turned into a [`StatusMessage`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Network, HTTP or parse failure. The previous page stays in place.
    #[error("Failed to load items: {message}")]
    FetchFailed { message: String },
    /// The body held no collection at any known path. The page degrades to empty.
    #[error("Unexpected response shape: {message}")]
    MalformedResponse { message: String },
    /// No usable credential. No request was sent.
    #[error("Sign-in required: {message}")]
    AuthRequired { message: String },
}

/// How loudly the UI should surface a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Blocking,
}

/// A user-visible status line produced from a [`ListError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl ListError {
    pub fn severity(&self) -> Severity {
        match self {
            ListError::MalformedResponse { .. } => Severity::Warning,
            ListError::FetchFailed { .. } => Severity::Error,
            ListError::AuthRequired { .. } => Severity::Blocking,
        }
    }

    pub fn status(&self) -> StatusMessage {
        StatusMessage {
            severity: self.severity(),
            text: self.to_string(),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
