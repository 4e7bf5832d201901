//! Client Error Types

use thiserror::Error;

/// Errors returned by the backend API client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Request never completed (connection refused, DNS, aborted, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Response body was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(String),

    /// Backend answered with `success: false`
    #[error("{message}")]
    Backend {
        status: Option<u16>,
        message: String,
        details: Vec<String>,
    },
}

impl ClientError {
    /// Transport and parse failures are both reported as connection errors
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Parse(_))
    }

    /// Backend-provided message, if the backend answered at all
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Backend { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => *status,
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::Backend {
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Parse(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// Result type for API operations
pub type ClientResult<T> = Result<T, ClientError>;
