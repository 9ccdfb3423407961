//! Error types for backend requests.

use thiserror::Error;

/// Errors that can occur when talking to the drift analytics backend.
///
/// The dashboard treats every variant the same way (log it, show it, let the
/// user try again), but the variants are kept apart so callers can tell
/// transient failures from permanent ones.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Backend answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// HTTP request failed for another reason.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether retrying the same request later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Connection(_) | ApiError::Timeout => true,
            ApiError::Status(code) => matches!(code, 408 | 429 | 500..=599),
            ApiError::Http(_) | ApiError::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::Connection("refused".into()).is_transient());
        assert!(ApiError::Status(503).is_transient());
        assert!(ApiError::Status(429).is_transient());
        assert!(!ApiError::Status(404).is_transient());
        assert!(!ApiError::Parse("eof".into()).is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::Status(502).to_string(), "API returned status 502");
        assert_eq!(ApiError::Timeout.to_string(), "Request timed out");
    }
}
