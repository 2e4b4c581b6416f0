//! Analytics API error types
//!
//! Every failure talking to the analytics API lands in one of two buckets:
//! transport problems (the request never produced a usable response) and
//! payload problems (a response arrived but cannot be trusted). Neither is
//! fatal; callers keep their previous data and try again next cycle.

use thiserror::Error;

/// Errors that can occur when querying the analytics API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Could not connect to the API host
    #[error("Analytics API unavailable")]
    Unavailable,

    /// Request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx HTTP status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was empty or whitespace
    #[error("Empty response body")]
    EmptyBody,

    /// Response body contains the literal `NaN` token
    #[error("Response contains NaN values")]
    NanSentinel,

    /// Response body is not valid JSON
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not the shape the endpoint documents
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The API answered with an `{"error": ...}` object
    #[error("API reported: {0}")]
    Reported(String),
}

impl ApiError {
    /// Map a reqwest failure onto the transport variants
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    /// Whether the request itself failed (as opposed to its payload)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Unavailable | ApiError::Timeout | ApiError::Request(_) | ApiError::Status { .. }
        )
    }
}

/// Result type alias for analytics API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "API error 502: bad gateway");
        assert_eq!(ApiError::NanSentinel.to_string(), "Response contains NaN values");
    }

    #[test]
    fn test_classification() {
        assert!(ApiError::Timeout.is_transport());
        assert!(ApiError::Status { status: 500, message: String::new() }.is_transport());
        assert!(!ApiError::NanSentinel.is_transport());
        assert!(!ApiError::EmptyBody.is_transport());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Malformed(_)));
    }
}
