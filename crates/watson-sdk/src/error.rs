//! Error types for the Watson SDK.
//!
//! Two layers: [`ValidationError`] is raised while building request options,
//! before anything touches the network. [`ClientError`] covers transport
//! failures and non-success responses from the service.

use std::time::Duration;

/// A request object could not be constructed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was never set.
    #[error("{field} cannot be null")]
    Missing {
        /// Snake-case name of the field
        field: &'static str,
    },

    /// A required field was set to an empty string or list.
    #[error("{field} cannot be empty")]
    Empty {
        /// Snake-case name of the field
        field: &'static str,
    },

    /// A field holds a value the service will never accept.
    #[error("{field}: {message}")]
    Invalid {
        /// Field (or option group) that failed validation
        field: String,
        /// Why it was rejected
        message: String,
    },
}

impl ValidationError {
    /// Create an invalid-value error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid { field: field.into(), message: message.into() }
    }

    /// Name of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::Empty { field } => field,
            Self::Invalid { field, .. } => field.as_str(),
        }
    }
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Options failed validation before the request was sent
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Token exchange with the IAM service failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The service URL cannot carry path segments
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Credentials rejected (401 response)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from API
        message: String,
    },

    /// Access forbidden (403 or 406 response)
    #[error("Forbidden ({status}): {message}")]
    Forbidden {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Resource already exists or was modified concurrently (409 response)
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message from API
        message: String,
    },

    /// Request body too large (413 response)
    #[error("Request too large: {message}")]
    RequestTooLarge {
        /// Error message from API
        message: String,
    },

    /// Unsupported content type (415 response)
    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType {
        /// Error message from API
        message: String,
    },

    /// Rate limited by the service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (500 or 503 response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status code the service answered with, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::RequestTooLarge { .. } => Some(413),
            Self::UnsupportedMediaType { .. } => Some(415),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout(_) | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::Missing { field: "value" }.to_string(), "value cannot be null");
        assert_eq!(
            ValidationError::Empty { field: "workspace_id" }.to_string(),
            "workspace_id cannot be empty"
        );
        let err = ValidationError::invalid("version", "must be a YYYY-MM-DD date");
        assert_eq!(err.field(), "version");
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(ClientError::server(503, "Service unavailable").is_retryable());

        assert!(!ClientError::not_found("workspace").is_retryable());
        assert!(!ClientError::bad_request("invalid query").is_retryable());
        assert!(!ClientError::unauthorized("bad key").is_retryable());
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("collection");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_client_error_status() {
        assert_eq!(ClientError::not_found("x").status(), Some(404));
        assert_eq!(ClientError::Forbidden { status: 406, message: String::new() }.status(), Some(406));
        assert_eq!(ClientError::auth("no token").status(), None);
    }

    #[test]
    fn test_validation_converts_into_client_error() {
        let err: ClientError = ValidationError::Missing { field: "entity" }.into();
        assert!(err.to_string().contains("entity cannot be null"));
    }
}
