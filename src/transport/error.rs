//! Error types for transport operations.

use thiserror::Error;

/// Error type for a single HTTP call.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request did not complete within the configured timeout and was aborted.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (bad URL, bad multipart part, etc.).
    ///
    /// This indicates a programming or configuration error rather than
    /// a transient failure.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Outcome of one failed attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The HTTP call itself failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The platform answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    NonSuccessStatus {
        /// Response status code
        status: http::StatusCode,
        /// Response body, parsed best-effort
        body: serde_json::Value,
    },
}

/// Error returned by the retrying transport once it gives up.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform rejected the request with a terminal status, or kept
    /// returning a retryable status until attempts ran out.
    #[error("HTTP {status} after {attempts} attempt(s): {body}")]
    Status {
        /// Last response status code
        status: http::StatusCode,
        /// Last response body, parsed best-effort
        body: serde_json::Value,
        /// Number of attempts made
        attempts: u32,
    },

    /// Timeout or connection failure on the last attempt.
    #[error("Request failed after {attempts} attempt(s): {source}")]
    Network {
        /// Number of attempts made
        attempts: u32,
        /// Last underlying failure
        #[source]
        source: HttpError,
    },

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The access token cannot be carried in an `Authorization` header.
    #[error("Access token is not a valid header value")]
    InvalidCredential(#[source] http::header::InvalidHeaderValue),

    /// The base URL and path do not form a valid endpoint.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The rejected endpoint string
        endpoint: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl TransportError {
    /// Converts the last attempt failure into the error surfaced to callers.
    pub(crate) fn from_attempt(error: AttemptError, attempts: u32) -> Self {
        match error {
            AttemptError::Http(source) => Self::Network { attempts, source },
            AttemptError::NonSuccessStatus { status, body } => Self::Status {
                status,
                body,
                attempts,
            },
        }
    }

    /// Returns the HTTP status if the platform answered.
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns how many attempts were made, if any call was issued.
    #[must_use]
    pub const fn attempts(&self) -> Option<u32> {
        match self {
            Self::Status { attempts, .. } | Self::Network { attempts, .. } => Some(*attempts),
            Self::Encode(_) | Self::InvalidCredential(_) | Self::InvalidEndpoint { .. } => None,
        }
    }
}
