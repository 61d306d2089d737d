//! Error types for microservice clients.

use thiserror::Error;

/// Result type alias using `ClientError`.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by the users/farms service clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request could not be completed (connect, timeout, etc.).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with an unexpected HTTP status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: reqwest::StatusCode,
    },

    /// The response body did not match the documented shape.
    #[error("could not decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decode failure detail.
        message: String,
    },
}
