//! Error types for the Spotify Web API.

use thiserror::Error;

/// Main error type for all Spotify operations.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Link, URI or ID could not be understood.
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Missing or rejected client credentials.
    #[error("Bad credentials: {0}")]
    BadCredentials(String),

    /// The user-consent flow failed (denied, state mismatch, or timed out).
    #[error("User consent failed: {0}")]
    UserConsent(String),

    /// The operation is not supported by the web API.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A search produced no usable results.
    #[error("No results: {0}")]
    NoResults(String),

    /// Too many requests - rate limited past the retry budget.
    #[error("Quota exceeded: too many requests")]
    QuotaExceeded,

    /// Non-success response from the web API.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the API.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for Spotify operations.
pub type Result<T> = std::result::Result<T, SpotifyError>;
