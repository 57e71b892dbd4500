//! Unified error types for the featured feed client.
//!
//! The cache itself is infallible; these errors come from the backend
//! collaborators that feed it.

/// Unified error type shared by the client crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty subject id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Backend base URL or derived endpoint could not be built.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response from the backend.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Backend request timed out.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Backend rejected the viewer's credentials.
    #[error("AUTH_ERROR: {0}")]
    AuthError(String),

    /// Backend response body could not be decoded.
    #[error("DECODE_FAILED: {0}")]
    DecodeFailed(String),

    /// Any other failure reported by a backend implementation.
    #[error("BACKEND_ERROR: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeFailed(err.to_string())
    }
}
