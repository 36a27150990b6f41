//! Structured error types for the data pipeline.

use thiserror::Error;

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and library contexts.
#[derive(Debug, Error)]
pub enum DataError {
    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// No stored response exists for the request.
    #[error("no cached response for request {key}")]
    CacheMiss { key: String },

    /// The live fetch failed and the cache held no fallback.
    #[error("fetch failed with no cached fallback")]
    FetchFailed {
        #[source]
        cause: Box<DataError>,
    },

    /// Malformed JSON or wrong field types in the payload.
    #[error("malformed response: {0}")]
    Decode(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("data error: {0}")]
    Other(String),
}
