//! Error types for the alertsearch-store crate.

use thiserror::Error;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store configuration is unusable.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build store client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        /// The requested URL, credentials stripped.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The start of the response body.
        body: String,
    },

    /// The liveness probe kept failing until the retry budget ran out.
    #[error("store unavailable after {attempts} attempts: {source}")]
    Unavailable {
        /// How many probes were made.
        attempts: u32,
        /// The error from the last probe.
        source: Box<StoreError>,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
