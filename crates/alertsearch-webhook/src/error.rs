//! Error types for the alertsearch-webhook crate.

use thiserror::Error;

/// Errors that can occur while validating an inbound webhook notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request carried no bytes at all.
    #[error("got empty request body")]
    EmptyPayload,

    /// The payload is not well-formed JSON of the expected shape.
    #[error("failed to decode notification: {0}")]
    Decode(#[source] serde_json::Error),

    /// The sender speaks a webhook version other than the supported one.
    #[error(
        "do not understand webhook version {version:?}, only version {supported:?} is supported",
        supported = crate::SUPPORTED_WEBHOOK_VERSION
    )]
    UnsupportedVersion {
        /// The version string found in the payload.
        version: String,
    },

    /// The notification could not be serialized into a store document.
    #[error("failed to encode notification: {0}")]
    Encode(#[source] serde_json::Error),
}

impl WebhookError {
    /// Returns true if the error was caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPayload | Self::Decode(_) | Self::UnsupportedVersion { .. }
        )
    }
}

/// Result type for webhook operations.
pub type Result<T> = std::result::Result<T, WebhookError>;
