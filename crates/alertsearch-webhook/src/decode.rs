//! Validation and transformation of raw webhook bodies.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Result, WebhookError};
use crate::types::Notification;

/// The only Alertmanager webhook version this receiver understands.
pub const SUPPORTED_WEBHOOK_VERSION: &str = "4";

/// Formats a receipt instant the way it is stored in `@timestamp`.
#[must_use]
pub fn format_receipt_timestamp(received_at: DateTime<Utc>) -> String {
    received_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Decodes raw request bytes into a [`Notification`] ready for storage.
///
/// The version check is strict string equality against
/// [`SUPPORTED_WEBHOOK_VERSION`]. On success `@timestamp` is overwritten with
/// `received_at`, whatever the sender put there.
///
/// # Errors
///
/// - `WebhookError::EmptyPayload` if `body` is empty
/// - `WebhookError::Decode` if `body` is not a JSON notification
/// - `WebhookError::UnsupportedVersion` if the version is not `"4"`
pub fn decode_notification(body: &[u8], received_at: DateTime<Utc>) -> Result<Notification> {
    if body.is_empty() {
        return Err(WebhookError::EmptyPayload);
    }

    let mut notification: Notification =
        serde_json::from_slice(body).map_err(WebhookError::Decode)?;

    if notification.version != SUPPORTED_WEBHOOK_VERSION {
        return Err(WebhookError::UnsupportedVersion {
            version: notification.version,
        });
    }

    notification.timestamp = format_receipt_timestamp(received_at);
    Ok(notification)
}
