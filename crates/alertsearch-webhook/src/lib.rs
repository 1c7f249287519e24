//! Alertmanager webhook notifications for alertsearch.
//!
//! `alertsearch-webhook` turns raw webhook request bodies into validated
//! [`Notification`] documents and names the time-bucketed index each document
//! is written to.
//!
//! # Example
//!
//! ```rust
//! use alertsearch_webhook::{decode_notification, IndexTemplate};
//! use chrono::{TimeZone, Utc};
//!
//! let received_at = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
//! let body = br#"{"version":"4","commonLabels":{"alertname":"X"}}"#;
//!
//! let notification = decode_notification(body, received_at).unwrap();
//! assert_eq!(notification.timestamp, "2024-03-15T10:00:00Z");
//!
//! let index = IndexTemplate::default().resolve(received_at);
//! assert_eq!(index, "alertmanager-2024.03");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decode;
pub mod error;
pub mod index;
pub mod types;

pub use decode::{SUPPORTED_WEBHOOK_VERSION, decode_notification, format_receipt_timestamp};
pub use error::{Result, WebhookError};
pub use index::{DEFAULT_INDEX_TEMPLATE, IndexTemplate};
pub use types::{Alert, AlertStatus, Notification};
