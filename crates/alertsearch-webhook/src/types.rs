//! Alertmanager webhook payload types.
//!
//! The JSON field names follow the Alertmanager webhook receiver format
//! (`version` 4). Every field is optional on the wire: missing values and
//! explicit `null`s decode to empty maps, empty strings or `None`. Alert
//! times keep the UTC offset the sender used.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WebhookError};

/// The status of an alert or of a whole notification group.
///
/// Values other than `firing` and `resolved` are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// At least one alert is firing.
    Firing,
    /// All alerts are resolved.
    Resolved,
    /// Any other status string.
    #[serde(untagged)]
    Other(String),
}

impl AlertStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
            Self::Other(status) => status,
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single alert inside a webhook notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Annotations attached to the alert.
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: HashMap<String, String>,
    /// When the alert ended (Alertmanager sends the zero time while firing).
    #[serde(
        rename = "endsAt",
        default,
        serialize_with = "serialize_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub ends_at: Option<DateTime<FixedOffset>>,
    /// URL of the rule that generated the alert.
    #[serde(
        rename = "generatorURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generator_url: Option<String>,
    /// Labels identifying the alert.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
    /// When the alert started firing.
    #[serde(
        rename = "startsAt",
        default,
        serialize_with = "serialize_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub starts_at: Option<DateTime<FixedOffset>>,
    /// Firing or resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    /// Alertmanager's fingerprint of the label set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Alert {
    /// Returns true if the alert is currently firing.
    #[must_use]
    pub fn is_firing(&self) -> bool {
        self.status == Some(AlertStatus::Firing)
    }
}

/// One webhook delivery from Alertmanager.
///
/// Built by [`crate::decode_notification`], which also stamps the receipt
/// timestamp. The value is not mutated after that point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The alerts in this notification.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
    /// Annotations common to all alerts.
    #[serde(
        rename = "commonAnnotations",
        default,
        deserialize_with = "null_as_default"
    )]
    pub common_annotations: HashMap<String, String>,
    /// Labels common to all alerts.
    #[serde(rename = "commonLabels", default, deserialize_with = "null_as_default")]
    pub common_labels: HashMap<String, String>,
    /// Link back to the sending Alertmanager.
    #[serde(rename = "externalURL", default, deserialize_with = "null_as_default")]
    pub external_url: String,
    /// Labels the group was formed by.
    #[serde(rename = "groupLabels", default, deserialize_with = "null_as_default")]
    pub group_labels: HashMap<String, String>,
    /// Name of the Alertmanager receiver.
    #[serde(default, deserialize_with = "null_as_default")]
    pub receiver: String,
    /// Overall status of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    /// Webhook protocol version.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    /// Key identifying the alert group.
    #[serde(rename = "groupKey", default, deserialize_with = "null_as_default")]
    pub group_key: String,
    /// Number of alerts Alertmanager left out of this payload.
    #[serde(
        rename = "truncatedAlerts",
        default,
        deserialize_with = "null_as_default"
    )]
    pub truncated_alerts: u64,
    /// When this notification was received, RFC3339.
    #[serde(rename = "@timestamp", default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

impl Notification {
    /// Returns the number of firing alerts.
    #[must_use]
    pub fn firing_count(&self) -> usize {
        self.alerts.iter().filter(|a| a.is_firing()).count()
    }

    /// Serializes the notification into the JSON document sent to the store.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Encode` if serialization fails.
    pub fn to_document(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(WebhookError::Encode)
    }
}

/// Writes an alert time as RFC3339 in its original offset, `Z` for UTC.
fn serialize_instant<S>(
    at: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match at {
        Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        None => serializer.serialize_none(),
    }
}

/// Decodes a field where JSON `null` means "use the default".
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
