//! Time-bucketed index names.
//!
//! A template such as `alertmanager-%y.%m` resolves to
//! `alertmanager-2024.03` for any instant in March 2024. Supported
//! placeholders:
//!
//! | Placeholder | Expands to |
//! |-------------|------------|
//! | `%y` | 4-digit year |
//! | `%m` | 2-digit month, zero-padded |
//! | `%d` | 2-digit day of month, zero-padded |
//!
//! Calendar fields are taken in UTC, the same frame as `@timestamp`.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};

/// The default index template.
pub const DEFAULT_INDEX_TEMPLATE: &str = "alertmanager-%y.%m";

const PLACEHOLDERS: [&str; 3] = ["%y", "%m", "%d"];

/// A configured index name template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexTemplate(String);

impl IndexTemplate {
    /// Creates a template from its configured string.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Returns the raw template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the template contains at least one date placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        PLACEHOLDERS.iter().any(|p| self.0.contains(p))
    }

    /// Resolves the template against `at`.
    #[must_use]
    pub fn resolve(&self, at: DateTime<Utc>) -> String {
        self.0
            .replace("%y", &format!("{:04}", at.year()))
            .replace("%m", &format!("{:02}", at.month()))
            .replace("%d", &format!("{:02}", at.day()))
    }
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_TEMPLATE)
    }
}

impl fmt::Display for IndexTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndexTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for IndexTemplate {
    fn from(template: String) -> Self {
        Self(template)
    }
}
