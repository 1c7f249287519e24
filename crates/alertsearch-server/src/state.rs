//! Shared state for the webhook server.

use std::time::Duration;

use alertsearch_store::DocumentStore;
use alertsearch_webhook::IndexTemplate;
use chrono::{DateTime, Utc};

use crate::config::DEFAULT_BODY_TIMEOUT;
use crate::metrics::MetricsRegistry;

/// Source of the receipt instant stamped on each notification.
pub type Clock = fn() -> DateTime<Utc>;

/// State shared by all request handlers.
///
/// Nothing in here is mutated after startup apart from the atomic counters.
#[derive(Debug)]
pub struct AppState<S> {
    store: S,
    index_template: IndexTemplate,
    metrics: MetricsRegistry,
    clock: Clock,
    body_timeout: Duration,
}

impl<S: DocumentStore> AppState<S> {
    /// Create state around a connected store.
    pub fn new(store: S, index_template: IndexTemplate) -> Self {
        Self {
            store,
            index_template,
            metrics: MetricsRegistry::new(),
            clock: Utc::now,
            body_timeout: DEFAULT_BODY_TIMEOUT,
        }
    }

    /// Replace the clock used for receipt timestamps and index names.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the limit on reading a request body.
    #[must_use]
    pub const fn with_body_timeout(mut self, timeout: Duration) -> Self {
        self.body_timeout = timeout;
        self
    }

    /// Get the document store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Get the index template.
    pub const fn index_template(&self) -> &IndexTemplate {
        &self.index_template
    }

    /// Get the metrics registry.
    pub const fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Get the limit on reading a request body.
    pub const fn body_timeout(&self) -> Duration {
        self.body_timeout
    }

    /// Current receipt instant.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
