//! Outcome counters for the webhook endpoint.
//!
//! Three label-free counters, exported in the OpenMetrics text format:
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | `alertmanager2es_alerts_received_total` | every request that reached the handler |
//! | `alertmanager2es_alerts_invalid_total` | every rejected request |
//! | `alertmanager2es_alerts_successful_total` | every request whose document was stored |
//!
//! # Example
//!
//! ```rust
//! use alertsearch_server::metrics::MetricsRegistry;
//!
//! let registry = MetricsRegistry::new();
//! registry.outcomes().inc_received();
//! registry.outcomes().inc_successful();
//!
//! let output = registry.encode();
//! assert!(output.contains("alertmanager2es_alerts_received_total 1"));
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

/// Counters recording the outcome of each webhook request.
#[derive(Clone, Debug, Default)]
pub struct OutcomeCounters {
    received: Counter,
    invalid: Counter,
    successful: Counter,
}

impl OutcomeCounters {
    /// Creates the counters and registers them with the given registry.
    fn new(registry: &mut Registry) -> Self {
        let counters = Self::default();

        registry.register(
            "alertmanager2es_alerts_received",
            "alertmanager2es received alerts",
            counters.received.clone(),
        );
        registry.register(
            "alertmanager2es_alerts_invalid",
            "alertmanager2es invalid alerts",
            counters.invalid.clone(),
        );
        registry.register(
            "alertmanager2es_alerts_successful",
            "alertmanager2es successful stored alerts",
            counters.successful.clone(),
        );

        counters
    }

    /// Counts a request that reached the handler.
    pub fn inc_received(&self) {
        self.received.inc();
    }

    /// Counts a rejected request.
    pub fn inc_invalid(&self) {
        self.invalid.inc();
    }

    /// Counts a request whose document was stored.
    pub fn inc_successful(&self) {
        self.successful.inc();
    }

    /// Returns the received count.
    #[must_use]
    pub fn received(&self) -> u64 {
        self.received.get()
    }

    /// Returns the invalid count.
    #[must_use]
    pub fn invalid(&self) -> u64 {
        self.invalid.get()
    }

    /// Returns the successful count.
    #[must_use]
    pub fn successful(&self) -> u64 {
        self.successful.get()
    }
}

/// Registry holding the outcome counters.
#[derive(Clone, Debug)]
pub struct MetricsRegistry {
    registry: Arc<RwLock<Registry>>,
    outcomes: OutcomeCounters,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    /// Creates a registry with all counters registered at zero.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let outcomes = OutcomeCounters::new(&mut registry);

        Self {
            registry: Arc::new(RwLock::new(registry)),
            outcomes,
        }
    }

    /// Returns the outcome counters.
    #[must_use]
    pub const fn outcomes(&self) -> &OutcomeCounters {
        &self.outcomes
    }

    /// Encodes all metrics in the OpenMetrics text format.
    #[must_use]
    pub fn encode(&self) -> String {
        let registry = self.registry.read();
        let mut buffer = String::new();
        if encode(&mut buffer, &registry).is_err() {
            tracing::error!("failed to encode metrics");
            return String::new();
        }
        buffer
    }

    /// Returns the Content-Type header value for [`encode`](Self::encode) output.
    #[must_use]
    pub const fn content_type() -> &'static str {
        "application/openmetrics-text; version=1.0.0; charset=utf-8"
    }
}
