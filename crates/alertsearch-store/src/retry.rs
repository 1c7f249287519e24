//! Startup connection establishment with exponential backoff.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::client::{DocumentStore, OpenSearchClient};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Default number of retries after the first probe.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Retry budget for the startup liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `max_retries + 1` probes in total.
    pub max_retries: u32,
    /// Delay after the first failure. Doubles after every further failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and a one second base delay.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Sets the base delay.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Total number of probes this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failed attempt `attempt` (zero-based): `base * 2^attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Probes `store` until it answers, backing off between failures.
///
/// Returns the store once a probe succeeds. No wait follows the final failed
/// attempt.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` with the last probe error if every
/// attempt allowed by `policy` fails.
pub async fn establish<S: DocumentStore>(store: S, policy: &RetryPolicy) -> Result<S> {
    let mut attempt = 0;

    loop {
        let err = match store.probe().await {
            Ok(()) => {
                info!(attempts = attempt + 1, "connected to store");
                return Ok(store);
            }
            Err(e) => e,
        };

        if attempt >= policy.max_retries {
            warn!(attempts = attempt + 1, error = %err, "giving up on store connection");
            return Err(StoreError::Unavailable {
                attempts: attempt + 1,
                source: Box::new(err),
            });
        }

        let delay = policy.delay_for_attempt(attempt);
        info!(
            attempt,
            max_retries = policy.max_retries,
            delay = ?delay,
            error = %err,
            "failed to connect to store, retrying"
        );
        sleep(delay).await;
        attempt += 1;
    }
}

/// Builds an [`OpenSearchClient`] and waits for the cluster to answer.
///
/// Client construction errors are returned immediately; only the liveness
/// probe is retried.
///
/// # Errors
///
/// Returns the construction error, or `StoreError::Unavailable` if the
/// cluster never answered within the retry budget.
pub async fn connect(config: &StoreConfig, policy: &RetryPolicy) -> Result<OpenSearchClient> {
    let client = OpenSearchClient::new(config)?;
    establish(client, policy).await
}
