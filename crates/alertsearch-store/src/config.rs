//! Store connection configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Result, StoreError};

/// Default store address.
pub const DEFAULT_ADDRESS: &str = "http://localhost:9200";

/// Default per-request timeout for store calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the OpenSearch cluster.
#[derive(Clone)]
pub struct StoreConfig {
    /// Cluster node URLs. Requests rotate across them.
    pub addresses: Vec<Url>,
    /// Username for HTTP basic authentication.
    pub username: Option<String>,
    /// Password for HTTP basic authentication.
    pub password: Option<String>,
    /// Explicit proxy for all store traffic. The system proxy variables
    /// apply when unset.
    pub proxy: Option<Url>,
    /// Timeout applied to every store request.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration from one or more address strings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` if no address is given or an
    /// address is not an `http`/`https` URL.
    pub fn new<I, S>(addresses: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = addresses
            .into_iter()
            .map(|a| parse_address(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let config = Self {
            addresses,
            username: None,
            password: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets basic-auth credentials. An empty username disables authentication.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        let username = username.into();
        if username.is_empty() {
            self.username = None;
            self.password = None;
        } else {
            self.username = Some(username);
            self.password = password;
        }
        self
    }

    /// Routes store traffic through the given proxy.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` if `proxy` is not a URL.
    pub fn with_proxy(mut self, proxy: &str) -> Result<Self> {
        let url = Url::parse(proxy)
            .map_err(|e| StoreError::InvalidConfig(format!("invalid proxy '{proxy}': {e}")))?;
        self.proxy = Some(url);
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` if any value is unusable.
    pub fn validate(&self) -> Result<()> {
        if self.addresses.is_empty() {
            return Err(StoreError::InvalidConfig(
                "at least one store address is required".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(StoreError::InvalidConfig(
                "store timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            addresses: Url::parse(DEFAULT_ADDRESS).into_iter().collect(),
            username: None,
            password: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addresses: Vec<&str> = self.addresses.iter().map(Url::as_str).collect();
        f.debug_struct("StoreConfig")
            .field("addresses", &addresses)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_address(address: &str) -> Result<Url> {
    let url = Url::parse(address.trim())
        .map_err(|e| StoreError::InvalidConfig(format!("invalid address '{address}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(StoreError::InvalidConfig(format!(
            "address '{address}' must use http or https"
        )));
    }

    Ok(url)
}
