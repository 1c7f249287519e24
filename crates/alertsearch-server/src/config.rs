//! Webhook server configuration.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use alertsearch_webhook::IndexTemplate;

use crate::error::{ServerError, ServerResult};

/// Default listen address, in the `:port` form accepted by [`parse_bind_addr`].
pub const DEFAULT_BIND: &str = ":9097";

/// Default limit on reading one request body.
pub const DEFAULT_BODY_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for the webhook server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// Limit on reading a webhook body. The store write is not covered; it is
    /// bounded by the store client's own timeout.
    pub body_timeout: Duration,
    /// Template used to name the index each document is written to.
    pub index_template: IndexTemplate,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9097)),
            body_timeout: DEFAULT_BODY_TIMEOUT,
            index_template: IndexTemplate::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration with the specified bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Self::default()
        }
    }

    /// Set the body read timeout.
    #[must_use]
    pub const fn with_body_timeout(mut self, timeout: Duration) -> Self {
        self.body_timeout = timeout;
        self
    }

    /// Set the index template.
    #[must_use]
    pub fn with_index_template(mut self, template: impl Into<IndexTemplate>) -> Self {
        self.index_template = template.into();
        self
    }
}

/// Parses a listen address.
///
/// Accepts `host:port`, `ip:port`, `[v6]:port` and `:port`. The `:port` form
/// binds `0.0.0.0` and so listens on IPv4 only; use `[::]:port` to accept
/// IPv6 as well.
///
/// # Errors
///
/// Returns `ServerError::InvalidBindAddress` if the address does not parse or
/// the host does not resolve.
pub fn parse_bind_addr(bind: &str) -> ServerResult<SocketAddr> {
    let bind = bind.trim();
    let invalid = || ServerError::InvalidBindAddress(bind.to_string());

    if let Some(port) = bind.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|_| invalid())?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    if let Ok(addr) = bind.parse() {
        return Ok(addr);
    }

    bind.to_socket_addrs()
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)
}
