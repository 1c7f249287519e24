//! Command-line and environment options.
//!
//! Every flag can also be set through the environment variable named beside
//! it. The effective options are logged at startup as JSON, without the
//! password.

use std::time::Duration;

use alertsearch_store::{
    DEFAULT_ADDRESS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, RetryPolicy, StoreConfig,
};
use alertsearch_webhook::DEFAULT_INDEX_TEMPLATE;
use clap::{Args, Parser};
use serde::Serialize;

use crate::config::{DEFAULT_BIND, ServerConfig, parse_bind_addr};
use crate::error::ServerResult;

/// Alertmanager webhook receiver that stores notifications in OpenSearch.
#[derive(Parser, Debug, Clone, Serialize)]
#[command(name = "alertsearch")]
#[command(version, about, long_about = None)]
pub struct Opts {
    /// Logging options.
    #[command(flatten)]
    pub logger: LoggerOpts,

    /// OpenSearch options.
    #[command(flatten)]
    pub opensearch: OpenSearchOpts,

    /// HTTP server options.
    #[command(flatten)]
    pub server: ServerOpts,
}

/// Logging options.
#[derive(Args, Debug, Clone, Default, Serialize)]
pub struct LoggerOpts {
    /// Debug mode: trace level with source locations.
    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    /// Verbose mode: debug level.
    #[arg(short, long, env = "VERBOSE")]
    pub verbose: bool,

    /// Log as JSON lines.
    #[arg(long = "log.json", env = "LOG_JSON")]
    pub json: bool,
}

/// OpenSearch connection options.
#[derive(Args, Debug, Clone, Serialize)]
pub struct OpenSearchOpts {
    /// Node addresses; space separated in the environment.
    #[arg(
        long = "opensearch.address",
        env = "OPENSEARCH_ADDRESS",
        value_delimiter = ' ',
        default_value = DEFAULT_ADDRESS
    )]
    pub addresses: Vec<String>,

    /// Basic-auth username.
    #[arg(long = "opensearch.username", env = "OPENSEARCH_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password.
    #[arg(
        long = "opensearch.password",
        env = "OPENSEARCH_PASSWORD",
        hide_env_values = true
    )]
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Index name template; %y, %m and %d expand to the receipt date (UTC).
    #[arg(
        long = "opensearch.index",
        env = "OPENSEARCH_INDEX",
        default_value = DEFAULT_INDEX_TEMPLATE
    )]
    pub index: String,

    /// Proxy URL for store traffic.
    #[arg(long = "opensearch.proxy", env = "OPENSEARCH_PROXY")]
    pub proxy: Option<String>,

    /// Connection retries at startup.
    #[arg(
        long = "opensearch.max-retries",
        env = "OPENSEARCH_MAX_RETRIES",
        default_value_t = DEFAULT_MAX_RETRIES
    )]
    pub max_retries: u32,

    /// Request timeout in seconds.
    #[arg(
        long = "opensearch.timeout",
        env = "OPENSEARCH_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT.as_secs()
    )]
    pub timeout: u64,
}

/// HTTP server options.
#[derive(Args, Debug, Clone, Serialize)]
pub struct ServerOpts {
    /// Listen address; `:port` listens on all IPv4 interfaces.
    #[arg(long = "bind", env = "SERVER_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,
}

impl Opts {
    /// Builds the store configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an address or the proxy is not a valid URL.
    pub fn store_config(&self) -> alertsearch_store::Result<StoreConfig> {
        let os = &self.opensearch;
        let mut config = StoreConfig::new(os.addresses.iter().filter(|a| !a.is_empty()))?
            .with_credentials(os.username.clone().unwrap_or_default(), os.password.clone())
            .with_timeout(Duration::from_secs(os.timeout));
        if let Some(proxy) = os.proxy.as_deref().filter(|p| !p.is_empty()) {
            config = config.with_proxy(proxy)?;
        }
        Ok(config)
    }

    /// Builds the startup retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.opensearch.max_retries)
    }

    /// Builds the HTTP server configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::InvalidBindAddress` if the bind address is invalid.
    pub fn server_config(&self) -> ServerResult<ServerConfig> {
        let bind_addr = parse_bind_addr(&self.server.bind)?;
        Ok(ServerConfig::new(bind_addr).with_index_template(self.opensearch.index.as_str()))
    }

    /// Renders the options as JSON for the startup log.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
