//! Document store access for alertsearch.
//!
//! This crate owns everything the ingestion pipeline knows about its backing
//! store:
//!
//! - [`DocumentStore`]: probe and single-document write, the seam the HTTP
//!   layer is generic over
//! - [`OpenSearchClient`]: the `reqwest`-based implementation
//! - [`StoreConfig`]: addresses, basic-auth credentials, proxy and timeout
//! - [`connect`] / [`establish`]: the startup liveness probe, retried with
//!   exponential backoff (1s, 2s, 4s, ...) under a [`RetryPolicy`]
//!
//! # Example
//!
//! ```rust,no_run
//! use alertsearch_store::{connect, DocumentStore, RetryPolicy, StoreConfig};
//!
//! # async fn run() -> alertsearch_store::Result<()> {
//! let config = StoreConfig::new(["http://localhost:9200"])?
//!     .with_credentials("admin", Some("admin".to_string()));
//! let client = connect(&config, &RetryPolicy::default()).await?;
//!
//! client
//!     .index_document("alertmanager-2024.03", br#"{"version":"4"}"#.to_vec())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod retry;

pub use client::{DocumentStore, OpenSearchClient};
pub use config::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT, StoreConfig};
pub use error::{Result, StoreError};
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy, connect, establish};
