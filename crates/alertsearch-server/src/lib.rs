//! # alertsearch-server
//!
//! HTTP receiver for Alertmanager webhook notifications. Each accepted
//! notification is stamped with its receipt time and written as one document
//! into a date-bucketed OpenSearch index.
//!
//! ## Example
//!
//! ```rust,no_run
//! use alertsearch_server::{AlertServer, ServerConfig};
//! use alertsearch_store::{connect, RetryPolicy, StoreConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = connect(&StoreConfig::default(), &RetryPolicy::default()).await?;
//! let config = ServerConfig::default().with_index_template("alertmanager-%y.%m.%d");
//!
//! AlertServer::new(config, store).serve().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/webhook` | POST | Store one Alertmanager notification |
//! | `/healthz` | GET | Liveness, always `Ok` |
//! | `/metrics` | GET | Outcome counters, OpenMetrics text |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use cli::Opts;
pub use config::{ServerConfig, parse_bind_addr};
pub use error::{IngestError, ServerError, ServerResult};
pub use metrics::MetricsRegistry;
pub use routes::create_router;
pub use server::AlertServer;
pub use state::AppState;
