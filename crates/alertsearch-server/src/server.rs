//! Webhook server implementation.

use std::future::Future;
use std::sync::Arc;

use alertsearch_store::DocumentStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::routes::create_router;
use crate::state::AppState;

/// HTTP server accepting Alertmanager notifications.
#[derive(Debug)]
pub struct AlertServer<S> {
    config: ServerConfig,
    state: Arc<AppState<S>>,
}

impl<S: DocumentStore + 'static> AlertServer<S> {
    /// Create a server around an already connected store.
    pub fn new(config: ServerConfig, store: S) -> Self {
        let state = Arc::new(
            AppState::new(store, config.index_template.clone())
                .with_body_timeout(config.body_timeout),
        );
        Self { config, state }
    }

    /// Get the server configuration.
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared state for external access.
    pub fn state(&self) -> Arc<AppState<S>> {
        self.state.clone()
    }

    /// Create the router without starting the server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    /// Start the server and listen for connections.
    ///
    /// Runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self) -> ServerResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server stops accepting connections when `shutdown` completes and
    /// returns once in-flight requests have finished.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr, e))?;
        let local_addr = listener.local_addr().unwrap_or(addr);

        info!(addr = %local_addr, index = %self.config.index_template, "listening for webhooks");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("server shut down");
        Ok(())
    }
}
