//! Route configuration for the webhook server.

use std::sync::Arc;

use alertsearch_store::DocumentStore;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_metrics, healthz, receive_webhook};
use crate::state::AppState;

/// Create the webhook server router.
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/webhook", post(receive_webhook::<S>))
        .route("/healthz", get(healthz))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
