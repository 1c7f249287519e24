//! HTTP request handlers.

use std::sync::Arc;

use alertsearch_store::DocumentStore;
use alertsearch_webhook::decode_notification;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use tokio::time::timeout;
use tracing::debug;

use crate::error::IngestError;
use crate::metrics::MetricsRegistry;
use crate::state::AppState;

/// Handle POST /webhook - store one Alertmanager notification.
///
/// Every request counts as received and then as either successful or invalid.
pub async fn receive_webhook<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Body,
) -> Response {
    let outcomes = state.metrics().outcomes();
    outcomes.inc_received();

    match ingest(&state, body).await {
        Ok(()) => {
            outcomes.inc_successful();
            StatusCode::OK.into_response()
        }
        Err(err) => {
            outcomes.inc_invalid();
            err.log();
            err.into_response()
        }
    }
}

async fn ingest<S: DocumentStore>(state: &AppState<S>, body: Body) -> Result<(), IngestError> {
    // Only the read is time-bounded; a started store write always runs to
    // completion so the request is counted either way.
    let body = timeout(state.body_timeout(), to_bytes(body, usize::MAX))
        .await
        .map_err(|_| IngestError::BodyRead("timed out reading request body".to_string()))?
        .map_err(|e| IngestError::BodyRead(e.to_string()))?;

    // One instant for both the document timestamp and the index bucket.
    let received_at = state.now();
    let notification = decode_notification(&body, received_at)?;
    let document = notification.to_document()?;
    let index = state.index_template().resolve(received_at);

    state
        .store()
        .index_document(&index, document)
        .await
        .map_err(IngestError::StoreWrite)?;

    debug!(
        index = %index,
        receiver = %notification.receiver,
        alerts = notification.alerts.len(),
        firing = notification.firing_count(),
        common_labels = ?notification.common_labels,
        "notification stored"
    );
    Ok(())
}

/// Handle GET /healthz - liveness, independent of the store.
pub async fn healthz() -> &'static str {
    "Ok"
}

/// Handle GET /metrics - OpenMetrics text exposition.
pub async fn get_metrics<S: DocumentStore>(State(state): State<Arc<AppState<S>>>) -> Response {
    (
        [(CONTENT_TYPE, MetricsRegistry::content_type())],
        state.metrics().encode(),
    )
        .into_response()
}
