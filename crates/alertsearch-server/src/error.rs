//! Error types for the webhook server.

use std::net::SocketAddr;

use alertsearch_store::StoreError;
use alertsearch_webhook::WebhookError;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    /// The bind address could not be understood.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Reasons a single webhook request is rejected.
///
/// Every variant maps to a plain-text HTTP response. Store failures are
/// answered with a fixed message; the store's own diagnostic is only logged.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The body stream could not be read.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The payload was empty, malformed or of the wrong version.
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// The document write was rejected or never reached the store.
    #[error("unable to insert document in opensearch")]
    StoreWrite(#[source] StoreError),
}

impl IngestError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Webhook(e) if !e.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Webhook(_) | Self::StoreWrite(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Logs the error, including the store diagnostic the response omits.
    pub fn log(&self) {
        match self {
            Self::StoreWrite(source) => {
                error!(error = %self, store_error = %source, "webhook rejected");
            }
            _ => error!(error = %self, "webhook rejected"),
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{self}\n"),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn empty_payload_is_bad_request() {
        let response = IngestError::from(WebhookError::EmptyPayload).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "got empty request body\n");
    }

    #[tokio::test]
    async fn unsupported_version_is_bad_request() {
        let err = IngestError::from(WebhookError::UnsupportedVersion {
            version: "3".to_string(),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains(r#"version "3""#));
    }

    #[tokio::test]
    async fn body_read_is_internal_error() {
        let response = IngestError::BodyRead("connection reset".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn store_write_hides_store_diagnostic() {
        let err = IngestError::StoreWrite(StoreError::Status {
            url: "http://os:9200/alerts/_doc".to_string(),
            status: 403,
            body: "security_exception: internal detail".to_string(),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = body_text(response).await;
        assert_eq!(text, "unable to insert document in opensearch\n");
        assert!(!text.contains("security_exception"));
    }

    #[test]
    fn encode_failure_is_internal_error() {
        let json_err = serde_json::from_str::<String>("{").unwrap_err();
        let err = IngestError::from(WebhookError::Encode(json_err));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_display() {
        let err = ServerError::InvalidBindAddress("nowhere".to_string());
        assert_eq!(err.to_string(), "invalid bind address 'nowhere'");
    }
}
