//! Document store access.
//!
//! [`DocumentStore`] is the narrow interface the ingestion pipeline needs:
//! a liveness probe and a single-document write. [`OpenSearchClient`] is the
//! HTTP implementation used in production.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, trace};
use url::Url;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Maximum number of response body bytes kept in a `StoreError::Status`.
const ERROR_BODY_LIMIT: usize = 512;

/// Trait for document store backends.
///
/// Implementations must be safe to share between concurrent request handlers.
pub trait DocumentStore: Send + Sync {
    /// Performs a lightweight liveness check against the store.
    fn probe(&self) -> impl Future<Output = Result<()>> + Send;

    /// Writes one JSON document into `index`, letting the store assign its id.
    fn index_document(
        &self,
        index: &str,
        document: Vec<u8>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// HTTP client for an OpenSearch (or Elasticsearch-compatible) cluster.
#[derive(Debug)]
pub struct OpenSearchClient {
    http: Client,
    addresses: Vec<Url>,
    username: Option<String>,
    password: Option<String>,
    next_address: AtomicUsize,
}

impl OpenSearchClient {
    /// Builds a client from the configuration. No request is made.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidConfig` for an invalid configuration and
    /// `StoreError::Client` if the HTTP client cannot be constructed.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(StoreError::Client)?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(StoreError::Client)?;

        Ok(Self {
            http,
            addresses: config.addresses.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            next_address: AtomicUsize::new(0),
        })
    }

    /// Returns the configured node addresses.
    #[must_use]
    pub fn addresses(&self) -> &[Url] {
        &self.addresses
    }

    /// Picks the next node address, rotating through all of them.
    fn next_base(&self) -> &Url {
        let i = self.next_address.fetch_add(1, Ordering::Relaxed) % self.addresses.len();
        &self.addresses[i]
    }

    /// Builds `base/<segments...>`, percent-encoding each segment.
    fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidConfig(format!("address cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_ref()),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut url = response.url().clone();
        let _ = url.set_password(None);
        let _ = url.set_username("");

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > ERROR_BODY_LIMIT {
            let mut cut = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(StoreError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

impl DocumentStore for OpenSearchClient {
    async fn probe(&self) -> Result<()> {
        let mut url = Self::endpoint(self.next_base(), &["_cat", "indices"])?;
        url.query_pairs_mut().append_pair("format", "json");

        trace!(url = %url, "probing store");
        let response = self.authorize(self.http.get(url)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn index_document(&self, index: &str, document: Vec<u8>) -> Result<()> {
        let url = Self::endpoint(self.next_base(), &[index, "_doc"])?;

        let response = self
            .authorize(self.http.post(url))
            .header(CONTENT_TYPE, "application/json")
            .body(document)
            .send()
            .await?;
        let response = Self::check(response).await?;

        debug!(index = %index, status = %response.status(), "document indexed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use parking_lot::Mutex;

    #[derive(Debug, Clone)]
    struct Recorded {
        index: String,
        body: Vec<u8>,
        authorization: Option<String>,
        content_type: Option<String>,
    }

    type Log = Arc<Mutex<Vec<Recorded>>>;

    async fn cat_indices() -> &'static str {
        "[]"
    }

    async fn index_doc(
        State(log): State<Log>,
        Path(index): Path<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        if index == "broken" {
            return (StatusCode::BAD_REQUEST, r#"{"error":"mapper_parsing_exception"}"#);
        }
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        log.lock().push(Recorded {
            index,
            body: body.to_vec(),
            authorization: header("authorization"),
            content_type: header("content-type"),
        });
        (StatusCode::CREATED, r#"{"result":"created"}"#)
    }

    /// Starts a minimal stand-in for an OpenSearch node.
    async fn fake_node() -> (SocketAddr, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/_cat/indices", get(cat_indices))
            .route("/{index}/_doc", post(index_doc))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, log)
    }

    fn client_for(addr: SocketAddr) -> OpenSearchClient {
        let config = StoreConfig::new([format!("http://{addr}")]).unwrap();
        OpenSearchClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn probe_succeeds_against_live_node() {
        let (addr, _) = fake_node().await;
        let client = client_for(addr);

        assert!(client.probe().await.is_ok());
    }

    #[tokio::test]
    async fn probe_fails_when_node_is_down() {
        let config = StoreConfig::new(["http://127.0.0.1:1"]).unwrap();
        let client = OpenSearchClient::new(&config).unwrap();

        let err = client.probe().await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[tokio::test]
    async fn index_document_posts_json() {
        let (addr, log) = fake_node().await;
        let client = client_for(addr);

        client
            .index_document("alertmanager-2024.03", br#"{"version":"4"}"#.to_vec())
            .await
            .unwrap();

        let recorded = log.lock().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].index, "alertmanager-2024.03");
        assert_eq!(recorded[0].body, br#"{"version":"4"}"#);
        assert_eq!(recorded[0].content_type.as_deref(), Some("application/json"));
        assert!(recorded[0].authorization.is_none());
    }

    #[tokio::test]
    async fn index_document_sends_basic_auth() {
        let (addr, log) = fake_node().await;
        let config = StoreConfig::new([format!("http://{addr}")])
            .unwrap()
            .with_credentials("admin", Some("admin".into()));
        let client = OpenSearchClient::new(&config).unwrap();

        client.index_document("alerts", b"{}".to_vec()).await.unwrap();

        let recorded = log.lock().clone();
        // base64("admin:admin")
        assert_eq!(
            recorded[0].authorization.as_deref(),
            Some("Basic YWRtaW46YWRtaW4=")
        );
    }

    #[tokio::test]
    async fn index_document_reports_rejection() {
        let (addr, log) = fake_node().await;
        let client = client_for(addr);

        let err = client.index_document("broken", b"{}".to_vec()).await.unwrap_err();

        match err {
            StoreError::Status { status, body, url } => {
                assert_eq!(status, 400);
                assert!(body.contains("mapper_parsing_exception"));
                assert!(url.ends_with("/broken/_doc"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(log.lock().is_empty());
    }

    #[test]
    fn endpoint_keeps_address_prefix() {
        let base = Url::parse("https://gateway.example.com/opensearch/").unwrap();
        let url = OpenSearchClient::endpoint(&base, &["alerts-2024.03", "_doc"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://gateway.example.com/opensearch/alerts-2024.03/_doc"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let base = Url::parse("http://localhost:9200").unwrap();
        let url = OpenSearchClient::endpoint(&base, &["a b", "_doc"]).unwrap();

        assert_eq!(url.as_str(), "http://localhost:9200/a%20b/_doc");
    }

    #[test]
    fn addresses_rotate() {
        let config = StoreConfig::new(["http://a:9200", "http://b:9200"]).unwrap();
        let client = OpenSearchClient::new(&config).unwrap();

        let picked: Vec<_> = (0..4)
            .map(|_| client.next_base().host_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(picked, ["a", "b", "a", "b"]);
    }
}
