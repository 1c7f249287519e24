//! End-to-end tests for the webhook pipeline.
//!
//! These tests verify:
//! 1. Startup waits for a store that is not ready yet
//! 2. Accepted notifications land in the date-bucketed index
//! 3. Rejected notifications never reach the store
//! 4. Outcome counters are exposed on /metrics

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use alertsearch_server::{AlertServer, ServerConfig};
use alertsearch_store::{RetryPolicy, StoreConfig, StoreError, connect};
use alertsearch_webhook::IndexTemplate;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

const PAYLOAD: &str = r#"{
    "receiver": "opensearch",
    "status": "resolved",
    "alerts": [{
        "status": "resolved",
        "labels": {"alertname": "NodeDown", "instance": "worker-3"},
        "annotations": {"description": "worker-3 is back"},
        "startsAt": "2024-03-15T08:00:00Z",
        "endsAt": "2024-03-15T08:12:00Z",
        "generatorURL": "http://prometheus:9090/graph",
        "fingerprint": "5d2f8a9c0b1e3f47"
    }],
    "groupLabels": {"alertname": "NodeDown"},
    "commonLabels": {"alertname": "NodeDown", "instance": "worker-3"},
    "commonAnnotations": {"description": "worker-3 is back"},
    "externalURL": "http://alertmanager:9093",
    "version": "4",
    "groupKey": "{}:{alertname=\"NodeDown\"}",
    "truncatedAlerts": 0
}"#;

// ============================================================================
// Fake OpenSearch node
// ============================================================================

#[derive(Debug, Default)]
struct FakeNode {
    unready_probes: u32,
    probes: AtomicU32,
    documents: Mutex<Vec<(String, Value)>>,
}

async fn cat_indices(State(node): State<Arc<FakeNode>>) -> (StatusCode, &'static str) {
    let n = node.probes.fetch_add(1, Ordering::SeqCst);
    if n < node.unready_probes {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    } else {
        (StatusCode::OK, "[]")
    }
}

async fn index_doc(
    State(node): State<Arc<FakeNode>>,
    Path(index): Path<String>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    match serde_json::from_slice(&body) {
        Ok(document) => {
            node.documents.lock().push((index, document));
            (StatusCode::CREATED, r#"{"result":"created"}"#)
        }
        Err(_) => (StatusCode::BAD_REQUEST, r#"{"error":"parse_exception"}"#),
    }
}

async fn start_fake_node(unready_probes: u32) -> (SocketAddr, Arc<FakeNode>) {
    let node = Arc::new(FakeNode {
        unready_probes,
        ..FakeNode::default()
    });
    let app = Router::new()
        .route("/_cat/indices", get(cat_indices))
        .route("/{index}/_doc", post(index_doc))
        .with_state(node.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, node)
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_available_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

fn fast_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries).with_base_delay(Duration::from_millis(10))
}

async fn wait_until_healthy(http: &reqwest::Client, base: &str) {
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    loop {
        if let Ok(response) = http.get(format!("{base}/healthz")).send().await {
            if response.status().is_success() {
                return;
            }
        }
        assert!(tokio::time::Instant::now() < deadline, "server never became healthy");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_notification_flows_to_store() {
    let (node_addr, node) = start_fake_node(2).await;

    let store_config = StoreConfig::new([format!("http://{node_addr}")]).unwrap();
    let store = connect(&store_config, &fast_retries(5)).await.unwrap();
    assert_eq!(node.probes.load(Ordering::SeqCst), 3);

    let port = find_available_port().await;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let template = "alertmanager-%y.%m";
    let server = AlertServer::new(
        ServerConfig::new(addr).with_index_template(template),
        store,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve_with_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let http = reqwest::Client::new();
    let base = format!("http://{addr}");
    wait_until_healthy(&http, &base).await;

    let before = Utc::now();
    let response = http
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .body(PAYLOAD)
        .send()
        .await
        .unwrap();
    let after = Utc::now();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let rejected = http
        .post(format!("{base}/webhook"))
        .body(PAYLOAD.replace(r#""version": "4""#, r#""version": "5""#))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);

    let documents = node.documents.lock().clone();
    assert_eq!(documents.len(), 1);
    let (index, document) = &documents[0];

    let template = IndexTemplate::new(template);
    assert!(index == &template.resolve(before) || index == &template.resolve(after));
    assert_eq!(document["status"], "resolved");
    assert_eq!(document["alerts"][0]["fingerprint"], "5d2f8a9c0b1e3f47");
    assert_eq!(document["commonLabels"]["instance"], "worker-3");
    let stamped = document["@timestamp"].as_str().unwrap();
    assert!(stamped.ends_with('Z'));
    assert_eq!(stamped.len(), "2024-03-15T08:12:00Z".len());

    let metrics = http
        .get(format!("{base}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("alertmanager2es_alerts_received_total 2"));
    assert!(metrics.contains("alertmanager2es_alerts_invalid_total 1"));
    assert!(metrics.contains("alertmanager2es_alerts_successful_total 1"));

    shutdown_tx.send(()).unwrap();
    let result = tokio::time::timeout(TEST_TIMEOUT, handle).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_startup_gives_up_on_unreachable_store() {
    let (node_addr, node) = start_fake_node(u32::MAX).await;

    let store_config = StoreConfig::new([format!("http://{node_addr}")]).unwrap();
    let err = connect(&store_config, &fast_retries(2)).await.unwrap_err();

    assert!(matches!(err, StoreError::Unavailable { attempts: 3, .. }));
    assert_eq!(node.probes.load(Ordering::SeqCst), 3);
}
