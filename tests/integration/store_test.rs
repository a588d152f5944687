//! Integration tests for the Firestore and Cloud Storage clients

use jepx_spot::config::{StoreBackend, StoreConfig};
use jepx_spot::price::PriceDocument;
use jepx_spot::store::{DocumentStore, FirestoreStore, GcsStore, ObjectStore, StoreError};
use serde_json::json;
use wiremock::matchers::{body_bytes, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC_PATH: &str =
    "/projects/demo/databases/(default)/documents/electricity_market_price/2024-06-01";

fn config(server: &MockServer) -> StoreConfig {
    StoreConfig {
        backend: StoreBackend::Firestore,
        project_id: "demo".to_string(),
        bucket: "prices".to_string(),
        firestore_url: server.uri(),
        storage_url: server.uri(),
        access_token: Some("test-token".to_string()),
        timeout_secs: 5,
    }
}

fn sample() -> PriceDocument {
    let mut doc = PriceDocument::new();
    doc.insert_price("tokyo", "00:00".into(), 10.5);
    doc.insert_price("tokyo", "00:30".into(), 11.0);
    doc
}

#[tokio::test]
async fn test_get_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/(default)/documents/electricity_market_price/2024-06-01",
            "fields": {
                "tokyo": { "mapValue": { "fields": {
                    "00:00": { "doubleValue": 10.5 },
                    "00:30": { "doubleValue": 11.0 },
                }}}
            },
            "createTime": "2024-05-31T03:00:00Z",
            "updateTime": "2024-05-31T03:00:00Z"
        })))
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&config(&server)).unwrap();
    let doc = store.get("2024-06-01").await.unwrap();
    assert_eq!(doc, Some(sample()));
}

#[tokio::test]
async fn test_get_missing_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&config(&server)).unwrap();
    assert_eq!(store.get("2024-06-01").await.unwrap(), None);
}

#[tokio::test]
async fn test_get_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DOC_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&config(&server)).unwrap();
    let err = store.get("2024-06-01").await.unwrap_err();
    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_merge_commits_with_update_mask() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/demo/databases/(default)/documents:commit"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "writes": [{
                "update": {
                    "name": "projects/demo/databases/(default)/documents/electricity_market_price/2024-06-01",
                    "fields": { "tokyo": { "mapValue": { "fields": {
                        "00:00": { "doubleValue": 10.5 },
                        "00:30": { "doubleValue": 11.0 },
                    }}}}
                },
                "updateMask": { "fieldPaths": ["tokyo.`00:00`", "tokyo.`00:30`"] }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "writeResults": [{ "updateTime": "2024-05-31T03:00:00Z" }],
            "commitTime": "2024-05-31T03:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = FirestoreStore::new(&config(&server)).unwrap();
    store.merge("2024-06-01", &sample()).await.unwrap();
}

#[tokio::test]
async fn test_upload_object() {
    let server = MockServer::start().await;
    let body = sample().to_msgpack().unwrap();

    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/prices/o"))
        .and(query_param("uploadType", "media"))
        .and(query_param("name", "2024/06/01/price.msgpack"))
        .and(header("content-type", "application/x-msgpack"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_bytes(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "2024/06/01/price.msgpack",
            "bucket": "prices"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = GcsStore::new(&config(&server)).unwrap();
    store
        .put("2024/06/01/price.msgpack", body, "application/x-msgpack")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_upload_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload/storage/v1/b/prices/o"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let store = GcsStore::new(&config(&server)).unwrap();
    let err = store
        .put("2024/06/01/price.msgpack", vec![0x80], "application/x-msgpack")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Status { .. }));
}
