//! Shorten and stats API integration tests
//!
//! These tests drive the full router against an in-memory SQLite store and
//! check status codes, response bodies and store side effects.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use linklet::config::RedirectMode;
use linklet::service::UrlService;
use linklet::storage::{SqliteStorage, Storage};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BASE_URL: &str = "http://127.0.0.1:5000";

/// Helper to create test storage
async fn create_test_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn create_app(storage: Arc<dyn Storage>) -> Router {
    let service = Arc::new(UrlService::new(storage, BASE_URL, 10));
    linklet::create_app(service, RedirectMode::default())
}

fn shorten_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/shorten")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_shorten_creates_then_reuses_mapping() {
    let storage = create_test_storage().await;
    let app = create_app(storage.clone());

    let response = app
        .clone()
        .oneshot(shorten_request(r#"{"url": "https://example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    let code = created["short_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(created["original_url"], "https://example.com");
    assert_eq!(created["short_url"], format!("{}/{}", BASE_URL, code));
    assert_eq!(storage.count().await.unwrap(), 1);

    // Second identical submission reuses the record
    let response = app
        .oneshot(shorten_request(r#"{"url": "https://example.com"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reused = json_body(response).await;
    assert_eq!(reused["short_code"], code.as_str());
    assert_eq!(reused["short_url"], created["short_url"]);
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_shorten_distinct_urls_get_distinct_codes() {
    let storage = create_test_storage().await;
    let app = create_app(storage.clone());

    let mut codes = std::collections::HashSet::new();
    for i in 0..20 {
        let body = format!(r#"{{"url": "https://example.com/page/{}"}}"#, i);
        let response = app.clone().oneshot(shorten_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        codes.insert(json["short_code"].as_str().unwrap().to_string());
    }

    assert_eq!(codes.len(), 20);
    assert_eq!(storage.count().await.unwrap(), 20);
}

#[tokio::test]
async fn test_shorten_rejects_invalid_url() {
    let storage = create_test_storage().await;
    let app = create_app(storage.clone());

    let response = app
        .oneshot(shorten_request(r#"{"url": "not-a-url"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Invalid URL");
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_script_and_data_schemes() {
    let storage = create_test_storage().await;
    let app = create_app(storage.clone());

    for url in ["javascript://x/%0aalert(document.cookie)", "data://text/html,hi"] {
        let body = serde_json::json!({ "url": url }).to_string();
        let response = app.clone().oneshot(shorten_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url: {url}");
        assert_eq!(json_body(response).await["error"], "Invalid URL");
    }
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_requires_url() {
    let app = create_app(create_test_storage().await);

    for body in [r#"{}"#, r#"{"url": ""}"#, r#"{"url": null}"#] {
        let response = app.clone().oneshot(shorten_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json_body(response).await["error"], "URL is required");
    }
}

#[tokio::test]
async fn test_shorten_malformed_json_is_bad_request() {
    let app = create_app(create_test_storage().await);

    let response = app.oneshot(shorten_request("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_stats_returns_record_fields() {
    let storage = create_test_storage().await;
    let record = storage
        .insert("https://example.com/stats", "Stat01")
        .await
        .unwrap();
    let app = create_app(storage.clone());

    let response = app.oneshot(get_request("/stats/Stat01")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["short_code"], "Stat01");
    assert_eq!(json["original_url"], "https://example.com/stats");
    assert_eq!(json["clicks"], 0);
    assert_eq!(json["created_at"], record.created_at_iso());

    let created_at = json["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[tokio::test]
async fn test_stats_does_not_count_clicks() {
    let storage = create_test_storage().await;
    storage
        .insert("https://example.com/quiet", "Quiet1")
        .await
        .unwrap();
    let app = create_app(storage.clone());

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(get_request("/stats/Quiet1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["clicks"], 0);
    }

    let record = storage.find_by_code("Quiet1").await.unwrap().unwrap();
    assert_eq!(record.clicks, 0);
}

#[tokio::test]
async fn test_stats_unknown_code() {
    let app = create_app(create_test_storage().await);

    let response = app.oneshot(get_request("/stats/zzzzzz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "URL not found");
}

#[tokio::test]
async fn test_shorten_redirect_stats_round_trip() {
    let storage = create_test_storage().await;
    let app = create_app(storage.clone());

    let response = app
        .clone()
        .oneshot(shorten_request(r#"{"url": "https://www.rust-lang.org/learn"}"#))
        .await
        .unwrap();
    let code = json_body(response).await["short_code"]
        .as_str()
        .unwrap()
        .to_string();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/{}", code)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let response = app
        .oneshot(get_request(&format!("/stats/{}", code)))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["clicks"], 3);
    assert_eq!(json["original_url"], "https://www.rust-lang.org/learn");
}
