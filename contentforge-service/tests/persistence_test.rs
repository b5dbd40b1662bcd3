//! Generation persistence through the router, against in-process stores.

mod common;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{test_config, TestApp};
use contentforge_service::config::DatabaseConfig;
use contentforge_service::models::{RecentItem, StoredGeneration};
use contentforge_service::services::{GenerationStore, InMemoryStore, StoreError};
use contentforge_service::startup::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Store whose client exists but every call fails.
struct FailingStore;

#[async_trait]
impl GenerationStore for FailingStore {
    async fn insert_generation(&self, _generation: &StoredGeneration) -> Result<String, StoreError> {
        Err(StoreError::Operation("server selection timeout".to_string()))
    }

    async fn recent_generations(&self, _limit: i64) -> Result<Vec<RecentItem>, StoreError> {
        Err(StoreError::Operation("server selection timeout".to_string()))
    }

    async fn list_collections(&self, _limit: usize) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Operation("server selection timeout".to_string()))
    }
}

fn configured() -> DatabaseConfig {
    DatabaseConfig {
        url: Some("mongodb://localhost:27017".to_string()),
        name: Some("contentforge".to_string()),
        ..DatabaseConfig::unconfigured()
    }
}

fn generate_request(prompt: &str) -> Request<Body> {
    let body = json!({ "prompt": prompt, "tone": "Formal", "sentiment": "Urgent", "length": "Short" });
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn generation_is_persisted_with_store_id() {
    let store = Arc::new(InMemoryStore::new());
    let router = build_router(AppState::new(test_config(configured()), store.clone()));

    let response = router.oneshot(generate_request("Spring sale")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let id = body["id"].as_str().unwrap();
    assert_ne!(id, "no-db");
    assert_eq!(id.len(), 24);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn rejected_request_is_never_persisted() {
    let store = Arc::new(InMemoryStore::new());
    let router = build_router(AppState::new(test_config(configured()), store.clone()));

    let body = json!({
        "prompt": "Spring sale",
        "tone": "Formal",
        "sentiment": "Urgent",
        "creativity": -1,
        "variants": 6
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation error");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("creativity"));
    assert!(details.contains("variants"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn recent_lists_persisted_generations_newest_first() {
    let store = Arc::new(InMemoryStore::new());
    let app = TestApp::spawn_with_store(configured(), store.clone()).await;

    for prompt in ["first", "second", "third"] {
        let response = app
            .post_json(
                "/api/generate",
                &json!({ "prompt": prompt, "tone": "Casual", "sentiment": "Neutral" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        // Distinct creation timestamps.
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    }

    let items: Vec<Value> = app.get("/api/recent?limit=2").await.json().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["prompt"], "third");
    assert_eq!(items[1]["prompt"], "second");
    assert!(items[0]["created_at"].is_string());

    let all: Vec<Value> = app.get("/api/recent").await.json().await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn failing_store_degrades_generation() {
    let router = build_router(AppState::new(test_config(configured()), Arc::new(FailingStore)));

    let response = router.oneshot(generate_request("Spring sale")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], "no-db");
    let output = body["outputs"][0].as_str().unwrap();
    assert!(output.starts_with("Spring sale — crafted with ContentForge"));
}

#[tokio::test]
async fn failing_store_degrades_recent() {
    let router = build_router(AppState::new(test_config(configured()), Arc::new(FailingStore)));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/recent?limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items
        .iter()
        .all(|i| i["id"].as_str().unwrap().starts_with("mock-") && i["created_at"].is_null()));
}

#[tokio::test]
async fn diagnostics_report_failing_store() {
    let router = build_router(AppState::new(test_config(configured()), Arc::new(FailingStore)));

    let response = router
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(
        body["database"],
        "⚠️  Connected but Error: server selection timeout"
    );
    assert_eq!(body["database_url"], "✅ Set");
    assert_eq!(body["database_name"], "✅ Set");
    assert_eq!(body["connection_status"], "Connected");
    assert_eq!(body["store_status"], "unreachable");
}

#[tokio::test]
async fn diagnostics_report_working_store() {
    let store = Arc::new(InMemoryStore::new());
    let router = build_router(AppState::new(test_config(configured()), store));

    let response = router
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["database"], "✅ Connected & Working");
    assert_eq!(body["store_status"], "connected");
    assert_eq!(body["collections"], json!(["generation"]));
}
