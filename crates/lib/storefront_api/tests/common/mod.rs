//! Shared helpers for router-level tests over in-memory stores.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use storefront_api::config::ApiConfig;
use storefront_api::{AppState, router};
use storefront_core::images::ImageStore;
use storefront_core::store::memory::{MemoryProductStore, MemoryUserStore};

pub const SECRET: &str = "integration-test-secret";

/// Router and the state behind it.
pub fn app() -> (Router, AppState) {
    app_with(ApiConfig::for_tests(SECRET))
}

pub fn app_with(config: ApiConfig) -> (Router, AppState) {
    let state = AppState::in_memory(config);
    (router(state.clone()), state)
}

/// Memory user and product stores over the given image store.
pub fn app_with_images(config: ApiConfig, images: Arc<dyn ImageStore>) -> (Router, AppState) {
    let state = AppState::new(
        config,
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryProductStore::new()),
        images,
    );
    (router(state.clone()), state)
}

/// Build a request with an optional bearer token and JSON body.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON response (`Value::Null` for an empty body).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
    if body.is_empty() {
        return (status, Value::Null);
    }
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&body).into_owned())
    });
    (status, json)
}

/// Send a request and return the raw response body with its content type.
pub async fn fetch(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
    (status, content_type, body.to_vec())
}

/// Register a user and return `(token, user_id)`.
pub async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "correct horse"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    (
        body["token"].as_str().expect("token").to_string(),
        body["user"]["id"].as_str().expect("user id").to_string(),
    )
}

/// Create a product and return its JSON.
pub async fn create_product(app: &Router, token: &str, name: &str, price: f64) -> Value {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/products",
            Some(token),
            Some(serde_json::json!({ "name": name, "price": price })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}
