//! Shared test helpers for host integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use casebook_core::clock::Clock;
use casebook_core::rng::DeterministicRng;
use casebook_director::{DirectorConfig, UserAgentGate};
use casebook_server::state::AppState;
use casebook_store::MemoryProgressStore;
use casebook_test_support::{CourseFixture, FixedClock, MockRng};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

fn mock_rng() -> Box<dyn DeterministicRng> {
    Box::new(MockRng)
}

/// A two-session course: one level of two scenes, then one level of one.
pub fn fixture() -> CourseFixture {
    CourseFixture::new(&[&[2], &[1]])
}

/// Build the full app over `fixture()` with an in-memory store, refusing
/// user agents that contain "msie".
pub fn build_test_app() -> Router {
    casebook_server::app(test_state())
}

/// Like [`build_test_app`], but games idle for `idle_timeout` are dropped
/// when the next game is created.
pub fn build_test_app_with_idle_timeout(idle_timeout: Duration) -> Router {
    casebook_server::app(test_state().with_idle_timeout(idle_timeout))
}

fn test_state() -> AppState {
    let fixture = fixture();
    AppState::new(
        Arc::new(fixture.course.clone()),
        Arc::new(fixture.resolver()),
        Arc::new(MemoryProgressStore::new()),
        fixed_clock(),
        mock_rng,
        Arc::new(UserAgentGate::new(["msie"])),
        DirectorConfig::default(),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_json_as(app, uri, body, None).await
}

/// Send a POST request with a JSON body and an optional `User-Agent`.
pub async fn post_json_as(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    user_agent: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(agent) = user_agent {
        builder = builder.header("user-agent", agent);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
