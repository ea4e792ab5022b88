// Index page, health and metrics endpoint tests
// Author: kelexine (https://github.com/kelexine)

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use medassist::server::{HealthResponse, HealthStatus};
use tempfile::TempDir;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_index_renders() {
    let uploads = TempDir::new().unwrap();
    let app = app("http://127.0.0.1:9", uploads.path());

    let (status, body) = send(&app, get("/")).await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>MedAssist</title>"));
    assert!(html.contains("gemini-2.0-flash"));
    assert!(html.contains("up to 10 MB"));
}

#[tokio::test]
async fn test_health_reports_uploads_directory() {
    let root = TempDir::new().unwrap();
    let uploads = root.path().join("uploads");
    let app = app("http://127.0.0.1:9", &uploads);

    let (status, body) = send(&app, get("/health")).await;
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, HealthStatus::Healthy);
    assert_eq!(health.checks["uploads_directory"].status, "ok");
    assert!(health.checks["configuration"].message.contains("gemini-2.0-flash"));
    assert!(uploads.is_dir());
}

#[tokio::test]
async fn test_health_degraded_when_uploads_unusable() {
    let root = TempDir::new().unwrap();
    // A regular file where the directory should be
    let blocker = root.path().join("uploads");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let app = app("http://127.0.0.1:9", &blocker);

    let (_, body) = send(&app, get("/health")).await;
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, HealthStatus::Degraded);
    assert_eq!(health.checks["uploads_directory"].status, "error");
}

#[tokio::test]
async fn test_metrics_exposed() {
    let uploads = TempDir::new().unwrap();
    let app = app("http://127.0.0.1:9", uploads.path());

    send(&app, get("/health")).await;
    let (status, body) = send(&app, get("/metrics")).await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("requests_total"));
    assert!(text.contains("endpoint=\"/health\""));
}

#[tokio::test]
async fn test_request_id_propagated() {
    let uploads = TempDir::new().unwrap();
    let app = app("http://127.0.0.1:9", uploads.path());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route() {
    let uploads = TempDir::new().unwrap();
    let app = app("http://127.0.0.1:9", uploads.path());

    let (status, _) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
