//! Route-level integration tests
//!
//! Runs the real router and state over a mock engine, so no Chromium
//! binary is needed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use uuid::Uuid;

use prensa_server::config::Config;
use prensa_server::render::{EngineError, EngineLauncher, PdfOptions, RenderEngine};
use prensa_server::state::AppState;

/// Mock engine: instant renders, optional hang on load
struct MockLauncher {
    hang: bool,
    launches: AtomicUsize,
}

impl MockLauncher {
    fn healthy() -> Arc<Self> {
        Arc::new(Self {
            hang: false,
            launches: AtomicUsize::new(0),
        })
    }

    fn hanging() -> Arc<Self> {
        Arc::new(Self {
            hang: true,
            launches: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EngineLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn RenderEngine>, EngineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockEngine {
            id: Uuid::new_v4(),
            hang: self.hang,
            alive: AtomicBool::new(true),
        }))
    }
}

struct MockEngine {
    id: Uuid,
    hang: bool,
    alive: AtomicBool,
}

#[async_trait]
impl RenderEngine for MockEngine {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn load_html(&self, _content: &str) -> Result<(), EngineError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(())
    }

    async fn load_url(&self, _url: &str) -> Result<(), EngineError> {
        self.load_html("").await
    }

    async fn generate_pdf(&self, _options: &PdfOptions) -> Result<Vec<u8>, EngineError> {
        Ok(b"%PDF-1.4 mock pdf".to_vec())
    }

    async fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

fn test_server(launcher: Arc<MockLauncher>) -> TestServer {
    let state = AppState::new(Config::default(), launcher);
    TestServer::new(prensa_server::app(state)).unwrap()
}

#[tokio::test]
async fn render_html_returns_pdf_bytes() {
    let server = test_server(MockLauncher::healthy());

    let response = server
        .post("/pdf")
        .json(&serde_json::json!({ "html": "<p>x</p>" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/pdf"
    );
    assert!(!response.as_bytes().is_empty());
}

#[tokio::test]
async fn render_with_options_returns_pdf() {
    let server = test_server(MockLauncher::healthy());

    let response = server
        .post("/pdf")
        .json(&serde_json::json!({
            "html": "<p>x</p>",
            "options": { "format": "letter", "landscape": true, "printBackground": false }
        }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn missing_url_and_html_is_bad_request() {
    let launcher = MockLauncher::healthy();
    let server = test_server(launcher.clone());

    let response = server.post("/pdf").json(&serde_json::json!({})).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_request");
    // Validation short-circuits before any engine interaction
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() {
    let launcher = MockLauncher::healthy();
    let server = test_server(launcher.clone());

    let response = server
        .post("/pdf")
        .text("{\"html\": ")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deadline_expiry_is_gateway_timeout() {
    let server = test_server(MockLauncher::hanging());

    let response = server
        .post("/pdf")
        .json(&serde_json::json!({ "html": "<p>x</p>", "deadline_secs": 1 }))
        .await;

    response.assert_status(axum::http::StatusCode::GATEWAY_TIMEOUT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "render_timeout");
}

#[tokio::test]
async fn health_reports_pool_stats() {
    let launcher = MockLauncher::healthy();
    let server = test_server(launcher);

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "prensa-server");
    assert_eq!(body["pool"]["engines_launched"], 0);

    // One render later the counters move
    server
        .post("/pdf")
        .json(&serde_json::json!({ "html": "<p>x</p>" }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["pool"]["engines_launched"], 1);
    assert_eq!(body["pool"]["requests_served"], 1);
    assert_eq!(body["pool"]["engine_live"], true);
}
