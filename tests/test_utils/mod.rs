//! Test utilities for integration tests
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};

use lasertech_support::api::{AppState, app};
use lasertech_support::core::AppConfig;
use lasertech_support::gemini::{ModelCallError, ModelClient};

/// A model that answers every prompt with the same reply (or error)
/// and counts how often it was called.
pub struct StubModel {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubModel {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for StubModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ModelCallError::network)
    }
}

pub fn test_config(api_hostname: &str, logo_path: &str) -> AppConfig {
    AppConfig {
        gemini_api_key: String::from("test-api-key"),
        gemini_api_hostname: api_hostname.to_string(),
        gemini_model: String::from("gemini-1.5-flash"),
        logo_path: logo_path.to_string(),
        request_timeout: Duration::from_secs(5),
        context_max_messages: 20,
    }
}

/// Creates a test application router backed by `model`. The logo path
/// doesn't exist so pages render without it.
pub fn test_app(model: Arc<dyn ModelClient>) -> Router {
    test_app_with_config(test_config("http://localhost:1", "/nonexistent/logo.jpeg"), model)
}

pub fn test_app_with_config(config: AppConfig, model: Arc<dyn ModelClient>) -> Router {
    let app_state = AppState::new(config, model);
    app(Arc::new(RwLock::new(app_state)))
}

/// Like `test_app` but also returns the shared state so tests can
/// inspect the session store.
pub fn test_app_with_state(model: Arc<dyn ModelClient>) -> (Router, Arc<RwLock<AppState>>) {
    let config = test_config("http://localhost:1", "/nonexistent/logo.jpeg");
    let shared_state = Arc::new(RwLock::new(AppState::new(config, model)));
    (app(Arc::clone(&shared_state)), shared_state)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

/// The `name=value` pair from the response's session cookie, ready to
/// be sent back in a `Cookie` header.
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_string())
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
