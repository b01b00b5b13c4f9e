//! Integration tests for Pagecraft.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pagecraft-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `store_editing` - Editing flows through the store and gateway
//! - `resolution` - Product page resolution cascade
//! - `editor_api` - Editor HTTP API driven in-process
//!
//! The editor API tests build the full router against an in-memory gateway
//! and drive it with `tower::ServiceExt::oneshot`; no database or socket is
//! involved.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use pagecraft_editor::config::EditorConfig;
use pagecraft_editor::routes;
use pagecraft_editor::state::AppState;
use pagecraft_engine::MemoryGateway;

/// Editor configuration for tests. Never reads the environment.
#[must_use]
pub fn test_config() -> EditorConfig {
    EditorConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        session_ttl: Duration::from_secs(600),
        run_migrations: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the editor app on top of a shared in-memory gateway.
#[must_use]
pub fn test_app(gateway: Arc<MemoryGateway>) -> Router {
    let state = AppState::with_gateway(test_config(), gateway);
    routes::app(state)
}

/// Send one request to the app and return the status with the parsed body.
///
/// JSON bodies come back parsed; anything else comes back as
/// `Value::String`, and an empty body as `Value::Null`.
///
/// # Panics
///
/// Panics when the request cannot be built or sent.
pub async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder
                .body(Body::from(json.to_string()))
                .expect("valid request")
        }
        None => builder.body(Body::empty()).expect("valid request"),
    };

    let response = app.clone().oneshot(request).await.expect("request sent");
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collected");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
