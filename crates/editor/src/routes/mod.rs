//! HTTP route handlers for the editor.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (database)
//!
//! # Section palette
//! GET    /api/section-kinds               - List available section kinds
//!
//! # Published sections
//! GET    /api/pages/{page_type}/sections  - Published sections for a merchant page
//! GET    /api/product-sections            - Resolved product page sections
//!
//! # Editing sessions
//! POST   /api/sessions                    - Open an editing session
//! GET    /api/sessions/{id}               - Session state and sections
//! DELETE /api/sessions/{id}               - Close a session
//! POST   /api/sessions/{id}/ops           - Apply an edit operation
//! POST   /api/sessions/{id}/save          - Persist the working set
//! POST   /api/sessions/{id}/reset         - Discard unsaved edits
//!
//! # Section templates
//! GET    /api/templates                   - List templates for a merchant
//! POST   /api/templates                   - Create a template
//! PUT    /api/templates/{id}              - Rename a template
//! DELETE /api/templates/{id}              - Delete a template
//! ```

pub mod kinds;
pub mod pages;
pub mod sessions;
pub mod templates;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the editing session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::open))
        .route("/{id}", get(sessions::show).delete(sessions::close))
        .route("/{id}/ops", post(sessions::apply_op))
        .route("/{id}/save", post(sessions::save))
        .route("/{id}/reset", post(sessions::reset))
}

/// Create the template routes router.
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(templates::list).post(templates::create))
        .route(
            "/{id}",
            put(templates::rename).delete(templates::delete_template),
        )
}

/// Create all API routes for the editor.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Section palette
        .route("/api/section-kinds", get(kinds::list))
        // Published sections
        .route("/api/pages/{page_type}/sections", get(pages::page_sections))
        .route("/api/product-sections", get(pages::product_sections))
        // Editing sessions
        .nest("/api/sessions", session_routes())
        // Section templates
        .nest("/api/templates", template_routes())
}

/// Build the complete editor application router.
///
/// Includes health endpoints and the tracing middleware stack. Sentry layers
/// are added by the binary so tests can run without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK. Returns 503 Service
/// Unavailable if the database is not reachable. States without a database
/// (in-memory gateway) are always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.pool() {
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::OK,
    }
}
