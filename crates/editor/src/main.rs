//! Pagecraft Editor - merchant page editing service.
//!
//! This binary serves the section editing API on port 4000.
//!
//! # Architecture
//!
//! - Axum web framework exposing a JSON API
//! - In-memory editing sessions with idle eviction (`moka`)
//! - `PostgreSQL` for published sections and templates
//!
//! Edits accumulate in a session's working set and only reach the database
//! when the session is saved; a save replaces the target's full section
//! collection in one transaction.

#![cfg_attr(not(test), forbid(unsafe_code))]

use pagecraft_editor::config::EditorConfig;
use pagecraft_editor::routes;
use pagecraft_editor::state::AppState;

use pagecraft_engine::gateway::postgres::{create_pool, run_migrations};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start Sentry if a DSN is configured. The guard flushes events on drop,
/// so the caller keeps it alive for the process lifetime.
fn init_sentry(config: &EditorConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Tracing subscriber with env filtering and the Sentry bridge.
///
/// WARN and ERROR events become Sentry events; INFO and DEBUG become
/// breadcrumbs attached to whichever event fires next.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "pagecraft_editor=info,pagecraft_engine=info,tower_http=debug".into()
    });

    let sentry_filter = |metadata: &tracing::Metadata<'_>| match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = EditorConfig::from_env().expect("editor configuration");

    // Sentry must exist before the tracing registry picks up its layer.
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = create_pool(&config.database_url)
        .await
        .expect("database pool");
    tracing::info!("Database pool created");

    if config.run_migrations {
        run_migrations(&pool).await.expect("database migrations");
        tracing::info!("Database migrations applied");
    }

    let state = AppState::new(config.clone(), pool);

    // Sentry layers sit outermost so every request gets its own hub.
    let app = routes::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("editor listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
