//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use pagecraft_engine::gateway::postgres::PostgresGateway;
use pagecraft_engine::{SectionGateway, SectionResolver};

use crate::config::EditorConfig;
use crate::sessions::SessionManager;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the section gateway and session manager.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: EditorConfig,
    gateway: Arc<dyn SectionGateway>,
    resolver: SectionResolver,
    sessions: SessionManager,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create the application state backed by the Postgres gateway.
    ///
    /// # Arguments
    ///
    /// * `config` - Editor configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: EditorConfig, pool: PgPool) -> Self {
        let gateway: Arc<dyn SectionGateway> = Arc::new(PostgresGateway::new(pool.clone()));
        Self::build(config, gateway, Some(pool))
    }

    /// Create the application state with an arbitrary gateway.
    ///
    /// Used by integration tests to run the full API against an in-memory
    /// backend without a database.
    #[must_use]
    pub fn with_gateway(config: EditorConfig, gateway: Arc<dyn SectionGateway>) -> Self {
        Self::build(config, gateway, None)
    }

    fn build(config: EditorConfig, gateway: Arc<dyn SectionGateway>, pool: Option<PgPool>) -> Self {
        let resolver = SectionResolver::new(Arc::clone(&gateway));
        let sessions = SessionManager::new(config.session_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                resolver,
                sessions,
                pool,
            }),
        }
    }

    /// Get a reference to the editor configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.inner.config
    }

    /// Get a reference to the section gateway.
    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn SectionGateway> {
        &self.inner.gateway
    }

    /// Get a reference to the section resolver.
    #[must_use]
    pub fn resolver(&self) -> &SectionResolver {
        &self.inner.resolver
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Get the database connection pool, if this state is database-backed.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
