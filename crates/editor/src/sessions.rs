//! In-memory editing sessions.
//!
//! Each session wraps a `SectionStore` behind an async mutex so concurrent
//! requests against the same session serialize their edits. Sessions are
//! held in a `moka` cache and evicted after sitting idle for the configured
//! TTL, which bounds memory for abandoned editors.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, MutexGuard};

use pagecraft_core::SessionId;
use pagecraft_engine::SectionStore;

/// A single editing session.
pub struct EditingSession {
    store: Mutex<SectionStore>,
}

impl EditingSession {
    fn new(store: SectionStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Lock the underlying store for reading or mutation.
    pub async fn store(&self) -> MutexGuard<'_, SectionStore> {
        self.store.lock().await
    }
}

/// Tracks live editing sessions by id.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Cache<SessionId, Arc<EditingSession>>,
}

impl SessionManager {
    const MAX_SESSIONS: u64 = 10_000;

    /// Create a manager whose sessions expire after `idle_ttl` without access.
    #[must_use]
    pub fn new(idle_ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(Self::MAX_SESSIONS)
            .time_to_idle(idle_ttl)
            .build();

        Self { sessions }
    }

    /// Register a new session and return it along with its id.
    ///
    /// The returned handle is the inserted session itself, so the caller
    /// can respond from it even if the cache evicts the entry right away.
    pub async fn open(&self, store: SectionStore) -> (SessionId, Arc<EditingSession>) {
        let id = SessionId::generate();
        let session = Arc::new(EditingSession::new(store));
        self.sessions.insert(id, Arc::clone(&session)).await;
        (id, session)
    }

    /// Look up a live session, refreshing its idle timer.
    pub async fn get(&self, id: SessionId) -> Option<Arc<EditingSession>> {
        self.sessions.get(&id).await
    }

    /// Discard a session. Returns `true` if it existed.
    pub async fn close(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).await.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use pagecraft_core::{MerchantId, PageType, SectionKind};
    use pagecraft_engine::StoreTarget;

    fn empty_store() -> SectionStore {
        let target = StoreTarget::Page {
            merchant: MerchantId::generate(),
            page_type: PageType::Home,
        };
        SectionStore::new(target, Vec::new())
    }

    #[tokio::test]
    async fn test_open_then_get_returns_same_session() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let (id, _) = manager.open(empty_store()).await;

        let session = manager.get(id).await.unwrap();
        session.store().await.add(SectionKind::Hero, None);
        assert_eq!(manager.get(id).await.unwrap().store().await.len(), 1);
    }

    #[tokio::test]
    async fn test_open_hands_back_the_inserted_session() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let (id, session) = manager.open(empty_store()).await;

        session.store().await.add(SectionKind::Hero, None);
        assert_eq!(manager.get(id).await.unwrap().store().await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_session_returns_none() {
        let manager = SessionManager::new(Duration::from_secs(60));
        assert!(manager.get(SessionId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let (id, _) = manager.open(empty_store()).await;

        assert!(manager.close(id).await);
        assert!(manager.get(id).await.is_none());
        assert!(!manager.close(id).await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let manager = SessionManager::new(Duration::from_secs(60));
        let (first, _) = manager.open(empty_store()).await;
        let (second, _) = manager.open(empty_store()).await;

        let session = manager.get(first).await.unwrap();
        session.store().await.add(SectionKind::Hero, None);

        assert_eq!(manager.get(second).await.unwrap().store().await.len(), 0);
    }
}
