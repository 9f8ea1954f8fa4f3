use super::{DiscoveryOptions, Session};
use crate::catalog::Catalog;
use crate::recorder::UsageRecorder;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Live sessions, evicted after a period without access
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<Session>>,
    catalog: Arc<dyn Catalog>,
    recorder: Option<Arc<dyn UsageRecorder>>,
    options: DiscoveryOptions,
}

impl SessionStore {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        recorder: Option<Arc<dyn UsageRecorder>>,
        options: DiscoveryOptions,
        max_sessions: u64,
        idle_ttl: Duration,
    ) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_ttl)
            .eviction_listener(|id, _session, cause| {
                debug!("Session {} evicted ({:?})", id, cause);
            })
            .build();

        Self {
            sessions,
            catalog,
            recorder,
            options,
        }
    }

    /// Start and register a new session
    pub async fn create(&self) -> Arc<Session> {
        let session = Session::start(
            Arc::clone(&self.catalog),
            self.recorder.clone(),
            &self.options,
        );
        self.sessions.insert(session.id(), Arc::clone(&session)).await;
        debug!("Session {} created", session.id());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.sessions.get(id).await
    }

    /// Existing session for `id`, or a fresh one
    pub async fn get_or_create(&self, id: Option<Uuid>) -> Arc<Session> {
        if let Some(id) = id
            && let Some(session) = self.get(&id).await
        {
            return session;
        }
        self.create().await
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Arc<Session>> {
        self.sessions.remove(id).await
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            sessions: self.sessions.entry_count(),
        }
    }
}

/// Store statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoreStats {
    pub sessions: u64,
}
