//! Moka-backed fault session store
//!
//! Sessions live in a bounded concurrent cache with a per-session idle TTL.
//! Each entry carries its own mutex so concurrent requests for the same
//! session serialize their read-modify-write while requests for different
//! sessions never contend.

use std::{sync::Arc, time::Duration};

use application::{error::ApplicationError, ports::FaultSessionStore};
use async_trait::async_trait;
use domain::{AdmittedRequest, FaultConfiguration, FaultSession, SessionId};
use moka::future::Cache;
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// Default idle time after which a session is forgotten
const DEFAULT_IDLE_TTL_SECS: u64 = 300;

/// Default upper bound on live sessions
const DEFAULT_MAX_SESSIONS: u64 = 10_000;

/// Configuration for the session store
#[derive(Debug, Clone, Copy)]
pub struct SessionStoreConfig {
    /// Maximum number of live sessions
    pub max_sessions: u64,
    /// Idle time after which a session is evicted
    pub idle_ttl: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_ttl: Duration::from_secs(DEFAULT_IDLE_TTL_SECS),
        }
    }
}

type SessionEntry = Arc<Mutex<FaultSession>>;

/// In-memory fault session store
pub struct MokaFaultSessionStore {
    sessions: Cache<SessionId, SessionEntry>,
}

impl std::fmt::Debug for MokaFaultSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaFaultSessionStore")
            .field("entries", &self.sessions.entry_count())
            .finish()
    }
}

impl MokaFaultSessionStore {
    /// Create a store with default bounds
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionStoreConfig::default())
    }

    /// Create a store with custom bounds
    #[must_use]
    pub fn with_config(config: SessionStoreConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(config.idle_ttl)
            .build();

        Self { sessions }
    }

    async fn entry(&self, id: &SessionId) -> SessionEntry {
        self.sessions
            .get_with(id.clone(), async { Arc::new(Mutex::new(FaultSession::new())) })
            .await
    }
}

impl Default for MokaFaultSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FaultSessionStore for MokaFaultSessionStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, id: &SessionId) -> Result<Option<FaultSession>, ApplicationError> {
        Ok(self
            .sessions
            .get(id)
            .await
            .map(|entry| entry.lock().clone()))
    }

    #[instrument(skip(self, configuration), level = "debug")]
    async fn record_request(
        &self,
        id: &SessionId,
        configuration: FaultConfiguration,
    ) -> Result<AdmittedRequest, ApplicationError> {
        let entry = self.entry(id).await;
        let admitted = entry.lock().admit(configuration);
        if let AdmittedRequest::Recorded { ordinal, .. } = &admitted {
            debug!(ordinal = *ordinal, "Recorded fault session request");
        }
        Ok(admitted)
    }

    fn session_count(&self) -> u64 {
        self.sessions.entry_count()
    }

    async fn sweep(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn id(value: &str) -> SessionId {
        SessionId::new(value).unwrap()
    }

    fn reject(count: u64) -> FaultConfiguration {
        FaultConfiguration {
            reject_count: count,
            ..Default::default()
        }
    }

    fn ordinal(admitted: AdmittedRequest) -> u64 {
        match admitted {
            AdmittedRequest::Recorded { ordinal, .. } => ordinal,
            AdmittedRequest::Exhausted => panic!("session unexpectedly exhausted"),
        }
    }

    #[tokio::test]
    async fn get_does_not_create_sessions() {
        let store = MokaFaultSessionStore::new();

        assert!(store.get(&id("s")).await.unwrap().is_none());
        store.sweep().await;
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn record_request_returns_pre_increment_ordinal() {
        let store = MokaFaultSessionStore::new();

        let first = store.record_request(&id("s"), reject(3)).await.unwrap();
        let second = store.record_request(&id("s"), reject(3)).await.unwrap();

        assert_eq!(ordinal(first), 0);
        assert_eq!(ordinal(second), 1);

        let session = store.get(&id("s")).await.unwrap().unwrap();
        assert_eq!(session.request_count, 2);
        assert_eq!(session.last_configuration, Some(reject(3)));
    }

    #[tokio::test]
    async fn exhaustion_is_visible_to_later_reads() {
        let store = MokaFaultSessionStore::new();
        store.record_request(&id("s"), reject(1)).await.unwrap();
        store.record_request(&id("s"), reject(1)).await.unwrap();

        let session = store.get(&id("s")).await.unwrap().unwrap();
        assert!(session.exhausted);
        assert_eq!(session.request_count, 2);

        assert_eq!(
            store.record_request(&id("s"), reject(1)).await.unwrap(),
            AdmittedRequest::Exhausted
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_get_distinct_ordinals() {
        let store = Arc::new(MokaFaultSessionStore::new());
        let mut handles = Vec::new();

        for _ in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                ordinal(store.record_request(&id("shared"), reject(64)).await.unwrap())
            }));
        }

        let mut ordinals = Vec::new();
        for handle in handles {
            ordinals.push(handle.await.unwrap());
        }
        ordinals.sort_unstable();

        assert_eq!(ordinals, (0..64).collect::<Vec<u64>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_past_exhaustion_freeze_the_count() {
        let store = Arc::new(MokaFaultSessionStore::new());
        let mut handles = Vec::new();

        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.record_request(&id("racing"), reject(4)).await.unwrap()
            }));
        }

        let mut recorded = 0;
        for handle in handles {
            if let AdmittedRequest::Recorded { .. } = handle.await.unwrap() {
                recorded += 1;
            }
        }

        // Four rejects plus the single request that exhausted the session.
        assert_eq!(recorded, 5);
        let session = store.get(&id("racing")).await.unwrap().unwrap();
        assert!(session.exhausted);
        assert_eq!(session.request_count, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sessions_do_not_share_counts() {
        let store = Arc::new(MokaFaultSessionStore::new());
        let mut handles = Vec::new();

        for i in 0..40 {
            let store = Arc::clone(&store);
            let name = if i % 2 == 0 { "even" } else { "odd" };
            handles.push(tokio::spawn(async move {
                (
                    name,
                    ordinal(store.record_request(&id(name), reject(20)).await.unwrap()),
                )
            }));
        }

        let mut even = HashSet::new();
        let mut odd = HashSet::new();
        for handle in handles {
            let (name, ordinal) = handle.await.unwrap();
            if name == "even" {
                assert!(even.insert(ordinal));
            } else {
                assert!(odd.insert(ordinal));
            }
        }

        assert_eq!(even, (0..20).collect());
        assert_eq!(odd, (0..20).collect());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = MokaFaultSessionStore::with_config(SessionStoreConfig {
            max_sessions: 100,
            idle_ttl: Duration::from_millis(50),
        });

        store.record_request(&id("s"), reject(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        store.sweep().await;

        assert!(store.get(&id("s")).await.unwrap().is_none());
        assert_eq!(store.session_count(), 0);

        // An expired identifier starts over at ordinal 0.
        let admitted = store.record_request(&id("s"), reject(1)).await.unwrap();
        assert_eq!(ordinal(admitted), 0);
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let store = MokaFaultSessionStore::with_config(SessionStoreConfig {
            max_sessions: 4,
            idle_ttl: Duration::from_secs(60),
        });

        for i in 0..32 {
            store
                .record_request(&id(&format!("s{i}")), reject(1))
                .await
                .unwrap();
        }
        store.sweep().await;

        assert!(store.session_count() <= 4);
    }

    #[test]
    fn debug_shows_entries() {
        let store = MokaFaultSessionStore::new();
        assert!(format!("{store:?}").contains("entries"));
    }
}
