//! Fault session sweep task
//!
//! The session store evicts idle sessions lazily. This task drives eviction
//! on a fixed cadence so memory is released even when no traffic arrives.

use std::{sync::Arc, time::Duration};

use application::ports::FaultSessionStore;
use tracing::{debug, info};

/// Default sweep interval: once per minute
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Spawn a background task that periodically sweeps expired fault sessions.
///
/// Returns a `JoinHandle` that can be used to abort the task when shutting down.
///
/// # Example
///
/// ```ignore
/// let sweep_handle = spawn_session_sweep_task(store, None);
///
/// // On shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_session_sweep_task(
    store: Arc<dyn FaultSessionStore>,
    sweep_interval: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    let interval = sweep_interval
        .filter(|d| !d.is_zero())
        .unwrap_or(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));

    info!(
        interval_secs = interval.as_secs(),
        "Starting fault session sweep task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let before = store.session_count();
            store.sweep().await;
            let after = store.session_count();

            debug!(
                sessions_before = before,
                sessions_after = after,
                "Swept fault sessions"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use domain::{FaultConfiguration, SessionId};
    use infrastructure::{MokaFaultSessionStore, SessionStoreConfig};

    use super::*;

    #[tokio::test]
    async fn sweep_evicts_idle_sessions() {
        let store = Arc::new(MokaFaultSessionStore::with_config(SessionStoreConfig {
            max_sessions: 100,
            idle_ttl: Duration::from_millis(30),
        }));
        store
            .record_request(
                &SessionId::new("idle").unwrap(),
                FaultConfiguration::default(),
            )
            .await
            .unwrap();

        let handle = spawn_session_sweep_task(store.clone(), Some(Duration::from_millis(20)));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn task_can_be_aborted() {
        let store = Arc::new(MokaFaultSessionStore::new());
        let handle = spawn_session_sweep_task(store, Some(Duration::from_secs(3600)));
        handle.abort();

        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn zero_interval_falls_back_to_default() {
        let store = Arc::new(MokaFaultSessionStore::new());

        // A zero interval would panic inside tokio::time::interval.
        let handle = spawn_session_sweep_task(store, Some(Duration::ZERO));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
