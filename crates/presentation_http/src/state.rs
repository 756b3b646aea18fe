//! Application state shared across handlers

use std::sync::Arc;

use application::{FaultService, RetryTracker};
use infrastructure::{AppConfig, MokaFaultSessionStore, SessionStoreConfig};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fault session engine
    pub fault_service: Arc<FaultService>,
    /// Attempt counts for the retry endpoint
    pub retry_tracker: Arc<RetryTracker>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state around an existing fault service
    pub fn new(fault_service: Arc<FaultService>, config: Arc<AppConfig>) -> Self {
        Self {
            fault_service,
            retry_tracker: Arc::new(RetryTracker::new()),
            config,
        }
    }

    /// Build state with an in-memory session store sized from `config`
    pub fn from_config(config: AppConfig) -> (Self, Arc<MokaFaultSessionStore>) {
        let store = Arc::new(MokaFaultSessionStore::with_config(SessionStoreConfig {
            max_sessions: config.fault.max_sessions,
            idle_ttl: config.fault.session_ttl(),
        }));
        let fault_service = Arc::new(FaultService::new(store.clone()));
        (Self::new(fault_service, Arc::new(config)), store)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(AppConfig::default()).0
    }
}
