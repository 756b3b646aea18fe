//! Fault session storage port
//!
//! Defines the interface for the concurrent session map backing the fault
//! engine.

use async_trait::async_trait;
use domain::{AdmittedRequest, FaultConfiguration, FaultSession, SessionId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fault session state
///
/// Implementations must be safe under arbitrary concurrent callers. Calls for
/// the same identifier serialize their read-modify-write; calls for different
/// identifiers never block each other.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FaultSessionStore: Send + Sync {
    /// Look up a session without creating it
    async fn get(&self, id: &SessionId) -> Result<Option<FaultSession>, ApplicationError>;

    /// Admit one request into the session for `id`
    ///
    /// Creates the session if it does not exist yet. Counting, chain
    /// selection and exhaustion happen under the session's lock, so an
    /// exhausted session is never counted again.
    async fn record_request(
        &self,
        id: &SessionId,
        configuration: FaultConfiguration,
    ) -> Result<AdmittedRequest, ApplicationError>;

    /// Approximate number of live sessions
    fn session_count(&self) -> u64;

    /// Run pending eviction work (idle expiry, capacity trimming)
    async fn sweep(&self);
}
