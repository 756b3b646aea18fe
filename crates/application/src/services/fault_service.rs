//! Fault session engine
//!
//! Turns the two pieces of request metadata (session identifier and raw fault
//! settings) into a [`FaultDecision`]. The HTTP layer executes the decision;
//! this service owns the session bookkeeping around it.

use std::{fmt, sync::Arc};

use domain::{AdmittedRequest, FaultChain, FaultConfiguration, SessionId};
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::FaultSessionStore};

/// What the HTTP layer should do with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultDecision {
    /// Session identifier or settings missing; the engine stays out of the way
    Inert,
    /// The session was exhausted earlier; pass through untouched
    PassThrough {
        /// Session the request belongs to
        session_id: SessionId,
    },
    /// Apply a non-empty fault chain
    Inject {
        /// Session the request belongs to
        session_id: SessionId,
        /// Zero-based position of the request within its session
        ordinal: u64,
        /// Faults to apply, in order
        chain: FaultChain,
    },
    /// This request found nothing to inject and flipped the session to exhausted
    Exhausted {
        /// Session the request belongs to
        session_id: SessionId,
        /// Zero-based position of the request within its session
        ordinal: u64,
    },
}

impl FaultDecision {
    /// The fault chain to apply, if any
    pub const fn chain(&self) -> Option<&FaultChain> {
        match self {
            Self::Inject { chain, .. } => Some(chain),
            _ => None,
        }
    }
}

/// Service deciding which faults apply to each request of a session
pub struct FaultService {
    store: Arc<dyn FaultSessionStore>,
}

impl fmt::Debug for FaultService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultService")
            .field("sessions", &self.store.session_count())
            .finish()
    }
}

impl FaultService {
    /// Create a new fault service backed by `store`
    pub fn new(store: Arc<dyn FaultSessionStore>) -> Self {
        Self { store }
    }

    /// Access the underlying session store
    pub fn store(&self) -> &Arc<dyn FaultSessionStore> {
        &self.store
    }

    /// Evaluate one request
    ///
    /// Malformed settings fail before the session store is touched, so the
    /// next well-formed request keeps the ordinal the failed one would have
    /// had and no session is created for it. Exhausted sessions never look at
    /// the settings again.
    #[instrument(skip(self, settings), level = "debug")]
    pub async fn evaluate(
        &self,
        session: Option<&str>,
        settings: Option<&str>,
    ) -> Result<FaultDecision, ApplicationError> {
        let (Some(raw_id), Some(raw_settings)) = (session, settings) else {
            return Ok(FaultDecision::Inert);
        };

        if raw_settings.is_empty() {
            return Ok(FaultDecision::Inert);
        }

        let Ok(session_id) = SessionId::new(raw_id) else {
            return Ok(FaultDecision::Inert);
        };

        let exhausted = self
            .store
            .get(&session_id)
            .await?
            .is_some_and(|session| session.exhausted);
        if exhausted {
            debug!(session = %session_id, "Fault session exhausted, passing through");
            return Ok(FaultDecision::PassThrough { session_id });
        }

        let configuration = FaultConfiguration::parse(raw_settings)?;

        let (ordinal, chain) = match self
            .store
            .record_request(&session_id, configuration)
            .await?
        {
            AdmittedRequest::Exhausted => {
                debug!(session = %session_id, "Fault session exhausted concurrently");
                return Ok(FaultDecision::PassThrough { session_id });
            },
            AdmittedRequest::Recorded { ordinal, chain } => (ordinal, chain),
        };

        if chain.is_empty() {
            info!(
                session = %session_id,
                ordinal = ordinal,
                "Fault session exhausted"
            );
            return Ok(FaultDecision::Exhausted {
                session_id,
                ordinal,
            });
        }

        debug!(
            session = %session_id,
            ordinal = ordinal,
            chain = %chain,
            "Fault chain selected"
        );

        Ok(FaultDecision::Inject {
            session_id,
            ordinal,
            chain,
        })
    }
}
