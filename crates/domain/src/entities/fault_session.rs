//! Fault session entity
//!
//! One session per caller-chosen identifier. A session is active until the
//! first request whose fault chain comes out empty, after which it is
//! exhausted for good and every request passes straight through.

use serde::Serialize;

use crate::{
    fault_chain::{FaultChain, build_fault_chain},
    value_objects::FaultConfiguration,
};

/// Outcome of admitting one request into a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmittedRequest {
    /// The session was already exhausted; nothing was recorded
    Exhausted,
    /// The request was counted
    ///
    /// An empty chain means this request exhausted the session.
    Recorded {
        /// Zero-based position of the request within its session
        ordinal: u64,
        /// Faults selected for the request
        chain: FaultChain,
    },
}

/// Per-session fault bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaultSession {
    /// Number of requests recorded so far
    pub request_count: u64,
    /// Set once no configured fault category applies
    pub exhausted: bool,
    /// Configuration supplied with the most recent recorded request
    pub last_configuration: Option<FaultConfiguration>,
}

impl FaultSession {
    /// Create an empty, active session
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request and select its fault chain
    ///
    /// Exhausted sessions are left untouched. A request whose chain is empty
    /// flips the session to exhausted, so the count freezes at that request.
    pub fn admit(&mut self, configuration: FaultConfiguration) -> AdmittedRequest {
        if self.exhausted {
            return AdmittedRequest::Exhausted;
        }

        let ordinal = self.request_count;
        self.request_count = self.request_count.saturating_add(1);
        self.last_configuration = Some(configuration);

        let chain = build_fault_chain(ordinal, &configuration);
        if chain.is_empty() {
            self.exhausted = true;
        }

        AdmittedRequest::Recorded { ordinal, chain }
    }
}
