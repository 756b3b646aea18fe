//! Fault chain construction
//!
//! Maps a request's ordinal position within its session onto the ordered
//! list of faults that request is subjected to. The builder is a pure
//! function of `(ordinal, configuration)`; all session state lives in the
//! store that hands out ordinals.

use std::{fmt, time::Duration};

use serde::Serialize;

use crate::value_objects::{ErrorStatus, FaultConfiguration};

/// A single fault applied to an in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FaultBehavior {
    /// Suspend the request before continuing
    Delay(Duration),
    /// Close the transport without writing a response
    ConnectionClose,
    /// Abort the transport so the peer observes a reset
    ConnectionReset,
    /// Never answer and never close
    Reject,
    /// Answer with the given status and a fixed diagnostic body
    Error(ErrorStatus),
}

impl FaultBehavior {
    /// Terminal behaviors end the exchange without calling the wrapped handler
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Delay(_))
    }

    /// Short name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Delay(_) => "delay",
            Self::ConnectionClose => "connection_close",
            Self::ConnectionReset => "connection_reset",
            Self::Reject => "reject",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for FaultBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delay(d) => write!(f, "delay({}ms)", d.as_millis()),
            Self::Error(status) => write!(f, "error({status})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Ordered faults for one request, possibly empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FaultChain(Vec<FaultBehavior>);

impl FaultChain {
    /// Create a chain from behaviors in application order
    pub const fn new(behaviors: Vec<FaultBehavior>) -> Self {
        Self(behaviors)
    }

    /// An empty chain means the session has nothing left to inject
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate behaviors in application order
    pub fn iter(&self) -> std::slice::Iter<'_, FaultBehavior> {
        self.0.iter()
    }

    /// The first terminal behavior, which is the one that ends the exchange
    pub fn terminal(&self) -> Option<&FaultBehavior> {
        self.0.iter().find(|b| b.is_terminal())
    }

    /// Behaviors as a slice
    pub fn as_slice(&self) -> &[FaultBehavior] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a FaultChain {
    type Item = &'a FaultBehavior;
    type IntoIter = std::slice::Iter<'a, FaultBehavior>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FaultChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Decide which faults apply to the request at `ordinal`
///
/// Categories are evaluated in precedence order: delay, connection close,
/// connection reset, reject, error. Delay windows always start at ordinal 0
/// and do not shift the other categories. Each terminal category's window
/// starts where the previous terminal category's window ended.
///
/// Once this returns an empty chain for some ordinal it returns an empty
/// chain for every later ordinal under the same configuration.
pub fn build_fault_chain(ordinal: u64, config: &FaultConfiguration) -> FaultChain {
    let mut behaviors = Vec::new();
    let mut offset: u64 = 0;

    if config.delay_ms > 0 && ordinal < config.delay_count {
        behaviors.push(FaultBehavior::Delay(config.delay()));
    }

    if config.connection_close_count > 0
        && ordinal < config.connection_close_count.saturating_add(offset)
    {
        behaviors.push(FaultBehavior::ConnectionClose);
    }
    offset = offset.saturating_add(config.connection_close_count);

    if config.connection_reset_count > 0
        && ordinal < config.connection_reset_count.saturating_add(offset)
    {
        behaviors.push(FaultBehavior::ConnectionReset);
    }
    offset = offset.saturating_add(config.connection_reset_count);

    if config.reject_count > 0 && ordinal < config.reject_count.saturating_add(offset) {
        behaviors.push(FaultBehavior::Reject);
    }
    offset = offset.saturating_add(config.reject_count);

    if let Some(status) = config.error_status() {
        if ordinal < config.error_count.saturating_add(offset) {
            behaviors.push(FaultBehavior::Error(status));
        }
    }

    FaultChain::new(behaviors)
}
