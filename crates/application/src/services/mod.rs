//! Application services - Use case implementations

mod fault_service;
mod retry_tracker;

pub use fault_service::{FaultDecision, FaultService};
pub use retry_tracker::RetryTracker;
