//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod fault_session_store;

#[cfg(test)]
pub use fault_session_store::MockFaultSessionStore;
pub use fault_session_store::FaultSessionStore;
