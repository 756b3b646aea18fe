//! Domain layer for Faultline
//!
//! Contains the fault-injection vocabulary: per-request fault configuration,
//! the behaviors a request can be subjected to, the pure chain builder that
//! maps a request ordinal onto those behaviors, and the session entity.
//! This layer has no I/O and no async code.

pub mod entities;
pub mod errors;
pub mod fault_chain;
pub mod value_objects;

pub use entities::{AdmittedRequest, FaultSession};
pub use errors::DomainError;
pub use fault_chain::{FaultBehavior, FaultChain, build_fault_chain};
pub use value_objects::*;
