//! Application layer - Use cases and orchestration
//!
//! Hosts the fault session engine: the store port, the service that turns
//! request metadata into a fault decision, and the retry bookkeeping used by
//! the retry demo endpoint.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
