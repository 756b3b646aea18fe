//! Value Objects - Immutable, identity-less domain primitives

mod error_status;
mod fault_configuration;
mod session_id;

pub use error_status::ErrorStatus;
pub use fault_configuration::FaultConfiguration;
pub use session_id::SessionId;
