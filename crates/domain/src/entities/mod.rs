//! Domain entities - Objects with identity and lifecycle

mod fault_session;

pub use fault_session::{AdmittedRequest, FaultSession};
