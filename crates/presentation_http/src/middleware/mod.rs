//! HTTP middleware

pub mod fault_injection;
pub mod request_id;
pub mod teapot;

pub use fault_injection::{
    FaultHeaderNames, FaultInjection, FaultInjectionLayer, INJECTED_ERROR_BODY, MARKER_HEADER,
    SESSION_HEADER, SETTINGS_HEADER, apply_fault_chain,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use teapot::{TEAPOT_HEADER, TeapotLayer};
