//! Adapters implementing application ports

mod moka_fault_session_store;

pub use moka_fault_session_store::{MokaFaultSessionStore, SessionStoreConfig};
