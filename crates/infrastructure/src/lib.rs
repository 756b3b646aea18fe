//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer and hosts the
//! configuration and logging setup shared by the binaries.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::{MokaFaultSessionStore, SessionStoreConfig};
pub use config::{AppConfig, Environment, FaultAppConfig, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
