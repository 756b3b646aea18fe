//! Per-request fault configuration
//!
//! Clients send the configuration as a JSON object on every request of a
//! session. Every count is expressed in requests; categories are consumed in
//! the precedence order delay, connection close, connection reset, reject,
//! error (see [`crate::build_fault_chain`]).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ErrorStatus;
use crate::errors::DomainError;

/// Fault injection settings for one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultConfiguration {
    /// Milliseconds to delay each delayed request
    pub delay_ms: u64,

    /// Number of leading requests to delay
    pub delay_count: u64,

    /// Number of requests whose connection is closed without a response
    pub connection_close_count: u64,

    /// Number of requests whose connection is reset (TCP RST)
    pub connection_reset_count: u64,

    /// Number of requests left hanging without any response
    pub reject_count: u64,

    /// Number of requests answered with `error_code`
    ///
    /// Error injection only takes effect after all close, reset and reject
    /// windows have been consumed.
    pub error_count: u64,

    /// Status code returned by the error injector; zero disables it
    pub error_code: u16,
}

impl FaultConfiguration {
    /// Parse a configuration from its JSON header representation
    ///
    /// Missing keys default to zero and unknown keys are ignored. The value
    /// must be a JSON object and `error_code` must be zero or a valid status.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidFaultConfiguration(e.to_string()))?;

        if !value.is_object() {
            return Err(DomainError::InvalidFaultConfiguration(
                "expected a JSON object".to_string(),
            ));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| DomainError::InvalidFaultConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the JSON types alone cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.error_code != 0 {
            ErrorStatus::new(self.error_code)?;
        }
        Ok(())
    }

    /// Delay applied to delayed requests
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Status for injected errors, if the error injector is enabled
    pub fn error_status(&self) -> Option<ErrorStatus> {
        if self.error_code == 0 {
            None
        } else {
            ErrorStatus::new(self.error_code).ok()
        }
    }
}
