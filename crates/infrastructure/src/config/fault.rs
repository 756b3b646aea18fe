//! Fault injection engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Fault injection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultAppConfig {
    /// Enable the fault injection layer
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Header carrying the caller-chosen session identifier
    #[serde(default = "default_session_header")]
    pub session_header: String,

    /// Header carrying the JSON fault settings
    #[serde(default = "default_settings_header")]
    pub settings_header: String,

    /// Response header signalling that fault handling is active
    #[serde(default = "default_marker_header")]
    pub marker_header: String,

    /// Idle time in seconds after which a session is forgotten (default: 5 minutes)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Maximum number of live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,

    /// Interval in seconds between session sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_session_header() -> String {
    "request-id".to_string()
}

fn default_settings_header() -> String {
    "fault-settings".to_string()
}

fn default_marker_header() -> String {
    "Faults-Enabled".to_string()
}

const fn default_session_ttl() -> u64 {
    300
}

const fn default_max_sessions() -> u64 {
    10_000
}

const fn default_sweep_interval() -> u64 {
    60
}

impl FaultAppConfig {
    /// Session idle TTL as a duration
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Sweep interval as a duration
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for FaultAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_header: default_session_header(),
            settings_header: default_settings_header(),
            marker_header: default_marker_header(),
            session_ttl_secs: default_session_ttl(),
            max_sessions: default_max_sessions(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}
