//! Liveness endpoints

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Fault sessions currently held in memory
    pub active_fault_sessions: u64,
}

/// Answer `pong`
pub async fn ping() -> &'static str {
    "pong"
}

/// Liveness check - is the server running?
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_fault_sessions: state.fault_service.store().session_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ping_answers_pong() {
        assert_eq!(ping().await, "pong");
    }

    #[tokio::test]
    async fn health_reports_version_and_sessions() {
        let Json(resp) = health_check(State(AppState::default())).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(resp.active_fault_sessions, 0);
    }

    #[test]
    fn health_response_serialization() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            active_fault_sessions: 3,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["active_fault_sessions"], 3);
    }
}
