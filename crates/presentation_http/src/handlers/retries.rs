//! Retry demo endpoint
//!
//! Fails with `503` until the caller has tried `num-retries` times under the
//! same `request-id`, then succeeds once and forgets the id.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::AppState;

const DEFAULT_NUM_RETRIES: i64 = 3;

/// Query parameters of the retry endpoint
#[derive(Debug, Default, Deserialize)]
pub struct RetryParams {
    #[serde(rename = "request-id")]
    pub request_id: Option<String>,
    #[serde(rename = "num-retries")]
    pub num_retries: Option<String>,
    #[serde(rename = "retry-after-val")]
    pub retry_after_val: Option<String>,
}

/// Successful retry response
#[derive(Debug, Serialize, Deserialize)]
pub struct RetriesResponse {
    /// Attempts it took to get here
    pub retries: u32,
}

fn parse_optional(raw: Option<&str>, name: &str, default: i64) -> Result<i64, Response> {
    match raw.filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            (StatusCode::BAD_REQUEST, format!("{name} must be an integer")).into_response()
        }),
    }
}

/// Count attempts per `request-id` and succeed after enough of them
pub async fn retries(State(state): State<AppState>, Query(params): Query<RetryParams>) -> Response {
    let retry_after = match parse_optional(params.retry_after_val.as_deref(), "retry-after-val", 0)
    {
        Ok(v) => v,
        Err(response) => return response,
    };
    let num_retries = match parse_optional(
        params.num_retries.as_deref(),
        "num-retries",
        DEFAULT_NUM_RETRIES,
    ) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let Some(request_id) = params.request_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "request-id is required").into_response();
    };

    let attempt = state.retry_tracker.record_attempt(&request_id);
    debug!(request_id = %request_id, attempt = attempt, "Retry attempt");

    if i64::from(attempt) < num_retries {
        let mut response =
            (StatusCode::SERVICE_UNAVAILABLE, "request failed please retry").into_response();
        if retry_after > 0 {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, retry_after.into());
        }
        return response;
    }

    state.retry_tracker.forget(&request_id);
    Json(RetriesResponse { retries: attempt }).into_response()
}
