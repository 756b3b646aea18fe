//! Status code echo endpoint

use axum::{
    Json,
    body::Bytes,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body returned by `GET /errors/{status_code}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorModel {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

fn parse_status(raw: &str) -> Result<StatusCode, ApiError> {
    let code: u16 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest("status_code must be an integer".to_string()))?;
    StatusCode::from_u16(code)
        .map_err(|_| ApiError::BadRequest(format!("{code} is not a valid status code")))
}

/// Respond with the requested status and a canned error body
pub async fn get_error(Path(status_code): Path<String>) -> Result<Response, ApiError> {
    let status = parse_status(&status_code)?;
    let body = ErrorModel {
        message: "an error occurred".to_string(),
        code: status_code,
        kind: "internal".to_string(),
    };
    Ok((status, Json(body)).into_response())
}

/// Respond with the requested status, echoing the JSON request body
pub async fn post_error(
    Path(status_code): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let status = parse_status(&status_code)?;
    let echoed: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("request body must be JSON: {e}")))?;
    Ok((status, Json(echoed)).into_response())
}
