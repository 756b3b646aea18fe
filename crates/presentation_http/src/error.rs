//! API error handling
//!
//! Errors leave the server as a small JSON document. Outside development the
//! details of internal failures are withheld from the body and only logged.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::transport::TakeoverError;

/// Whether internal error details are written into response bodies
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are exposed in responses.
///
/// Production deployments should pass `false`.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional error details, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status this error maps to
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let body = match self {
            Self::BadRequest(msg) => ErrorResponse {
                error: msg,
                code,
                details: None,
            },
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                ErrorResponse {
                    error: "An internal error occurred".to_string(),
                    code,
                    details: should_expose_details().then_some(msg),
                }
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<TakeoverError> for ApiError {
    fn from(err: TakeoverError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use domain::DomainError;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn api_error_messages() {
        assert_eq!(
            ApiError::BadRequest("invalid input".to_string()).to_string(),
            "Bad request: invalid input"
        );
        assert_eq!(
            ApiError::Internal("unexpected".to_string()).to_string(),
            "Internal error: unexpected"
        );
    }

    #[test]
    fn error_response_omits_empty_details() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("code"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn domain_errors_become_bad_requests() {
        let source = ApplicationError::Domain(DomainError::InvalidFaultConfiguration(
            "expected a JSON object".to_string(),
        ));
        let result: ApiError = source.into();
        assert!(matches!(result, ApiError::BadRequest(_)));
        assert_eq!(result.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_errors_become_internal() {
        let result: ApiError = ApplicationError::Internal("store down".to_string()).into();
        assert_eq!(result.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unsupported_takeover_is_internal() {
        let result: ApiError = TakeoverError::Unsupported.into();
        assert!(matches!(result, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn bad_request_body_carries_message() {
        let response =
            ApiError::BadRequest("Invalid fault settings: nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "bad_request");
        assert_eq!(body["error"], "Invalid fault settings: nope");
    }

    #[tokio::test]
    async fn internal_body_hides_message() {
        let response = ApiError::Internal("lock poisoned".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "An internal error occurred");
        assert_eq!(body["code"], "internal_error");
    }
}
