//! Teapot short-circuit
//!
//! Any request carrying `x-teapot` is answered with `418` before the fault
//! engine ever sees it. `x-teapot: json` selects a JSON body.

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

/// Header that triggers the teapot response
pub const TEAPOT_HEADER: &str = "x-teapot";

const JSON_BODY: &str = r#"{"message": "I'm a teapot"}"#;
const TEXT_BODY: &str = "I'm a teapot\n";

/// Layer answering `418` to requests carrying [`TEAPOT_HEADER`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TeapotLayer;

impl TeapotLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TeapotLayer {
    type Service = Teapot<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Teapot { inner }
    }
}

#[derive(Debug, Clone)]
pub struct Teapot<S> {
    inner: S,
}

impl<S> Service<Request> for Teapot<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let Some(format) = request.headers().get(TEAPOT_HEADER) else {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(request).await });
        };

        let response = if format.as_bytes() == b"json" {
            (
                StatusCode::IM_A_TEAPOT,
                [(header::CONTENT_TYPE, "application/json")],
                JSON_BODY,
            )
                .into_response()
        } else {
            (
                StatusCode::IM_A_TEAPOT,
                [(header::CONTENT_TYPE, "text/plain")],
                TEXT_BODY,
            )
                .into_response()
        };

        Box::pin(async move { Ok(response) })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, body::to_bytes, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "brewed" }))
            .layer(TeapotLayer::new())
    }

    async fn send(teapot: Option<&str>) -> (StatusCode, String, String) {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = teapot {
            builder = builder.header(TEAPOT_HEADER, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn without_header_request_passes() {
        let (status, _, body) = send(None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "brewed");
    }

    #[tokio::test]
    async fn json_format() {
        let (status, content_type, body) = send(Some("json")).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, JSON_BODY);
    }

    #[tokio::test]
    async fn any_other_value_is_text() {
        let (status, content_type, body) = send(Some("yes")).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, TEXT_BODY);
    }
}
