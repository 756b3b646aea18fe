//! Fault injection middleware
//!
//! Wraps the router. Each request's session and settings headers are handed
//! to the [`FaultService`]; the resulting decision is carried out here.
//!
//! Execution of a chain walks it in order: delays suspend the request,
//! the first terminal behavior ends the exchange, and a chain without a
//! terminal behavior falls through to the wrapped service.

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::{FaultDecision, FaultService};
use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::InvalidHeaderName,
    },
    response::{IntoResponse, Response},
};
use domain::{FaultBehavior, FaultChain};
use infrastructure::FaultAppConfig;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{
    error::ApiError,
    transport::{TakeoverError, TakeoverMode, TransportHandle},
};

/// Body written by the error fault
pub const INJECTED_ERROR_BODY: &str = "Injected error\n";

/// Default header carrying the session identifier
pub const SESSION_HEADER: &str = "request-id";

/// Default header carrying the fault settings document
pub const SETTINGS_HEADER: &str = "fault-settings";

/// Default header reporting whether faults were applied
pub const MARKER_HEADER: &str = "faults-enabled";

/// Header names the middleware reads and writes
#[derive(Debug, Clone)]
pub struct FaultHeaderNames {
    /// Session identifier header
    pub session: HeaderName,
    /// Fault settings header
    pub settings: HeaderName,
    /// Marker header set on responses
    pub marker: HeaderName,
}

impl Default for FaultHeaderNames {
    fn default() -> Self {
        Self {
            session: HeaderName::from_static(SESSION_HEADER),
            settings: HeaderName::from_static(SETTINGS_HEADER),
            marker: HeaderName::from_static(MARKER_HEADER),
        }
    }
}

impl FaultHeaderNames {
    /// Build header names from configuration
    pub fn from_config(config: &FaultAppConfig) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            session: HeaderName::try_from(config.session_header.as_str())?,
            settings: HeaderName::try_from(config.settings_header.as_str())?,
            marker: HeaderName::try_from(config.marker_header.as_str())?,
        })
    }
}

/// Layer applying session-scoped fault chains
#[derive(Debug, Clone)]
pub struct FaultInjectionLayer {
    service: Arc<FaultService>,
    headers: Arc<FaultHeaderNames>,
}

impl FaultInjectionLayer {
    /// Create a layer using the default header names
    pub fn new(service: Arc<FaultService>) -> Self {
        Self::with_headers(service, FaultHeaderNames::default())
    }

    /// Create a layer with custom header names
    pub fn with_headers(service: Arc<FaultService>, headers: FaultHeaderNames) -> Self {
        Self {
            service,
            headers: Arc::new(headers),
        }
    }
}

impl<S> Layer<S> for FaultInjectionLayer {
    type Service = FaultInjection<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FaultInjection {
            inner,
            service: Arc::clone(&self.service),
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service produced by [`FaultInjectionLayer`]
#[derive(Debug, Clone)]
pub struct FaultInjection<S> {
    inner: S,
    service: Arc<FaultService>,
    headers: Arc<FaultHeaderNames>,
}

impl<S> Service<Request> for FaultInjection<S>
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
        let service = Arc::clone(&self.service);
        let headers = Arc::clone(&self.headers);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let session = header_value(request.headers(), &headers.session);
            let settings = header_value(request.headers(), &headers.settings);

            let decision = match service
                .evaluate(session.as_deref(), settings.as_deref())
                .await
            {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(
                        session = session.as_deref().unwrap_or_default(),
                        error = %e,
                        "Rejected fault settings"
                    );
                    return Ok(ApiError::from(e).into_response());
                },
            };

            match decision {
                FaultDecision::Inert | FaultDecision::PassThrough { .. } => {
                    inner.call(request).await
                },
                FaultDecision::Exhausted { .. } => {
                    let mut response = inner.call(request).await?;
                    set_marker(&mut response, &headers.marker, false);
                    Ok(response)
                },
                FaultDecision::Inject {
                    session_id,
                    ordinal,
                    chain,
                } => {
                    let span = info_span!(
                        "fault_chain",
                        session = %session_id,
                        ordinal = ordinal,
                        chain = %chain,
                    );
                    apply_fault_chain(&chain, request, inner, &headers.marker)
                        .instrument(span)
                        .await
                },
            }
        })
    }
}

/// Carry out `chain` for `request`, calling `next` only if no terminal fault fires
///
/// Transport faults and rejects never complete: the returned future stays
/// pending until the connection task drops it.
pub async fn apply_fault_chain<S>(
    chain: &FaultChain,
    request: Request,
    mut next: S,
    marker: &HeaderName,
) -> Result<Response, S::Error>
where
    S: Service<Request, Response = Response>,
{
    for behavior in chain {
        match *behavior {
            FaultBehavior::Delay(duration) => {
                debug!(delay = ?duration, "Delaying request");
                tokio::time::sleep(duration).await;
            },
            FaultBehavior::ConnectionClose => {
                return Ok(take_over(transport_handle(&request), TakeoverMode::Close).await);
            },
            FaultBehavior::ConnectionReset => {
                return Ok(take_over(transport_handle(&request), TakeoverMode::Reset).await);
            },
            FaultBehavior::Reject => {
                info!("Rejecting request, leaving connection open");
                return std::future::pending().await;
            },
            FaultBehavior::Error(status) => {
                info!(status = status.as_u16(), "Injecting error response");
                let status = StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let mut response = (status, INJECTED_ERROR_BODY).into_response();
                set_marker(&mut response, marker, true);
                return Ok(response);
            },
        }
    }

    let mut response = next.call(request).await?;
    set_marker(&mut response, marker, true);
    Ok(response)
}

/// Hand the connection to its owner for teardown, or explain why not
async fn take_over(handle: Option<TransportHandle>, mode: TakeoverMode) -> Response {
    let result = handle
        .ok_or(TakeoverError::Unsupported)
        .and_then(|handle| handle.take_over(mode));

    match result {
        Ok(()) => {
            info!(mode = ?mode, "Connection handed over for teardown");
            std::future::pending().await
        },
        Err(e) => {
            warn!(mode = ?mode, error = %e, "Transport fault could not be applied");
            ApiError::from(e).into_response()
        },
    }
}

fn transport_handle(request: &Request) -> Option<TransportHandle> {
    request.extensions().get::<TransportHandle>().cloned()
}

fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn set_marker(response: &mut Response, marker: &HeaderName, applied: bool) {
    let value = if applied { "true" } else { "false" };
    response
        .headers_mut()
        .insert(marker.clone(), HeaderValue::from_static(value));
}
