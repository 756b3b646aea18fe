//! Route definitions

use axum::{
    Router,
    http::header::InvalidHeaderName,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers,
    middleware::{FaultHeaderNames, FaultInjectionLayer, RequestIdLayer, TeapotLayer},
    state::AppState,
};

/// Create the router with all routes and no middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::system::ping))
        .route("/health", get(handlers::system::health_check))
        // Retry demo
        .route(
            "/retries",
            get(handlers::retries::retries).post(handlers::retries::retries),
        )
        .route("/retries/after", get(handlers::retries::retries))
        // Status code echo
        .route(
            "/errors/{status_code}",
            get(handlers::errors::get_error).post(handlers::errors::post_error),
        )
        .with_state(state)
}

/// Create the full application: routes wrapped in the middleware stack
///
/// Outermost first: tracing, request correlation, teapot, fault injection.
pub fn create_app(state: AppState) -> Result<Router, InvalidHeaderName> {
    let fault = &state.config.fault;
    let fault_layer = fault.enabled.then(|| {
        FaultHeaderNames::from_config(fault)
            .map(|names| FaultInjectionLayer::with_headers(state.fault_service.clone(), names))
    });

    let mut app = create_router(state.clone());
    if let Some(layer) = fault_layer.transpose()? {
        app = app.layer(layer);
    }

    Ok(app
        .layer(TeapotLayer::new())
        .layer(RequestIdLayer::new())
        .layer(TraceLayer::new_for_http()))
}
