//! Faultline HTTP Server
//!
//! Mock HTTP endpoint with session-scoped fault injection.

use std::time::Duration;

use infrastructure::{AppConfig, Environment, init_telemetry};
use presentation_http::{
    routes, server, set_expose_internal_errors, state::AppState, tasks::spawn_session_sweep_task,
};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can be configured
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_telemetry(&config.telemetry)?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!("🧨 Faultline v{} starting...", env!("CARGO_PKG_VERSION"));

    let environment = config.environment();
    set_expose_internal_errors(environment == Environment::Development);

    info!(
        environment = %environment,
        host = %config.server.host,
        port = config.server.port,
        faults_enabled = config.fault.enabled,
        session_header = %config.fault.session_header,
        settings_header = %config.fault.settings_header,
        "Configuration loaded"
    );

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    let sweep_interval = config.fault.sweep_interval();

    let (state, store) = AppState::from_config(config);
    let sweep_handle = spawn_session_sweep_task(store, Some(sweep_interval));

    let app = routes::create_app(state)
        .map_err(|e| anyhow::anyhow!("Invalid fault header name in configuration: {e}"))?;

    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    server::serve(listener, app, shutdown_signal(), shutdown_timeout).await;

    sweep_handle.abort();
    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
