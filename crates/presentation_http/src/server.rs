//! HTTP/1 accept loop with connection takeover
//!
//! Connections are served directly with hyper so that each connection task
//! keeps ownership of its socket. Requests receive a [`TransportHandle`]; when
//! a transport fault fires the task stops driving hyper and drops the socket,
//! after setting `SO_LINGER(0)` for resets so the kernel sends RST.

use std::{future::Future, io, net::SocketAddr, time::Duration};

use axum::{Router, extract::Request};
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use socket2::SockRef;
use thiserror::Error;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::watch,
    task::JoinSet,
};
use tower::ServiceExt;
use tracing::{debug, info, warn};

use crate::transport::{ConnectionControl, TakeoverMode, TransportHandle};

/// Errors ending a single connection
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("http error: {0}")]
    Http(#[from] hyper::Error),
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// After shutdown is signalled the listener is closed, open connections are
/// asked to finish their in-flight request, and any still open after
/// `drain_timeout` are aborted.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F, drain_timeout: Duration)
where
    F: Future<Output = ()> + Send,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    },
                };

                let app = app.clone();
                let shutdown_rx = shutdown_rx.clone();
                connections.spawn(async move {
                    if let Err(e) = serve_connection(stream, peer, app, shutdown_rx).await {
                        debug!(peer = %peer, error = %e, "Connection ended with error");
                    }
                });
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {},
        }
    }

    drop(listener);
    // Receivers only observe the change; a send error means none are left.
    let _ = shutdown_tx.send(true);
    info!(open_connections = connections.len(), "Draining connections");

    let drained = tokio::time::timeout(drain_timeout, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(
            open_connections = connections.len(),
            timeout_secs = drain_timeout.as_secs(),
            "Drain timeout elapsed, aborting connections"
        );
        connections.shutdown().await;
    }
}

/// Serve one connection until it ends, is taken over, or shutdown drains it
pub async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ConnectionError> {
    // Keep a duplicate descriptor so linger can be changed after hyper owns the stream.
    let std_stream = stream.into_std()?;
    let socket = std_stream.try_clone()?;
    let stream = TcpStream::from_std(std_stream)?;

    let (control, mut takeover) = ConnectionControl::channel();
    let handle = TransportHandle::new(control);

    let service = service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(handle.clone());
        app.clone().oneshot(request)
    });

    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let mut takeover_open = true;
    let mut draining = false;

    loop {
        tokio::select! {
            biased;
            mode = &mut takeover, if takeover_open => match mode {
                Ok(mode) => {
                    if mode == TakeoverMode::Reset {
                        if let Err(e) = SockRef::from(&socket).set_linger(Some(Duration::ZERO)) {
                            warn!(peer = %peer, error = %e, "Failed to set SO_LINGER(0)");
                        }
                    }
                    debug!(peer = %peer, mode = ?mode, "Tearing down connection");
                    return Ok(());
                },
                Err(_) => takeover_open = false,
            },
            result = conn.as_mut() => return result.map_err(Into::into),
            _ = shutdown.changed(), if !draining => {
                draining = true;
                conn.as_mut().graceful_shutdown();
            },
        }
    }
}
