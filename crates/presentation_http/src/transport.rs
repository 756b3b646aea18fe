//! Connection takeover capability
//!
//! Transport faults need to act on the TCP connection underneath a request.
//! The accept loop in [`crate::server`] hands every request a
//! [`TransportHandle`] through the request extensions. Hosts that cannot
//! offer one (in-process test harnesses, other servers) simply leave it out,
//! and transport faults then fail with [`TakeoverError::Unsupported`].

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

/// How a taken-over connection is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeoverMode {
    /// Orderly close, the peer sees end-of-stream
    Close,
    /// Abortive close, the peer sees a reset
    Reset,
}

/// Errors raised when taking over a connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TakeoverError {
    #[error("connection takeover is not supported by this transport")]
    Unsupported,

    #[error("connection has already been taken over")]
    AlreadyTakenOver,
}

/// Something able to tear down the connection a request arrived on
pub trait ConnectionTakeover: Send + Sync + fmt::Debug {
    /// Ask the owner of the connection to tear it down with `mode`.
    ///
    /// On success no response must be written for the current request.
    fn take_over(&self, mode: TakeoverMode) -> Result<(), TakeoverError>;
}

/// Request extension carrying the connection takeover capability
#[derive(Debug, Clone)]
pub struct TransportHandle(Arc<dyn ConnectionTakeover>);

impl TransportHandle {
    /// Wrap a takeover implementation
    pub fn new(takeover: Arc<dyn ConnectionTakeover>) -> Self {
        Self(takeover)
    }

    /// Tear down the underlying connection
    pub fn take_over(&self, mode: TakeoverMode) -> Result<(), TakeoverError> {
        self.0.take_over(mode)
    }
}

/// Takeover backed by a one-shot channel to the connection task
///
/// The connection task owns the socket and waits on the receiving half; the
/// first takeover request wins and later ones are refused.
#[derive(Debug)]
pub struct ConnectionControl {
    sender: Mutex<Option<oneshot::Sender<TakeoverMode>>>,
}

impl ConnectionControl {
    /// Create a control and the receiver the connection task listens on
    pub fn channel() -> (Arc<Self>, oneshot::Receiver<TakeoverMode>) {
        let (tx, rx) = oneshot::channel();
        let control = Arc::new(Self {
            sender: Mutex::new(Some(tx)),
        });
        (control, rx)
    }
}

impl ConnectionTakeover for ConnectionControl {
    fn take_over(&self, mode: TakeoverMode) -> Result<(), TakeoverError> {
        let sender = self
            .sender
            .lock()
            .take()
            .ok_or(TakeoverError::AlreadyTakenOver)?;

        // A dropped receiver means the connection is already gone.
        sender
            .send(mode)
            .map_err(|_| TakeoverError::AlreadyTakenOver)
    }
}
