//! Faultline HTTP presentation layer
//!
//! Hosts the fault injection middleware, the hyper accept loop that lets
//! faults take over connections, and a handful of demo endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod tasks;
pub mod transport;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{FaultHeaderNames, FaultInjectionLayer, RequestIdLayer, TeapotLayer};
pub use routes::{create_app, create_router};
pub use state::AppState;
pub use transport::{ConnectionTakeover, TakeoverError, TakeoverMode, TransportHandle};
