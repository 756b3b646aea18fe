//! Background tasks for the HTTP presentation layer

mod session_sweep;

pub use session_sweep::spawn_session_sweep_task;
