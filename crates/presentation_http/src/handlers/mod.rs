//! HTTP request handlers

pub mod errors;
pub mod retries;
pub mod system;
