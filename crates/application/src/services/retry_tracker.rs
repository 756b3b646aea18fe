//! Call counting for the retry demo endpoint
//!
//! Each caller-chosen request id accumulates attempts until the endpoint
//! decides the caller has retried enough, at which point the id is forgotten.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Per-request-id attempt counter
#[derive(Debug, Default)]
pub struct RetryTracker {
    attempts: Mutex<HashMap<String, u32>>,
}

impl RetryTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt for `request_id` and return the attempt number (1-based)
    pub fn record_attempt(&self, request_id: &str) -> u32 {
        let mut attempts = self.attempts.lock();
        let count = attempts.entry(request_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Forget all attempts for `request_id`
    pub fn forget(&self, request_id: &str) {
        self.attempts.lock().remove(request_id);
    }

    /// Number of request ids currently tracked
    pub fn tracked(&self) -> usize {
        self.attempts.lock().len()
    }
}
