//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Fault settings could not be parsed or contain out-of-range values
    #[error("Invalid fault settings: {0}")]
    InvalidFaultConfiguration(String),

    /// Session identifier is empty or otherwise unusable
    #[error("Invalid session identifier: {0}")]
    InvalidSessionId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fault_configuration_message() {
        let err = DomainError::InvalidFaultConfiguration("expected value".to_string());
        assert_eq!(err.to_string(), "Invalid fault settings: expected value");
    }

    #[test]
    fn invalid_session_id_message() {
        let err = DomainError::InvalidSessionId("empty".to_string());
        assert_eq!(err.to_string(), "Invalid session identifier: empty");
    }
}
