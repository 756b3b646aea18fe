//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the error was caused by the caller's input
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_client_errors() {
        let err: ApplicationError =
            DomainError::InvalidFaultConfiguration("bad".to_string()).into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid fault settings: bad");
    }

    #[test]
    fn internal_errors_are_not_client_errors() {
        let err = ApplicationError::Internal("store poisoned".to_string());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Internal error: store poisoned");
    }
}
