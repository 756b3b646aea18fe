//! Fault session identifier

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Opaque, caller-chosen identifier correlating a sequence of requests into
/// one fault schedule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session identifier, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::InvalidSessionId(
                "session identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_values() {
        let id = SessionId::new("client-run-42/attempt#1").unwrap();
        assert_eq!(id.as_str(), "client-run-42/attempt#1");
        assert_eq!(id.to_string(), "client-run-42/attempt#1");
    }

    #[test]
    fn rejects_empty() {
        assert!(SessionId::new("").is_err());
    }

    #[test]
    fn rejects_whitespace_only() {
        assert!(matches!(
            SessionId::new("   "),
            Err(DomainError::InvalidSessionId(_))
        ));
    }

    #[test]
    fn preserves_surrounding_whitespace() {
        let id = SessionId::new(" a ").unwrap();
        assert_eq!(id.as_str(), " a ");
    }
}
