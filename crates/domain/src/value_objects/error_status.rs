//! Status code for injected errors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A validated HTTP status code in the 100–599 range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct ErrorStatus(u16);

impl ErrorStatus {
    /// Validate a raw status code
    pub fn new(code: u16) -> Result<Self, DomainError> {
        if (100..=599).contains(&code) {
            Ok(Self(code))
        } else {
            Err(DomainError::InvalidFaultConfiguration(format!(
                "error_code {code} is not a valid HTTP status"
            )))
        }
    }

    /// Get the numeric status code
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for ErrorStatus {
    type Error = DomainError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<ErrorStatus> for u16 {
    fn from(status: ErrorStatus) -> Self {
        status.0
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
