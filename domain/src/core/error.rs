//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown task category: {0}")]
    UnknownCategory(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Malformed collaborator output: {0}")]
    MalformedOutput(String),
}

impl DomainError {
    /// Check if this error came from parsing a collaborator's output
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, DomainError::MalformedOutput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::UnknownRole("oracle".to_string());
        assert_eq!(error.to_string(), "Unknown role: oracle");
    }

    #[test]
    fn test_is_malformed_output() {
        assert!(DomainError::MalformedOutput("no json".to_string()).is_malformed_output());
        assert!(!DomainError::UnknownMode("fast".to_string()).is_malformed_output());
    }
}
