//! Domain error types
//!
//! Error types for domain-level validation failures. Adapter and transport
//! failures are represented at port boundaries with `anyhow::Error` instead.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Booking identifier is empty or otherwise unusable
    #[error("Invalid booking id: {0}")]
    InvalidBookingId(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidBookingId("<blank>".to_string());
        assert_eq!(err.to_string(), "Invalid booking id: <blank>");

        let err = DomainError::ValidationFailed("bad record".to_string());
        assert_eq!(err.to_string(), "Validation failed: bad record");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidBookingId("x".to_string());
        let err2 = DomainError::InvalidBookingId("x".to_string());
        let err3 = DomainError::InvalidBookingId("y".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
