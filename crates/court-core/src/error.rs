//! Error taxonomy for structural failures
//!
//! Content failures (text generation, score parsing) never surface here; they are
//! absorbed by fallbacks and reported as a `fallback` flag on the produced value.

use thiserror::Error;

/// Result alias used across the court crates
pub type CourtResult<T> = Result<T, CourtError>;

/// Structural errors rejected synchronously at the call that introduced them
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CourtError {
    /// Missing case fields, text outside the length band, confidence out of range
    #[error("Validation error: {0}")]
    Validation(String),
    /// Out-of-turn posting, double posting, re-voting
    #[error("Ordering violation: {0}")]
    OrderingViolation(String),
    /// Unknown case or judge
    #[error("Not found: {0}")]
    NotFound(String),
    /// Illegal edge in the case state machine
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    /// Appeal filed by the wrong party, twice, or on a decisive verdict
    #[error("Appeal rejected: {0}")]
    AppealRejected(String),
}

impl CourtError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn ordering(msg: impl Into<String>) -> Self {
        Self::OrderingViolation(msg.into())
    }

    /// Whether retrying the same call later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OrderingViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CourtError::ordering("round 2 posted before round 1 closed");
        assert_eq!(
            err.to_string(),
            "Ordering violation: round 2 posted before round 1 closed"
        );
        assert!(err.is_retryable());
        assert!(!CourtError::validation("empty summary").is_retryable());
    }
}
