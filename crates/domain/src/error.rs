//! Unified error type for the picker core
//!
//! Configuration mistakes are reported at the setter or constructor that made
//! them, so range queries never have to defend against nonsensical state.

use thiserror::Error;

/// Unified error type for picker operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// A value failed validation (e.g., an interval outside its allowed range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Hour, minute or second outside its natural range
    #[error("Invalid timepoint: {0}")]
    InvalidTimepoint(String),

    /// Lower bound after upper bound (times, dates or years)
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A typed-key buffer the legal-time tree does not accept
    #[error("Malformed key buffer: {0}")]
    MalformedBuffer(String),
}

impl PickerError {
    /// Creates a validation error for a configuration value outside its bounds.
    ///
    /// # Example
    /// ```ignore
    /// if !(1..=24).contains(&hour_interval) {
    ///     return Err(PickerError::validation("Hour interval must be between 1 and 24"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid timepoint error
    pub fn invalid_timepoint(msg: impl Into<String>) -> Self {
        Self::InvalidTimepoint(msg.into())
    }

    /// Create an inverted range error
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Creates an error for a buffer that could not have come from the tree.
    ///
    /// This signals a desync between the caller and the automaton, never a
    /// user-facing condition: keystrokes the tree rejects are simply dropped.
    pub fn malformed_buffer(msg: impl Into<String>) -> Self {
        Self::MalformedBuffer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = PickerError::validation("hour interval must be between 1 and 24");
        assert!(matches!(err, PickerError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: hour interval must be between 1 and 24"
        );
    }

    #[test]
    fn test_invalid_timepoint_error() {
        let err = PickerError::invalid_timepoint("hour 24 is outside 0-23");
        assert!(matches!(err, PickerError::InvalidTimepoint(_)));
        assert!(err.to_string().contains("hour 24"));
    }

    #[test]
    fn test_invalid_range_error() {
        let err = PickerError::invalid_range("minimum time 10:00:00 is after maximum 09:00:00");
        assert!(matches!(err, PickerError::InvalidRange(_)));
        assert!(err.to_string().starts_with("Invalid range:"));
    }

    #[test]
    fn test_malformed_buffer_error() {
        let err = PickerError::malformed_buffer("token 9 cannot follow [9]");
        assert!(matches!(err, PickerError::MalformedBuffer(_)));
        assert_eq!(
            err.to_string(),
            "Malformed key buffer: token 9 cannot follow [9]"
        );
    }
}
