//! Validation Error Types

use thiserror::Error;

/// Errors during input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Binary flag that is neither 0 nor 1
    #[error("{field} must be 0 or 1, got {value}")]
    InvalidFlag { field: &'static str, value: i64 },

    /// NaN or infinite measurement
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFlag { field, .. }
            | ValidationError::NotFinite { field, .. } => field,
        }
    }
}
