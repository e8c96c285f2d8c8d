//! Feature Pipeline Error Types

use crate::schema::Feature;
use data_validator::ValidationError;
use thiserror::Error;

/// Errors raised while turning a raw input into a feature vector
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Input field outside its domain
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Derived feature would divide by zero
    #[error("Division by zero while computing {feature}")]
    DivisionByZero { feature: &'static str },

    /// Derived feature overflowed or became NaN
    #[error("Feature {feature} is not finite: {value}")]
    NonFinite { feature: &'static str, value: f64 },

    /// Age outside the age group bins under the reject policy
    #[error("Age {0} falls outside the age group bins (17, 66]")]
    AgeGroupUndefined(u32),

    /// Category label missing from its category spec
    #[error("Label '{label}' is not a known category of {feature}")]
    Encoding { feature: Feature, label: String },

    /// Column set or order diverges from the trained schema
    #[error("Feature schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    /// Scaling or category parameters are unusable
    #[error("Invalid preprocessing parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to read preprocessing artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed preprocessing artifact: {0}")]
    Json(#[from] serde_json::Error),
}

impl FeatureError {
    /// Whether the error was caused by the caller's input rather than by
    /// the pipeline's parameters
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FeatureError::Validation(_)
                | FeatureError::DivisionByZero { .. }
                | FeatureError::NonFinite { .. }
                | FeatureError::AgeGroupUndefined(_)
        )
    }
}
