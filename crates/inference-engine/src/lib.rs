//! Premium Inference Engine
//!
//! Runs a pretrained premium model on the vectors produced by
//! `feature-engine` and turns its output into a quote.

mod engine;
mod model;
mod onnx;
mod quote;

pub use engine::{InferenceEngine, InferenceResult};
pub use model::{load_model, LinearModel, ModelConfig, ModelKind, PremiumModel};
pub use onnx::OnnxModel;
pub use quote::{PremiumQuote, Recommendation, RiskFactor};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error(transparent)]
    Feature(#[from] FeatureError),
}

impl InferenceError {
    /// Whether the caller's input caused the failure
    pub fn is_input_error(&self) -> bool {
        matches!(self, InferenceError::Feature(e) if e.is_input_error())
    }
}
