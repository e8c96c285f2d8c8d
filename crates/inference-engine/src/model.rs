//! Premium Model Interface

use crate::onnx::OnnxModel;
use crate::InferenceError;
use feature_engine::{verify_schema, FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A pretrained model mapping a feature vector to an annual premium
pub trait PremiumModel: Send + Sync {
    /// Predict the annual premium for one vector
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short human readable description, e.g. for health checks
    fn describe(&self) -> String;
}

/// Supported model artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// JSON intercept + coefficients
    Linear,
    /// ONNX graph run with tract
    Onnx,
}

/// Where and how to load the model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Linear,
            path: PathBuf::from("models/premium_linear.json"),
        }
    }
}

/// Load the configured model once, for sharing across callers
pub fn load_model(config: &ModelConfig) -> Result<Arc<dyn PremiumModel>, InferenceError> {
    info!("Loading {:?} model from {}", config.kind, config.path.display());
    let model: Arc<dyn PremiumModel> = match config.kind {
        ModelKind::Linear => Arc::new(LinearModel::load(&config.path)?),
        ModelKind::Onnx => Arc::new(OnnxModel::load(&config.path)?),
    };
    info!("Model loaded successfully: {}", model.describe());
    Ok(model)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Coefficient {
    feature: String,
    weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearArtifact {
    intercept: f64,
    coefficients: Vec<Coefficient>,
}

/// Linear regression over the feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    intercept: f64,
    weights: [f64; FEATURE_DIMENSION],
}

impl LinearModel {
    pub fn new(intercept: f64, weights: [f64; FEATURE_DIMENSION]) -> Self {
        Self { intercept, weights }
    }

    /// Parse a JSON artifact; coefficients must name the schema columns in order
    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        let artifact: LinearArtifact = serde_json::from_str(json)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;

        let names: Vec<&str> = artifact.coefficients.iter().map(|c| c.feature.as_str()).collect();
        verify_schema(&names)?;

        let mut weights = [0.0; FEATURE_DIMENSION];
        for (slot, coefficient) in weights.iter_mut().zip(&artifact.coefficients) {
            *slot = coefficient.weight;
        }

        if !artifact.intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(InferenceError::ModelLoadError(
                "linear model contains non-finite parameters".to_string(),
            ));
        }

        Ok(Self::new(artifact.intercept, weights))
    }

    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

impl PremiumModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let dot: f64 = features
            .values()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.intercept + dot)
    }

    fn describe(&self) -> String {
        format!("linear model ({} coefficients)", FEATURE_DIMENSION)
    }
}
