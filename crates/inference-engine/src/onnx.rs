//! ONNX Model Runner

use crate::model::PremiumModel;
use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;
use tracing::debug;

/// ONNX regression model with a `[1, 23]` float input
pub struct OnnxModel {
    /// Model path
    model_path: PathBuf,
    /// Optimized execution plan
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxModel {
    /// Load and optimize the ONNX graph
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            model_path: path.to_path_buf(),
            plan,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl PremiumModel for OnnxModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &features.to_f32()).map_err(|e| {
            InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", FEATURE_DIMENSION),
                actual: e.to_string(),
            }
        })?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no output".to_string()))?;
        let output = output
            .cast_to::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let premium = output
            .as_slice::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| InferenceError::InferenceFailed("empty model output".to_string()))?;

        debug!("ONNX prediction: {}", premium);
        Ok(premium as f64)
    }

    fn describe(&self) -> String {
        format!("onnx model ({})", self.model_path.display())
    }
}
