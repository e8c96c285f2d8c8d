//! Preprocessing Artifact Loading
//!
//! Scaler and encoder parameters are fitted offline and shipped as a JSON
//! document next to the model:
//!
//! ```json
//! {
//!   "feature_names": ["age", "diabetes", "..."],
//!   "scaling": [{ "feature": "age", "mean": 41.7, "scale": 13.9 }],
//!   "categories": { "bmi_category": ["underweight", "normal", "overweight", "obese"] }
//! }
//! ```

use crate::encoder::{CategorySpec, OrdinalEncoder};
use crate::error::FeatureError;
use crate::scaler::{ScaleEntry, ScalingParams, StandardScaler};
use crate::schema::{verify_schema, Feature, CATEGORICAL_FEATURES, FEATURE_SCHEMA};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Fitted preprocessing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingArtifact {
    /// Columns the model was trained on, checked against the schema
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub scaling: Vec<ScaleEntry>,
    /// Category order overrides, keyed by feature name
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl PreprocessingArtifact {
    /// Parse an artifact from JSON
    pub fn from_json_str(json: &str) -> Result<Self, FeatureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse an artifact file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        info!("Loading preprocessing artifact from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Artifact for given params with the default category order
    pub fn from_params(params: &ScalingParams) -> Self {
        Self {
            feature_names: Some(FEATURE_SCHEMA.iter().map(|f| f.name().to_string()).collect()),
            scaling: params.entries(),
            categories: BTreeMap::new(),
        }
    }

    /// Validate the artifact and build the encoder and scaler it describes
    pub fn into_parts(self) -> Result<(OrdinalEncoder, StandardScaler), FeatureError> {
        if let Some(names) = &self.feature_names {
            verify_schema(names)?;
        }

        for name in self.categories.keys() {
            let feature: Feature = name.parse()?;
            if !feature.is_categorical() {
                return Err(FeatureError::SchemaMismatch {
                    expected: "a categorical feature".to_string(),
                    actual: name.clone(),
                });
            }
        }

        let mut categories = self.categories;
        let specs = CATEGORICAL_FEATURES
            .iter()
            .map(|feature| match categories.remove(feature.name()) {
                Some(labels) => CategorySpec::new(*feature, labels),
                None if *feature == Feature::OverallRiskCategory => Ok(CategorySpec::risk()),
                None => Ok(CategorySpec::bmi()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encoder = OrdinalEncoder::new(specs)?;
        let scaler = StandardScaler::new(ScalingParams::from_entries(&self.scaling)?);
        Ok((encoder, scaler))
    }
}
