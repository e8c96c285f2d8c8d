//! Feature Vector Assembly

use crate::derive::{AgeGroupPolicy, Cell, DerivedRecord, FeatureDeriver};
use crate::encoder::OrdinalEncoder;
use crate::error::FeatureError;
use crate::params::PreprocessingArtifact;
use crate::scaler::{ScalingParams, StandardScaler};
use crate::schema::{Feature, FEATURE_DIMENSION, FEATURE_SCHEMA};
use data_validator::{RawInput, RawRecord, ValidationConfig, Validator};
use serde::Serialize;
use tracing::{debug, info};

/// Model-ready feature vector in schema order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    /// Wrap values that are already in schema order
    pub fn from_values(values: &[f64]) -> Result<Self, FeatureError> {
        let values: [f64; FEATURE_DIMENSION] =
            values.try_into().map_err(|_| FeatureError::SchemaMismatch {
                expected: format!("{} values", FEATURE_DIMENSION),
                actual: format!("{} values", values.len()),
            })?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.values
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// `(name, value)` pairs in schema order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_SCHEMA
            .iter()
            .zip(self.values.iter())
            .map(|(feature, value)| (feature.name(), *value))
    }

    /// Single-precision copy for model runtimes
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }

    pub fn len(&self) -> usize {
        FEATURE_DIMENSION
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The selected columns of one record, before encoding
#[derive(Debug, Clone)]
pub struct FeatureRow {
    cells: Vec<Cell>,
}

impl FeatureRow {
    /// Accept columns only if they match the trained schema name by name
    pub fn from_columns(columns: Vec<(Feature, Cell)>) -> Result<Self, FeatureError> {
        let names: Vec<&str> = columns.iter().map(|(feature, _)| feature.name()).collect();
        crate::schema::verify_schema(&names)?;
        Ok(Self {
            cells: columns.into_iter().map(|(_, cell)| cell).collect(),
        })
    }

    /// Replace labels by their ordinal codes
    pub fn encode(&self, encoder: &OrdinalEncoder) -> Result<[f64; FEATURE_DIMENSION], FeatureError> {
        let mut values = [0.0; FEATURE_DIMENSION];
        for ((slot, cell), feature) in values.iter_mut().zip(&self.cells).zip(FEATURE_SCHEMA) {
            *slot = match cell {
                Cell::Number(value) => *value,
                Cell::Label(label) => encoder.encode(feature, label)?,
            };
        }
        Ok(values)
    }
}

/// Raw input → validated record → derived record → encoded → scaled
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    validator: Validator,
    deriver: FeatureDeriver,
    encoder: OrdinalEncoder,
    scaler: StandardScaler,
}

impl FeaturePipeline {
    /// Create a pipeline from its stages
    pub fn new(
        validator: Validator,
        deriver: FeatureDeriver,
        encoder: OrdinalEncoder,
        scaler: StandardScaler,
    ) -> Self {
        info!(
            "Creating feature pipeline: age_group_policy={:?}",
            deriver.age_group_policy()
        );
        Self {
            validator,
            deriver,
            encoder,
            scaler,
        }
    }

    /// Create a pipeline from a fitted preprocessing artifact
    pub fn from_artifact(
        artifact: PreprocessingArtifact,
        validation: ValidationConfig,
        age_group_policy: AgeGroupPolicy,
    ) -> Result<Self, FeatureError> {
        let (encoder, scaler) = artifact.into_parts()?;
        Ok(Self::new(
            Validator::new(validation),
            FeatureDeriver::new(age_group_policy),
            encoder,
            scaler,
        ))
    }

    /// Pipeline with default stages and the given scaling params
    pub fn with_params(params: ScalingParams) -> Self {
        Self::new(
            Validator::default(),
            FeatureDeriver::default(),
            OrdinalEncoder::default(),
            StandardScaler::new(params),
        )
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate and derive without encoding or scaling
    pub fn derive(&self, input: &RawInput) -> Result<DerivedRecord, FeatureError> {
        let record = self.validator.validate(input)?;
        self.deriver.derive(&record)
    }

    /// Full transformation of a raw input
    pub fn transform(&self, input: &RawInput) -> Result<FeatureVector, FeatureError> {
        let record = self.validator.validate(input)?;
        self.transform_record(&record)
    }

    /// Transformation of an already validated record
    pub fn transform_record(&self, record: &RawRecord) -> Result<FeatureVector, FeatureError> {
        let derived = self.deriver.derive(record)?;
        self.assemble(&derived)
    }

    /// Select, encode and scale the columns of a derived record
    pub fn assemble(&self, derived: &DerivedRecord) -> Result<FeatureVector, FeatureError> {
        let row = FeatureRow::from_columns(derived.columns())?;
        let mut values = row.encode(&self.encoder)?;
        self.scaler.transform(&mut values);

        if let Some((feature, value)) = FEATURE_SCHEMA
            .iter()
            .zip(values.iter())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(FeatureError::NonFinite {
                feature: feature.name(),
                value: *value,
            });
        }

        debug!(
            "Assembled feature vector: risk={}, bmi_category={}",
            values[Feature::OverallRiskCategory.index()],
            values[Feature::BmiCategory.index()]
        );

        Ok(FeatureVector { values })
    }
}
