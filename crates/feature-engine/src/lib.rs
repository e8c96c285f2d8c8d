//! Feature Engineering Engine
//!
//! Turns the raw fields of a premium request into the 23-column feature
//! vector the pricing model was trained on:
//!
//! 1. [`FeatureDeriver`] computes BMI, risk scores, interaction terms and
//!    categorical buckets.
//! 2. [`OrdinalEncoder`] replaces categories with their ordinal codes.
//! 3. [`StandardScaler`] standardizes numeric columns with frozen params.
//!
//! [`FeaturePipeline`] runs the three stages in order.

mod derive;
mod encoder;
mod error;
mod features;
mod params;
mod scaler;
mod schema;

pub use derive::{
    age_group, round_half_even, AgeGroupPolicy, BmiCategory, Cell, DerivedRecord, FeatureDeriver,
    RiskCategory, AGE_BIN_EDGES,
};
pub use encoder::{CategorySpec, OrdinalEncoder};
pub use error::FeatureError;
pub use features::{FeaturePipeline, FeatureRow, FeatureVector};
pub use params::PreprocessingArtifact;
pub use scaler::{ScaleEntry, ScalingParams, StandardScaler};
pub use schema::{
    verify_schema, Feature, CATEGORICAL_FEATURES, FEATURE_DIMENSION, FEATURE_SCHEMA,
    SCALED_DIMENSION, SCALED_FEATURES,
};

pub use data_validator::{RawInput, RawRecord, ValidationConfig, ValidationError, Validator};
