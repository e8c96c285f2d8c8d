//! Trained Feature Schema
//!
//! The model was fit on exactly these 23 columns in exactly this order.
//! Adding, removing or reordering a variant is a breaking change for every
//! deployed model artifact.

use crate::error::FeatureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 23;

/// Number of standardized numeric features
pub const SCALED_DIMENSION: usize = 11;

/// A named slot of the feature vector, declared in schema order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Age,
    Diabetes,
    BloodPressureProblems,
    AnyTransplants,
    AnyChronicDiseases,
    Height,
    Weight,
    KnownAllergies,
    HistoryOfCancerInFamily,
    NumberOfMajorSurgeries,
    Bmi,
    AgeGroup,
    HealthScore,
    AgeHealthSurgery,
    SurgeryPerAge,
    AgeBmiInteraction,
    BmiHealthInteraction,
    AgeSquared,
    OverallRiskCategory,
    BmiCategory,
    HighCostCondition,
    MetabolicSyndromeProxy,
    RiskDensity,
}

/// Column order the model expects
pub const FEATURE_SCHEMA: [Feature; FEATURE_DIMENSION] = [
    Feature::Age,
    Feature::Diabetes,
    Feature::BloodPressureProblems,
    Feature::AnyTransplants,
    Feature::AnyChronicDiseases,
    Feature::Height,
    Feature::Weight,
    Feature::KnownAllergies,
    Feature::HistoryOfCancerInFamily,
    Feature::NumberOfMajorSurgeries,
    Feature::Bmi,
    Feature::AgeGroup,
    Feature::HealthScore,
    Feature::AgeHealthSurgery,
    Feature::SurgeryPerAge,
    Feature::AgeBmiInteraction,
    Feature::BmiHealthInteraction,
    Feature::AgeSquared,
    Feature::OverallRiskCategory,
    Feature::BmiCategory,
    Feature::HighCostCondition,
    Feature::MetabolicSyndromeProxy,
    Feature::RiskDensity,
];

/// Columns standardized by the scaler, in scaler parameter order
pub const SCALED_FEATURES: [Feature; SCALED_DIMENSION] = [
    Feature::Age,
    Feature::Height,
    Feature::Weight,
    Feature::NumberOfMajorSurgeries,
    Feature::Bmi,
    Feature::AgeHealthSurgery,
    Feature::SurgeryPerAge,
    Feature::AgeBmiInteraction,
    Feature::BmiHealthInteraction,
    Feature::AgeSquared,
    Feature::RiskDensity,
];

/// Columns replaced by their ordinal code
pub const CATEGORICAL_FEATURES: [Feature; 2] = [Feature::OverallRiskCategory, Feature::BmiCategory];

impl Feature {
    /// Column name as stored in the model artifact
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Diabetes => "diabetes",
            Feature::BloodPressureProblems => "blood_pressure_problems",
            Feature::AnyTransplants => "any_transplants",
            Feature::AnyChronicDiseases => "any_chronic_diseases",
            Feature::Height => "height",
            Feature::Weight => "weight",
            Feature::KnownAllergies => "known_allergies",
            Feature::HistoryOfCancerInFamily => "history_of_cancer_in_family",
            Feature::NumberOfMajorSurgeries => "number_of_major_surgeries",
            Feature::Bmi => "bmi",
            Feature::AgeGroup => "age_group",
            Feature::HealthScore => "health_score",
            Feature::AgeHealthSurgery => "age_health_surgery",
            Feature::SurgeryPerAge => "surgery_per_age",
            Feature::AgeBmiInteraction => "age_bmi_interaction",
            Feature::BmiHealthInteraction => "bmi_health_interaction",
            Feature::AgeSquared => "age_squared",
            Feature::OverallRiskCategory => "overall_risk_category",
            Feature::BmiCategory => "bmi_category",
            Feature::HighCostCondition => "high_cost_condition",
            Feature::MetabolicSyndromeProxy => "metabolic_syndrome_proxy",
            Feature::RiskDensity => "risk_density",
        }
    }

    /// Position of the feature in the vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Position of the feature among the scaled columns
    pub fn scaled_index(self) -> Option<usize> {
        SCALED_FEATURES.iter().position(|f| *f == self)
    }

    pub fn is_categorical(self) -> bool {
        CATEGORICAL_FEATURES.contains(&self)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_SCHEMA
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| FeatureError::SchemaMismatch {
                expected: "a trained feature name".to_string(),
                actual: s.to_string(),
            })
    }
}

/// Check a list of column names against the trained schema, name by name
pub fn verify_schema<S: AsRef<str>>(names: &[S]) -> Result<(), FeatureError> {
    if names.len() != FEATURE_DIMENSION {
        return Err(FeatureError::SchemaMismatch {
            expected: format!("{} columns", FEATURE_DIMENSION),
            actual: format!("{} columns", names.len()),
        });
    }

    for (position, (name, feature)) in names.iter().zip(FEATURE_SCHEMA.iter()).enumerate() {
        if name.as_ref() != feature.name() {
            return Err(FeatureError::SchemaMismatch {
                expected: format!("'{}' at position {}", feature.name(), position),
                actual: format!("'{}'", name.as_ref()),
            });
        }
    }

    Ok(())
}
