//! Ordinal Encoding of Categorical Features

use crate::derive::{BmiCategory, RiskCategory};
use crate::error::FeatureError;
use crate::schema::{Feature, CATEGORICAL_FEATURES};
use std::collections::HashSet;

/// Ordered labels of one categorical feature; a label's code is its position
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    feature: Feature,
    categories: Vec<String>,
}

impl CategorySpec {
    /// Create a spec, rejecting empty lists and duplicate labels
    pub fn new(feature: Feature, categories: Vec<String>) -> Result<Self, FeatureError> {
        if !feature.is_categorical() {
            return Err(FeatureError::InvalidParams(format!(
                "{} is not a categorical feature",
                feature
            )));
        }
        if categories.is_empty() {
            return Err(FeatureError::InvalidParams(format!(
                "category list for {} is empty",
                feature
            )));
        }

        let mut seen = HashSet::new();
        for label in &categories {
            if !seen.insert(label.as_str()) {
                return Err(FeatureError::InvalidParams(format!(
                    "duplicate category '{}' for {}",
                    label, feature
                )));
            }
        }

        Ok(Self { feature, categories })
    }

    /// `low, medium, high, critical`
    pub fn risk() -> Self {
        Self {
            feature: Feature::OverallRiskCategory,
            categories: RiskCategory::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }

    /// `underweight, normal, overweight, obese`
    pub fn bmi() -> Self {
        Self {
            feature: Feature::BmiCategory,
            categories: BmiCategory::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Ordinal code of a label
    pub fn code(&self, label: &str) -> Result<usize, FeatureError> {
        self.categories
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| FeatureError::Encoding {
                feature: self.feature,
                label: label.to_string(),
            })
    }
}

/// Encoder holding one spec per categorical feature
#[derive(Debug, Clone)]
pub struct OrdinalEncoder {
    specs: Vec<CategorySpec>,
}

impl OrdinalEncoder {
    /// Create an encoder; every categorical feature needs exactly one spec
    pub fn new(specs: Vec<CategorySpec>) -> Result<Self, FeatureError> {
        for feature in CATEGORICAL_FEATURES {
            let count = specs.iter().filter(|s| s.feature == feature).count();
            if count != 1 {
                return Err(FeatureError::InvalidParams(format!(
                    "expected one category spec for {}, found {}",
                    feature, count
                )));
            }
        }
        Ok(Self { specs })
    }

    /// Spec for a categorical feature
    pub fn spec(&self, feature: Feature) -> Option<&CategorySpec> {
        self.specs.iter().find(|s| s.feature == feature)
    }

    /// Encode a label of a categorical feature
    pub fn encode(&self, feature: Feature, label: &str) -> Result<f64, FeatureError> {
        let spec = self.spec(feature).ok_or_else(|| FeatureError::Encoding {
            feature,
            label: label.to_string(),
        })?;
        spec.code(label).map(|code| code as f64)
    }
}

impl Default for OrdinalEncoder {
    fn default() -> Self {
        Self {
            specs: vec![CategorySpec::risk(), CategorySpec::bmi()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_codes() {
        let encoder = OrdinalEncoder::default();
        assert_eq!(encoder.encode(Feature::OverallRiskCategory, "low").unwrap(), 0.0);
        assert_eq!(encoder.encode(Feature::OverallRiskCategory, "critical").unwrap(), 3.0);
        assert_eq!(encoder.encode(Feature::BmiCategory, "underweight").unwrap(), 0.0);
        assert_eq!(encoder.encode(Feature::BmiCategory, "obese").unwrap(), 3.0);
    }

    #[test]
    fn test_every_derivable_label_is_encodable() {
        let encoder = OrdinalEncoder::default();
        for (expected, category) in RiskCategory::ALL.iter().enumerate() {
            let code = encoder.encode(Feature::OverallRiskCategory, category.as_str()).unwrap();
            assert_eq!(code, expected as f64);
        }
        for (expected, category) in BmiCategory::ALL.iter().enumerate() {
            let code = encoder.encode(Feature::BmiCategory, category.as_str()).unwrap();
            assert_eq!(code, expected as f64);
        }
    }

    #[test]
    fn test_unknown_label() {
        let encoder = OrdinalEncoder::default();
        let err = encoder.encode(Feature::BmiCategory, "severely_obese").unwrap_err();
        assert!(matches!(err, FeatureError::Encoding { feature: Feature::BmiCategory, .. }));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_non_categorical_feature_has_no_spec() {
        let encoder = OrdinalEncoder::default();
        assert!(encoder.encode(Feature::Bmi, "normal").is_err());
    }

    #[test]
    fn test_spec_validation() {
        assert!(CategorySpec::new(Feature::BmiCategory, vec![]).is_err());
        assert!(CategorySpec::new(Feature::Age, vec!["young".into()]).is_err());
        assert!(CategorySpec::new(
            Feature::BmiCategory,
            vec!["normal".into(), "normal".into()]
        )
        .is_err());
    }

    #[test]
    fn test_encoder_requires_both_specs() {
        assert!(OrdinalEncoder::new(vec![CategorySpec::risk()]).is_err());
        assert!(OrdinalEncoder::new(vec![
            CategorySpec::risk(),
            CategorySpec::risk(),
            CategorySpec::bmi()
        ])
        .is_err());
        assert!(OrdinalEncoder::new(vec![CategorySpec::bmi(), CategorySpec::risk()]).is_ok());
    }

    proptest! {
        #[test]
        fn prop_code_within_spec_length(
            labels in proptest::collection::hash_set("[a-z]{1,8}", 1..12),
            pick in any::<proptest::sample::Index>(),
        ) {
            let labels: Vec<String> = labels.into_iter().collect();
            let spec = CategorySpec::new(Feature::OverallRiskCategory, labels.clone()).unwrap();
            let label = pick.get(&labels);
            let code = spec.code(label).unwrap();
            prop_assert!(code < spec.len());
            prop_assert_eq!(&spec.categories()[code], label);
        }
    }
}
