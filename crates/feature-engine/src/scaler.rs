//! Standardization with Frozen Parameters

use crate::error::FeatureError;
use crate::schema::{Feature, FEATURE_DIMENSION, SCALED_DIMENSION, SCALED_FEATURES};
use serde::{Deserialize, Serialize};

/// Mean and scale of one numeric feature, as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub feature: String,
    pub mean: f64,
    pub scale: f64,
}

/// Per-feature `(mean, scale)` pairs for the standardized columns
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingParams {
    mean: [f64; SCALED_DIMENSION],
    scale: [f64; SCALED_DIMENSION],
}

impl ScalingParams {
    /// Build params from artifact entries; every scaled column must appear
    /// exactly once and no other column may appear
    pub fn from_entries(entries: &[ScaleEntry]) -> Result<Self, FeatureError> {
        let mut mean = [0.0; SCALED_DIMENSION];
        let mut scale = [1.0; SCALED_DIMENSION];
        let mut seen = [false; SCALED_DIMENSION];

        for entry in entries {
            let feature: Feature = entry.feature.parse()?;
            let slot = feature.scaled_index().ok_or_else(|| FeatureError::SchemaMismatch {
                expected: "a standardized numeric feature".to_string(),
                actual: entry.feature.clone(),
            })?;

            if seen[slot] {
                return Err(FeatureError::InvalidParams(format!(
                    "duplicate scaling entry for {}",
                    feature
                )));
            }
            if !entry.mean.is_finite() || !entry.scale.is_finite() {
                return Err(FeatureError::InvalidParams(format!(
                    "non-finite scaling parameters for {}",
                    feature
                )));
            }

            seen[slot] = true;
            mean[slot] = entry.mean;
            scale[slot] = entry.scale;
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(FeatureError::SchemaMismatch {
                expected: format!("scaling entry for {}", SCALED_FEATURES[missing]),
                actual: "none".to_string(),
            });
        }

        Ok(Self { mean, scale })
    }

    /// Mean 0 and scale 1 for every column
    pub fn identity() -> Self {
        Self {
            mean: [0.0; SCALED_DIMENSION],
            scale: [1.0; SCALED_DIMENSION],
        }
    }

    /// `(mean, scale)` of a scaled feature
    pub fn get(&self, feature: Feature) -> Option<(f64, f64)> {
        feature
            .scaled_index()
            .map(|slot| (self.mean[slot], self.scale[slot]))
    }

    /// Params as artifact entries, in scaler order
    pub fn entries(&self) -> Vec<ScaleEntry> {
        SCALED_FEATURES
            .iter()
            .enumerate()
            .map(|(slot, feature)| ScaleEntry {
                feature: feature.name().to_string(),
                mean: self.mean[slot],
                scale: self.scale[slot],
            })
            .collect()
    }
}

/// Standard scaler applying frozen params
#[derive(Debug, Clone)]
pub struct StandardScaler {
    params: ScalingParams,
}

impl StandardScaler {
    pub fn new(params: ScalingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScalingParams {
        &self.params
    }

    /// Standardize one value; a zero scale yields 0
    pub fn scale_value(&self, feature: Feature, value: f64) -> f64 {
        match self.params.get(feature) {
            Some((_, scale)) if scale == 0.0 => 0.0,
            Some((mean, scale)) => (value - mean) / scale,
            None => value,
        }
    }

    /// Standardize the scaled columns of a schema-ordered row in place
    pub fn transform(&self, values: &mut [f64; FEATURE_DIMENSION]) {
        for feature in SCALED_FEATURES {
            let slot = feature.index();
            values[slot] = self.scale_value(feature, values[slot]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ScaleEntry> {
        SCALED_FEATURES
            .iter()
            .enumerate()
            .map(|(i, f)| ScaleEntry {
                feature: f.name().to_string(),
                mean: i as f64,
                scale: 2.0,
            })
            .collect()
    }

    #[test]
    fn test_standardization() {
        let scaler = StandardScaler::new(ScalingParams::from_entries(&entries()).unwrap());
        // age is slot 0: mean 0, scale 2
        assert_eq!(scaler.scale_value(Feature::Age, 30.0), 15.0);
        // bmi is slot 4: mean 4, scale 2
        assert_eq!(scaler.scale_value(Feature::Bmi, 24.0), 10.0);
        // unscaled features pass through
        assert_eq!(scaler.scale_value(Feature::Diabetes, 1.0), 1.0);
    }

    #[test]
    fn test_zero_scale_yields_zero() {
        let mut entries = entries();
        entries[0].scale = 0.0;
        let scaler = StandardScaler::new(ScalingParams::from_entries(&entries).unwrap());
        assert_eq!(scaler.scale_value(Feature::Age, 42.0), 0.0);
    }

    #[test]
    fn test_transform_touches_only_scaled_columns() {
        let scaler = StandardScaler::new(ScalingParams::from_entries(&entries()).unwrap());
        let mut values = [4.0; FEATURE_DIMENSION];
        scaler.transform(&mut values);

        assert_eq!(values[Feature::Age.index()], 2.0);
        assert_eq!(values[Feature::RiskDensity.index()], (4.0 - 10.0) / 2.0);
        assert_eq!(values[Feature::AgeGroup.index()], 4.0);
        assert_eq!(values[Feature::BmiCategory.index()], 4.0);
    }

    #[test]
    fn test_missing_entry_is_schema_mismatch() {
        let mut entries = entries();
        entries.pop();
        let err = ScalingParams::from_entries(&entries).unwrap_err();
        assert!(matches!(err, FeatureError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("risk_density"));
    }

    #[test]
    fn test_unscaled_or_unknown_entry_is_schema_mismatch() {
        let mut with_flag = entries();
        with_flag.push(ScaleEntry {
            feature: "diabetes".into(),
            mean: 0.0,
            scale: 1.0,
        });
        assert!(matches!(
            ScalingParams::from_entries(&with_flag),
            Err(FeatureError::SchemaMismatch { .. })
        ));

        let mut with_unknown = entries();
        with_unknown[0].feature = "age_cubed".into();
        assert!(ScalingParams::from_entries(&with_unknown).is_err());
    }

    #[test]
    fn test_duplicate_and_non_finite_entries() {
        let mut duplicate = entries();
        duplicate.push(duplicate[0].clone());
        assert!(matches!(
            ScalingParams::from_entries(&duplicate),
            Err(FeatureError::InvalidParams(_))
        ));

        let mut nan = entries();
        nan[3].mean = f64::NAN;
        assert!(matches!(
            ScalingParams::from_entries(&nan),
            Err(FeatureError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_entries_round_trip_through_params() {
        let params = ScalingParams::from_entries(&entries()).unwrap();
        assert_eq!(params.entries(), entries());
        assert_eq!(ScalingParams::identity().get(Feature::Weight), Some((0.0, 1.0)));
    }
}
