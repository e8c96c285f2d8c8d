//! Derived Feature Computation

use crate::error::FeatureError;
use crate::schema::Feature;
use data_validator::RawRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Age bin edges; bin `i` holds `edge[i] < age <= edge[i + 1]`
pub const AGE_BIN_EDGES: [u32; 6] = [17, 25, 35, 45, 55, 66];

/// Overall risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskCategory {
    /// Tiers in ordinal order
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Medium,
        RiskCategory::High,
        RiskCategory::Critical,
    ];

    /// Tier for a risk score in 0..=5
    pub fn from_score(score: u32) -> Self {
        if score >= 4 {
            RiskCategory::Critical
        } else if score >= 3 {
            RiskCategory::High
        } else if score >= 2 {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
            RiskCategory::Critical => "critical",
        }
    }
}

/// BMI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Bands in ordinal order
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Band for a BMI value; each boundary belongs to the upper band
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }
}

/// What to do with ages outside the age group bins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroupPolicy {
    /// Assign the nearest bin
    #[default]
    Clamp,
    /// Fail with [`FeatureError::AgeGroupUndefined`]
    Reject,
}

/// A column value before ordinal encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Number(f64),
    Label(&'static str),
}

/// Raw record plus every derived column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub raw: RawRecord,
    /// Body mass index, rounded to 2 decimals
    pub bmi: f64,
    /// Age bin label 1..=5
    pub age_group: u8,
    /// Number of health flags set (0..=6)
    pub health_score: u32,
    pub age_health_surgery: f64,
    pub surgery_per_age: f64,
    pub age_bmi_interaction: f64,
    pub bmi_health_interaction: f64,
    pub age_squared: f64,
    /// Number of risk conditions met (0..=5)
    pub risk_score: u32,
    pub overall_risk_category: RiskCategory,
    pub bmi_category: BmiCategory,
    pub high_cost_condition: bool,
    pub metabolic_syndrome_proxy: bool,
    pub risk_density: f64,
}

impl DerivedRecord {
    /// BMI before rounding, for thresholds reported back to the subject
    pub fn unrounded_bmi(&self) -> f64 {
        self.raw.weight / (self.raw.height / 100.0).powi(2)
    }

    /// The trained columns, selected from the record in model order
    pub fn columns(&self) -> Vec<(Feature, Cell)> {
        let raw = &self.raw;
        let flag = |set: bool| Cell::Number(if set { 1.0 } else { 0.0 });

        vec![
            (Feature::Age, Cell::Number(raw.age as f64)),
            (Feature::Diabetes, flag(raw.diabetes)),
            (Feature::BloodPressureProblems, flag(raw.blood_pressure_problems)),
            (Feature::AnyTransplants, flag(raw.any_transplants)),
            (Feature::AnyChronicDiseases, flag(raw.any_chronic_diseases)),
            (Feature::Height, Cell::Number(raw.height)),
            (Feature::Weight, Cell::Number(raw.weight)),
            (Feature::KnownAllergies, flag(raw.known_allergies)),
            (Feature::HistoryOfCancerInFamily, flag(raw.history_of_cancer_in_family)),
            (
                Feature::NumberOfMajorSurgeries,
                Cell::Number(raw.number_of_major_surgeries as f64),
            ),
            (Feature::Bmi, Cell::Number(self.bmi)),
            (Feature::AgeGroup, Cell::Number(self.age_group as f64)),
            (Feature::HealthScore, Cell::Number(self.health_score as f64)),
            (Feature::AgeHealthSurgery, Cell::Number(self.age_health_surgery)),
            (Feature::SurgeryPerAge, Cell::Number(self.surgery_per_age)),
            (Feature::AgeBmiInteraction, Cell::Number(self.age_bmi_interaction)),
            (Feature::BmiHealthInteraction, Cell::Number(self.bmi_health_interaction)),
            (Feature::AgeSquared, Cell::Number(self.age_squared)),
            (
                Feature::OverallRiskCategory,
                Cell::Label(self.overall_risk_category.as_str()),
            ),
            (Feature::BmiCategory, Cell::Label(self.bmi_category.as_str())),
            (Feature::HighCostCondition, flag(self.high_cost_condition)),
            (Feature::MetabolicSyndromeProxy, flag(self.metabolic_syndrome_proxy)),
            (Feature::RiskDensity, Cell::Number(self.risk_density)),
        ]
    }
}

/// Round half to even at `decimals` decimal places
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Age bin label for an age, if it falls inside the bins
pub fn age_group(age: u32) -> Option<u8> {
    AGE_BIN_EDGES
        .windows(2)
        .position(|edges| edges[0] < age && age <= edges[1])
        .map(|bin| bin as u8 + 1)
}

/// Computes derived columns from a validated record
#[derive(Debug, Clone, Default)]
pub struct FeatureDeriver {
    age_group_policy: AgeGroupPolicy,
}

impl FeatureDeriver {
    pub fn new(age_group_policy: AgeGroupPolicy) -> Self {
        Self { age_group_policy }
    }

    pub fn age_group_policy(&self) -> AgeGroupPolicy {
        self.age_group_policy
    }

    /// Derive all columns in dependency order
    pub fn derive(&self, raw: &RawRecord) -> Result<DerivedRecord, FeatureError> {
        if raw.height <= 0.0 {
            return Err(FeatureError::DivisionByZero { feature: "bmi" });
        }
        if raw.age == 0 {
            return Err(FeatureError::DivisionByZero {
                feature: "surgery_per_age",
            });
        }

        let age = raw.age as f64;
        let surgeries = raw.number_of_major_surgeries as f64;

        let height_m = raw.height / 100.0;
        let bmi = round_half_even(raw.weight / height_m.powi(2), 2);

        let age_group = self.bucket_age(raw.age)?;

        let health_score = raw.health_flags().iter().filter(|set| **set).count() as u32;
        let health = health_score as f64;

        let age_health_surgery = round_half_even(age * health * surgeries, 3);
        let surgery_per_age = round_half_even(surgeries / age, 2);
        let age_bmi_interaction = age * bmi;
        let bmi_health_interaction = bmi * health;
        let age_squared = age.powi(2);

        let risk_score = [
            raw.age > 50,
            bmi > 30.0,
            health_score >= 3,
            raw.any_transplants,
            raw.number_of_major_surgeries >= 2,
        ]
        .iter()
        .filter(|met| **met)
        .count() as u32;
        let overall_risk_category = RiskCategory::from_score(risk_score);
        let bmi_category = BmiCategory::from_bmi(bmi);

        let high_cost_condition = raw.any_transplants || raw.history_of_cancer_in_family;
        let metabolic_syndrome_proxy = raw.diabetes && raw.blood_pressure_problems && bmi > 30.0;

        let risk_density = health / age;

        for (feature, value) in [
            ("bmi", bmi),
            ("age_health_surgery", age_health_surgery),
            ("age_bmi_interaction", age_bmi_interaction),
            ("bmi_health_interaction", bmi_health_interaction),
            ("age_squared", age_squared),
        ] {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite { feature, value });
            }
        }

        debug!(
            "Derived features: bmi={:.2}, health_score={}, risk={}",
            bmi,
            health_score,
            overall_risk_category.as_str()
        );

        Ok(DerivedRecord {
            raw: *raw,
            bmi,
            age_group,
            health_score,
            age_health_surgery,
            surgery_per_age,
            age_bmi_interaction,
            bmi_health_interaction,
            age_squared,
            risk_score,
            overall_risk_category,
            bmi_category,
            high_cost_condition,
            metabolic_syndrome_proxy,
            risk_density,
        })
    }

    fn bucket_age(&self, age: u32) -> Result<u8, FeatureError> {
        if let Some(group) = age_group(age) {
            return Ok(group);
        }

        match self.age_group_policy {
            AgeGroupPolicy::Reject => Err(FeatureError::AgeGroupUndefined(age)),
            AgeGroupPolicy::Clamp => {
                let clamped = if age <= AGE_BIN_EDGES[0] {
                    1
                } else {
                    (AGE_BIN_EDGES.len() - 1) as u8
                };
                warn!("Age {} outside age group bins, clamped to group {}", age, clamped);
                Ok(clamped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: u32, height: f64, weight: f64) -> RawRecord {
        RawRecord {
            age,
            height,
            weight,
            diabetes: false,
            blood_pressure_problems: false,
            any_transplants: false,
            any_chronic_diseases: false,
            known_allergies: false,
            history_of_cancer_in_family: false,
            number_of_major_surgeries: 0,
        }
    }

    #[test]
    fn test_unrounded_bmi_kept_for_reporting() {
        let derived = FeatureDeriver::default().derive(&record(40, 150.0, 67.491)).unwrap();
        assert_eq!(derived.bmi, 30.0);
        assert!(derived.unrounded_bmi() < 30.0);
    }

    #[test]
    fn test_overflowing_bmi_rejected() {
        let err = FeatureDeriver::default()
            .derive(&record(30, 1.0, 1e306))
            .unwrap_err();
        assert!(matches!(err, FeatureError::NonFinite { feature: "bmi", .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_healthy_adult() {
        let derived = FeatureDeriver::default().derive(&record(30, 170.0, 70.0)).unwrap();
        assert_eq!(derived.bmi, 24.22);
        assert_eq!(derived.bmi_category, BmiCategory::Normal);
        assert_eq!(derived.health_score, 0);
        assert_eq!(derived.risk_score, 0);
        assert_eq!(derived.overall_risk_category, RiskCategory::Low);
        assert!(!derived.high_cost_condition);
        assert!(!derived.metabolic_syndrome_proxy);
        assert_eq!(derived.age_group, 2);
        assert_eq!(derived.age_squared, 900.0);
        assert_eq!(derived.surgery_per_age, 0.0);
        assert_eq!(derived.risk_density, 0.0);
    }

    #[test]
    fn test_high_risk_senior() {
        let raw = RawRecord {
            diabetes: true,
            blood_pressure_problems: true,
            any_transplants: true,
            any_chronic_diseases: true,
            known_allergies: false,
            history_of_cancer_in_family: true,
            number_of_major_surgeries: 3,
            ..record(60, 160.0, 90.0)
        };
        let derived = FeatureDeriver::default().derive(&raw).unwrap();
        assert_eq!(derived.bmi, 35.16);
        assert_eq!(derived.bmi_category, BmiCategory::Obese);
        assert_eq!(derived.health_score, 5);
        assert_eq!(derived.risk_score, 5);
        assert_eq!(derived.overall_risk_category, RiskCategory::Critical);
        assert!(derived.high_cost_condition);
        assert!(derived.metabolic_syndrome_proxy);
        assert_eq!(derived.age_group, 5);
        assert_eq!(derived.age_health_surgery, 900.0);
        assert_eq!(derived.surgery_per_age, 0.05);
        assert!((derived.age_bmi_interaction - 60.0 * 35.16).abs() < 1e-9);
        assert!((derived.bmi_health_interaction - 5.0 * 35.16).abs() < 1e-9);
        assert!((derived.risk_density - 5.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.99), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(RiskCategory::from_score(0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(1), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(2), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(3), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(4), RiskCategory::Critical);
        assert_eq!(RiskCategory::from_score(5), RiskCategory::Critical);
    }

    #[test]
    fn test_bmi_of_exactly_thirty_is_not_a_risk_condition() {
        // 30.0 is obese, but the risk and metabolic conditions require bmi > 30
        let raw = RawRecord {
            diabetes: true,
            blood_pressure_problems: true,
            ..record(40, 200.0, 120.0)
        };
        let derived = FeatureDeriver::default().derive(&raw).unwrap();
        assert_eq!(derived.bmi, 30.0);
        assert_eq!(derived.bmi_category, BmiCategory::Obese);
        assert!(!derived.metabolic_syndrome_proxy);
        assert_eq!(derived.risk_score, 0);
    }

    #[test]
    fn test_age_group_edges() {
        assert_eq!(age_group(17), None);
        assert_eq!(age_group(18), Some(1));
        assert_eq!(age_group(25), Some(1));
        assert_eq!(age_group(26), Some(2));
        assert_eq!(age_group(35), Some(2));
        assert_eq!(age_group(45), Some(3));
        assert_eq!(age_group(55), Some(4));
        assert_eq!(age_group(56), Some(5));
        assert_eq!(age_group(66), Some(5));
        assert_eq!(age_group(67), None);
    }

    #[test]
    fn test_age_group_policy() {
        let clamp = FeatureDeriver::new(AgeGroupPolicy::Clamp);
        assert_eq!(clamp.derive(&record(80, 170.0, 70.0)).unwrap().age_group, 5);
        assert_eq!(clamp.derive(&record(12, 150.0, 40.0)).unwrap().age_group, 1);

        let reject = FeatureDeriver::new(AgeGroupPolicy::Reject);
        assert!(matches!(
            reject.derive(&record(80, 170.0, 70.0)),
            Err(FeatureError::AgeGroupUndefined(80))
        ));
        assert!(reject.derive(&record(66, 170.0, 70.0)).is_ok());
    }

    #[test]
    fn test_zero_age_is_rejected() {
        let err = FeatureDeriver::default().derive(&record(0, 170.0, 70.0)).unwrap_err();
        assert!(matches!(err, FeatureError::DivisionByZero { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_zero_height_is_rejected() {
        let err = FeatureDeriver::default().derive(&record(30, 0.0, 70.0)).unwrap_err();
        assert!(matches!(err, FeatureError::DivisionByZero { feature: "bmi" }));
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(0.375, 2), 0.38);
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn test_columns_follow_schema() {
        let derived = FeatureDeriver::default().derive(&record(30, 170.0, 70.0)).unwrap();
        let features: Vec<Feature> = derived.columns().iter().map(|(f, _)| *f).collect();
        assert_eq!(features, crate::schema::FEATURE_SCHEMA.to_vec());
    }
}
