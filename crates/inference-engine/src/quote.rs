//! Premium Quote Report

use chrono::{DateTime, Utc};
use feature_engine::{BmiCategory, DerivedRecord, RiskCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Risk factor identified in a subject's record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "factor", rename_all = "snake_case")]
pub enum RiskFactor {
    Diabetes,
    BloodPressureProblems,
    PreviousTransplants,
    ChronicDiseases,
    KnownAllergies,
    FamilyCancerHistory,
    MajorSurgeries { count: u32 },
    Obesity,
    Overweight,
}

impl RiskFactor {
    /// Collect the factors present in a derived record
    pub fn identify(derived: &DerivedRecord) -> Vec<RiskFactor> {
        let raw = &derived.raw;
        let mut factors = Vec::new();

        let flags = [
            (raw.diabetes, RiskFactor::Diabetes),
            (raw.blood_pressure_problems, RiskFactor::BloodPressureProblems),
            (raw.any_transplants, RiskFactor::PreviousTransplants),
            (raw.any_chronic_diseases, RiskFactor::ChronicDiseases),
            (raw.known_allergies, RiskFactor::KnownAllergies),
            (raw.history_of_cancer_in_family, RiskFactor::FamilyCancerHistory),
        ];
        factors.extend(flags.iter().filter(|(set, _)| *set).map(|(_, factor)| *factor));

        if raw.number_of_major_surgeries > 0 {
            factors.push(RiskFactor::MajorSurgeries {
                count: raw.number_of_major_surgeries,
            });
        }

        let bmi = derived.unrounded_bmi();
        if bmi >= 30.0 {
            factors.push(RiskFactor::Obesity);
        } else if bmi >= 25.0 {
            factors.push(RiskFactor::Overweight);
        }

        factors
    }

    pub fn description(&self) -> String {
        match self {
            RiskFactor::Diabetes => "Diabetes".to_string(),
            RiskFactor::BloodPressureProblems => "Blood Pressure Problems".to_string(),
            RiskFactor::PreviousTransplants => "Previous Transplants".to_string(),
            RiskFactor::ChronicDiseases => "Chronic Diseases".to_string(),
            RiskFactor::KnownAllergies => "Known Allergies".to_string(),
            RiskFactor::FamilyCancerHistory => "Family History of Cancer".to_string(),
            RiskFactor::MajorSurgeries { count } => format!("{} Major Surgeries", count),
            RiskFactor::Obesity => "Obesity (BMI ≥ 30)".to_string(),
            RiskFactor::Overweight => "Overweight (BMI ≥ 25)".to_string(),
        }
    }
}

/// Lifestyle recommendation attached to a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    WeightManagement,
    HealthyDiet,
    BloodSugarMonitoring,
    BloodPressureMonitoring,
    MaintainLifestyle,
    RegularCheckups,
}

impl Recommendation {
    /// Recommendations for a derived record
    pub fn for_record(derived: &DerivedRecord) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        let bmi = derived.unrounded_bmi();
        if bmi >= 30.0 {
            recommendations.push(Recommendation::WeightManagement);
        } else if bmi >= 25.0 {
            recommendations.push(Recommendation::HealthyDiet);
        }
        if derived.raw.diabetes {
            recommendations.push(Recommendation::BloodSugarMonitoring);
        }
        if derived.raw.blood_pressure_problems {
            recommendations.push(Recommendation::BloodPressureMonitoring);
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::MaintainLifestyle);
            recommendations.push(Recommendation::RegularCheckups);
        }

        recommendations
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::WeightManagement => "Consider weight management programs to reduce BMI",
            Recommendation::HealthyDiet => "Maintain a healthy diet and regular exercise",
            Recommendation::BloodSugarMonitoring => "Regular monitoring of blood sugar levels",
            Recommendation::BloodPressureMonitoring => {
                "Regular blood pressure monitoring and medication compliance"
            }
            Recommendation::MaintainLifestyle => "Maintain your current healthy lifestyle",
            Recommendation::RegularCheckups => "Regular health check-ups are recommended",
        }
    }
}

/// Estimated premium with its breakdown and risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumQuote {
    pub quote_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Estimated annual premium (non-negative)
    pub annual_premium: f64,
    pub monthly_premium: f64,
    pub daily_premium: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub risk_category: RiskCategory,
    /// Number of risk conditions met (0..=5)
    pub risk_score: u32,
    pub risk_factors: Vec<RiskFactor>,
    pub recommendations: Vec<Recommendation>,
}

impl PremiumQuote {
    /// Build a quote from an annual premium and the record it was priced on
    pub fn new(annual_premium: f64, derived: &DerivedRecord) -> Self {
        Self {
            quote_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            annual_premium,
            monthly_premium: annual_premium / 12.0,
            daily_premium: annual_premium / 365.0,
            bmi: derived.bmi,
            bmi_category: derived.bmi_category,
            risk_category: derived.overall_risk_category,
            risk_score: derived.risk_score,
            risk_factors: RiskFactor::identify(derived),
            recommendations: Recommendation::for_record(derived),
        }
    }
}
