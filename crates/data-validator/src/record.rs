//! Raw Input Records

use serde::{Deserialize, Serialize};

/// Number of binary health flags carried by a record
pub const HEALTH_FLAG_COUNT: usize = 6;

/// Unvalidated request fields, exactly as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Age in years
    pub age: i64,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub diabetes: i64,
    pub blood_pressure_problems: i64,
    pub any_transplants: i64,
    pub any_chronic_diseases: i64,
    pub known_allergies: i64,
    pub history_of_cancer_in_family: i64,
    pub number_of_major_surgeries: i64,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            age: 30,
            height: 170.0,
            weight: 70.0,
            diabetes: 0,
            blood_pressure_problems: 0,
            any_transplants: 0,
            any_chronic_diseases: 0,
            known_allergies: 0,
            history_of_cancer_in_family: 0,
            number_of_major_surgeries: 0,
        }
    }
}

/// A validated subject record
///
/// Only [`crate::Validator`] builds these from a [`RawInput`], so every
/// instance already satisfies the configured domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Age in years (never zero)
    pub age: u32,
    /// Height in centimetres (> 0)
    pub height: f64,
    /// Weight in kilograms (> 0)
    pub weight: f64,
    pub diabetes: bool,
    pub blood_pressure_problems: bool,
    pub any_transplants: bool,
    pub any_chronic_diseases: bool,
    pub known_allergies: bool,
    pub history_of_cancer_in_family: bool,
    pub number_of_major_surgeries: u32,
}

impl RawRecord {
    /// The six health flags in their canonical column order
    pub fn health_flags(&self) -> [bool; HEALTH_FLAG_COUNT] {
        [
            self.diabetes,
            self.blood_pressure_problems,
            self.any_transplants,
            self.any_chronic_diseases,
            self.known_allergies,
            self.history_of_cancer_in_family,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_input_from_json() {
        let json = r#"{
            "age": 45, "height": 182.5, "weight": 88.0,
            "diabetes": 1, "blood_pressure_problems": 0, "any_transplants": 0,
            "any_chronic_diseases": 1, "known_allergies": 0,
            "history_of_cancer_in_family": 0, "number_of_major_surgeries": 2
        }"#;
        let input: RawInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.age, 45);
        assert_eq!(input.any_chronic_diseases, 1);
        assert!((input.height - 182.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_health_flag_order() {
        let record = RawRecord {
            age: 40,
            height: 170.0,
            weight: 70.0,
            diabetes: true,
            blood_pressure_problems: false,
            any_transplants: false,
            any_chronic_diseases: false,
            known_allergies: false,
            history_of_cancer_in_family: true,
            number_of_major_surgeries: 0,
        };
        assert_eq!(
            record.health_flags(),
            [true, false, false, false, false, true]
        );
    }
}
