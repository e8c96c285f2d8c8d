//! Data Validator for Range Checking

use crate::error::ValidationError;
use crate::record::{RawInput, RawRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Age valid range (years)
    pub age_range: (f64, f64),
    /// Height valid range (cm)
    pub height_range: (f64, f64),
    /// Weight valid range (kg)
    pub weight_range: (f64, f64),
    /// Number of major surgeries valid range
    pub surgeries_range: (f64, f64),
}

impl Default for ValidationConfig {
    /// Ranges offered by the input form
    fn default() -> Self {
        Self {
            age_range: (18.0, 100.0),
            height_range: (100.0, 250.0),
            weight_range: (30.0, 200.0),
            surgeries_range: (0.0, 5.0),
        }
    }
}

impl ValidationConfig {
    /// Physically plausible ranges, wider than the input form
    ///
    /// Every value accepted here keeps the derived features finite.
    pub fn lenient() -> Self {
        Self {
            age_range: (1.0, 150.0),
            height_range: (30.0, 300.0),
            weight_range: (1.0, 700.0),
            surgeries_range: (0.0, 50.0),
        }
    }
}

/// Result of checking every field of an input
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Validator turning [`RawInput`] into [`RawRecord`]
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field, value });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a 0/1 flag
    pub fn validate_flag(&self, field: &'static str, value: i64) -> Result<bool, ValidationError> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ValidationError::InvalidFlag { field, value }),
        }
    }

    /// Validate age
    pub fn validate_age(&self, age: i64) -> Result<u32, ValidationError> {
        self.validate_range("age", age as f64, self.config.age_range)?;
        u32::try_from(age).map_err(|_| ValidationError::OutOfRange {
            field: "age",
            value: age as f64,
            min: self.config.age_range.0,
            max: self.config.age_range.1,
        })
    }

    /// Validate height
    pub fn validate_height(&self, height: f64) -> Result<(), ValidationError> {
        self.validate_range("height", height, self.config.height_range)
    }

    /// Validate weight
    pub fn validate_weight(&self, weight: f64) -> Result<(), ValidationError> {
        self.validate_range("weight", weight, self.config.weight_range)
    }

    /// Validate number of major surgeries
    pub fn validate_surgeries(&self, surgeries: i64) -> Result<u32, ValidationError> {
        let field = "number_of_major_surgeries";
        self.validate_range(field, surgeries as f64, self.config.surgeries_range)?;
        u32::try_from(surgeries).map_err(|_| ValidationError::OutOfRange {
            field,
            value: surgeries as f64,
            min: self.config.surgeries_range.0,
            max: self.config.surgeries_range.1,
        })
    }

    /// Validate every field and build a record, stopping at the first error
    pub fn validate(&self, input: &RawInput) -> Result<RawRecord, ValidationError> {
        let record = RawRecord {
            age: self.validate_age(input.age)?,
            height: {
                self.validate_height(input.height)?;
                input.height
            },
            weight: {
                self.validate_weight(input.weight)?;
                input.weight
            },
            diabetes: self.validate_flag("diabetes", input.diabetes)?,
            blood_pressure_problems: self
                .validate_flag("blood_pressure_problems", input.blood_pressure_problems)?,
            any_transplants: self.validate_flag("any_transplants", input.any_transplants)?,
            any_chronic_diseases: self
                .validate_flag("any_chronic_diseases", input.any_chronic_diseases)?,
            known_allergies: self.validate_flag("known_allergies", input.known_allergies)?,
            history_of_cancer_in_family: self.validate_flag(
                "history_of_cancer_in_family",
                input.history_of_cancer_in_family,
            )?,
            number_of_major_surgeries: self.validate_surgeries(input.number_of_major_surgeries)?,
        };
        debug!("Validated input: age={}, surgeries={}", record.age, record.number_of_major_surgeries);
        Ok(record)
    }

    /// Check every field and collect all errors
    pub fn check(&self, input: &RawInput) -> ValidationResult {
        let checks = [
            self.validate_age(input.age).err(),
            self.validate_height(input.height).err(),
            self.validate_weight(input.weight).err(),
            self.validate_flag("diabetes", input.diabetes).err(),
            self.validate_flag("blood_pressure_problems", input.blood_pressure_problems).err(),
            self.validate_flag("any_transplants", input.any_transplants).err(),
            self.validate_flag("any_chronic_diseases", input.any_chronic_diseases).err(),
            self.validate_flag("known_allergies", input.known_allergies).err(),
            self.validate_flag("history_of_cancer_in_family", input.history_of_cancer_in_family)
                .err(),
            self.validate_surgeries(input.number_of_major_surgeries).err(),
        ];
        let fields_checked = checks.len();
        let errors: Vec<ValidationError> = checks.into_iter().flatten().collect();

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            ValidationResult::invalid(errors, fields_checked)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
