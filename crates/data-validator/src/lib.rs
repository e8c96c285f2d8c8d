//! Data Validation
//!
//! Provides input validation and range checking for the raw fields of a
//! premium estimation request.

mod error;
mod record;
mod validator;

pub use error::ValidationError;
pub use record::{RawInput, RawRecord, HEALTH_FLAG_COUNT};
pub use validator::{ValidationConfig, ValidationResult, Validator};
