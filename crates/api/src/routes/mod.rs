//! Request handlers

pub mod features;
pub mod quote;

use crate::error::ApiError;
use feature_engine::RawInput;
use inference_engine::{InferenceEngine, InferenceError};

/// Convert an engine error, listing every invalid field for input errors
pub(crate) fn request_error(engine: &InferenceEngine, input: &RawInput, err: InferenceError) -> ApiError {
    let details = if err.is_input_error() {
        engine
            .pipeline()
            .validator()
            .check(input)
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect()
    } else {
        Vec::new()
    };
    ApiError::from(err).with_details(details)
}
