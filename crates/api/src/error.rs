//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_engine::FeatureError;
use inference_engine::InferenceError;
use serde::Serialize;
use tracing::error;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Error returned by request handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Attach per-field messages to the error body
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.body.details = details;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn error_code(err: &InferenceError) -> &'static str {
    match err {
        InferenceError::Feature(FeatureError::Validation(_)) => "validation_error",
        InferenceError::Feature(FeatureError::DivisionByZero { .. }) => "division_error",
        InferenceError::Feature(FeatureError::AgeGroupUndefined(_)) => "age_group_undefined",
        InferenceError::Feature(FeatureError::NonFinite { .. }) => "non_finite_feature",
        InferenceError::Feature(FeatureError::Encoding { .. }) => "encoding_error",
        InferenceError::Feature(FeatureError::SchemaMismatch { .. }) => "schema_mismatch",
        InferenceError::Feature(_) => "preprocessing_error",
        InferenceError::ModelLoadError(_) => "model_unavailable",
        InferenceError::InferenceFailed(_) | InferenceError::InvalidInputShape { .. } => {
            "inference_error"
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        let status = if err.is_input_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Self {
            status,
            body: ErrorBody {
                error: error_code(&err),
                message: err.to_string(),
                details: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::ValidationError;

    #[test]
    fn test_validation_maps_to_422() {
        let err: ApiError = InferenceError::Feature(FeatureError::Validation(
            ValidationError::InvalidFlag {
                field: "diabetes",
                value: 4,
            },
        ))
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.error, "validation_error");
    }

    #[test]
    fn test_non_finite_feature_maps_to_422() {
        let err: ApiError = InferenceError::Feature(FeatureError::NonFinite {
            feature: "bmi",
            value: f64::INFINITY,
        })
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.error, "non_finite_feature");
    }

    #[test]
    fn test_schema_mismatch_maps_to_500() {
        let err: ApiError = InferenceError::Feature(FeatureError::SchemaMismatch {
            expected: "23 columns".into(),
            actual: "22 columns".into(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "schema_mismatch");
    }

    #[test]
    fn test_model_failure_maps_to_500() {
        let err: ApiError = InferenceError::InferenceFailed("boom".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "inference_error");
    }
}
