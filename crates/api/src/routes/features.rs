//! Feature Vector Routes

use axum::{extract::State, Json};
use feature_engine::RawInput;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::routes::request_error;
use crate::AppState;

/// A named feature value
#[derive(Debug, Serialize)]
pub struct NamedFeature {
    pub name: &'static str,
    pub value: f64,
}

/// Response for the features endpoint
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub features: Vec<NamedFeature>,
    pub count: usize,
}

/// Compute the model-ready feature vector for a raw input
pub async fn post_features(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RawInput>,
) -> Result<Json<FeaturesResponse>, ApiError> {
    let vector = state
        .engine
        .features(&input)
        .map_err(|e| request_error(&state.engine, &input, e))?;

    let features: Vec<NamedFeature> = vector
        .named()
        .map(|(name, value)| NamedFeature { name, value })
        .collect();

    Ok(Json(FeaturesResponse {
        count: features.len(),
        features,
    }))
}
