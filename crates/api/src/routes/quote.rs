//! Quote Routes

use axum::{extract::State, Json};
use feature_engine::RawInput;
use inference_engine::PremiumQuote;
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::routes::request_error;
use crate::AppState;

/// Response for the quote endpoint
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: PremiumQuote,
    /// Human readable risk factors, in the order of `risk_factors`
    pub risk_factor_descriptions: Vec<String>,
    /// Human readable recommendations, in the order of `recommendations`
    pub recommendation_messages: Vec<&'static str>,
    pub latency_us: u64,
}

/// Estimate the premium for a raw input
pub async fn post_quote(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RawInput>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let result = match state.engine.estimate(&input) {
        Ok(result) => result,
        Err(e) => {
            let outcome = if e.is_input_error() { "rejected" } else { "failed" };
            counter!("premium_quotes_total", "outcome" => outcome).increment(1);
            return Err(request_error(&state.engine, &input, e));
        }
    };

    counter!("premium_quotes_total", "outcome" => "ok").increment(1);
    histogram!("premium_quote_latency_seconds").record(result.latency_us as f64 / 1_000_000.0);

    let quote = result.quote;
    Ok(Json(QuoteResponse {
        risk_factor_descriptions: quote.risk_factors.iter().map(|f| f.description()).collect(),
        recommendation_messages: quote.recommendations.iter().map(|r| r.message()).collect(),
        latency_us: result.latency_us,
        quote,
    }))
}
