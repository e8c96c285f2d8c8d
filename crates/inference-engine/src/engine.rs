//! Inference Engine Implementation

use crate::model::PremiumModel;
use crate::quote::PremiumQuote;
use crate::InferenceError;
use feature_engine::{FeaturePipeline, FeatureVector, RawInput};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a quote estimation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The quote
    pub quote: PremiumQuote,
    /// Model-ready features the quote was priced on
    pub features: FeatureVector,
    /// End-to-end latency in microseconds
    pub latency_us: u64,
}

/// Feature pipeline plus a loaded premium model
///
/// Both halves are immutable after construction, so one engine can serve
/// any number of concurrent callers.
#[derive(Clone)]
pub struct InferenceEngine {
    pipeline: Arc<FeaturePipeline>,
    model: Arc<dyn PremiumModel>,
}

impl InferenceEngine {
    /// Create a new inference engine
    pub fn new(pipeline: FeaturePipeline, model: Arc<dyn PremiumModel>) -> Self {
        info!("Creating inference engine with {}", model.describe());
        Self {
            pipeline: Arc::new(pipeline),
            model,
        }
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    pub fn model_description(&self) -> String {
        self.model.describe()
    }

    /// Feature vector for a raw input
    pub fn features(&self, input: &RawInput) -> Result<FeatureVector, InferenceError> {
        Ok(self.pipeline.transform(input)?)
    }

    /// Run the model; negative premiums are clamped to zero
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let premium = self.model.predict(features)?;

        if !premium.is_finite() {
            return Err(InferenceError::InferenceFailed(format!(
                "model returned non-finite premium {}",
                premium
            )));
        }
        if premium < 0.0 {
            warn!("Model returned negative premium {:.2}, clamping to 0", premium);
            return Ok(0.0);
        }

        Ok(premium)
    }

    /// Price a raw input and build its quote
    pub fn estimate(&self, input: &RawInput) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        let derived = self.pipeline.derive(input)?;
        let features = self.pipeline.assemble(&derived)?;
        let premium = self.predict(&features)?;
        let quote = PremiumQuote::new(premium, &derived);

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Quote {} priced at {:.2} in {}us (risk={})",
            quote.quote_id,
            quote.annual_premium,
            latency_us,
            quote.risk_category.as_str()
        );

        Ok(InferenceResult {
            quote,
            features,
            latency_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{Feature, RiskCategory, ScalingParams, FEATURE_DIMENSION};

    /// Premium driven by age and risk tier only
    struct TierModel;

    impl PremiumModel for TierModel {
        fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
            Ok(15_000.0
                + 100.0 * features.get(Feature::Age)
                + 2_500.0 * features.get(Feature::OverallRiskCategory))
        }

        fn describe(&self) -> String {
            "tier model".to_string()
        }
    }

    struct ConstantModel(f64);

    impl PremiumModel for ConstantModel {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
            Ok(self.0)
        }

        fn describe(&self) -> String {
            format!("constant {}", self.0)
        }
    }

    fn engine(model: Arc<dyn PremiumModel>) -> InferenceEngine {
        InferenceEngine::new(FeaturePipeline::with_params(ScalingParams::identity()), model)
    }

    #[test]
    fn test_estimate_healthy_adult() {
        let result = engine(Arc::new(TierModel)).estimate(&RawInput::default()).unwrap();
        assert_eq!(result.quote.annual_premium, 18_000.0);
        assert_eq!(result.quote.monthly_premium, 1_500.0);
        assert_eq!(result.quote.risk_category, RiskCategory::Low);
        assert_eq!(result.features.len(), FEATURE_DIMENSION);
    }

    #[test]
    fn test_estimate_critical_subject() {
        let input = RawInput {
            age: 60,
            height: 160.0,
            weight: 90.0,
            diabetes: 1,
            blood_pressure_problems: 1,
            any_transplants: 1,
            any_chronic_diseases: 1,
            known_allergies: 0,
            history_of_cancer_in_family: 1,
            number_of_major_surgeries: 3,
        };
        let result = engine(Arc::new(TierModel)).estimate(&input).unwrap();
        assert_eq!(result.quote.annual_premium, 15_000.0 + 6_000.0 + 7_500.0);
        assert_eq!(result.quote.risk_category, RiskCategory::Critical);
        assert_eq!(result.quote.risk_score, 5);
    }

    #[test]
    fn test_negative_premium_clamped() {
        let result = engine(Arc::new(ConstantModel(-250.0)))
            .estimate(&RawInput::default())
            .unwrap();
        assert_eq!(result.quote.annual_premium, 0.0);
    }

    #[test]
    fn test_non_finite_premium_rejected() {
        let err = engine(Arc::new(ConstantModel(f64::NAN)))
            .estimate(&RawInput::default())
            .unwrap_err();
        assert!(matches!(err, InferenceError::InferenceFailed(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_invalid_input_is_input_error() {
        let input = RawInput {
            diabetes: 7,
            ..Default::default()
        };
        let err = engine(Arc::new(TierModel)).estimate(&input).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let engine = engine(Arc::new(TierModel));
        let handles: Vec<_> = (18..26)
            .map(|age| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    let input = RawInput {
                        age,
                        ..Default::default()
                    };
                    engine.estimate(&input).unwrap().quote.annual_premium
                })
            })
            .collect();

        for (age, handle) in (18..26).zip(handles) {
            assert_eq!(handle.join().unwrap(), 15_000.0 + 100.0 * age as f64);
        }
    }
}
