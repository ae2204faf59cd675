//! Two-Stage Inference Pipeline

use crate::classifier::Classifier;
use crate::scaler::Scaler;
use crate::InferenceError;
use feature_engine::{FeatureVector, LabelEncoder};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Binary classifier label for a healthy machine
const NO_FAILURE_LABEL: i64 = 0;

/// Prediction result from inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Whether the binary gate predicted a failure
    pub will_fail: bool,
    /// Decoded failure type, present only when `will_fail` is set
    pub failure_type: Option<String>,
}

impl PredictionResult {
    /// No failure expected
    pub fn healthy() -> Self {
        Self {
            will_fail: false,
            failure_type: None,
        }
    }

    /// Failure expected with the given type
    pub fn failure(failure_type: impl Into<String>) -> Self {
        Self {
            will_fail: true,
            failure_type: Some(failure_type.into()),
        }
    }
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: PredictionResult,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Cascade stage after scaling
enum Stage {
    /// Run the binary failure gate
    Gate,
    /// Run the failure-type classifier and decode its label
    Classify,
    /// Terminal
    Done(PredictionResult),
}

/// Scaler plus binary gate plus failure-type classifier.
///
/// Holds only artifacts fixed at load time; `predict` takes `&self` and
/// never mutates them.
pub struct InferencePipeline {
    scaler: Scaler,
    binary: Box<dyn Classifier>,
    multi: Box<dyn Classifier>,
    failure_encoder: LabelEncoder,
}

impl InferencePipeline {
    /// Create a new pipeline from loaded artifacts
    pub fn new(
        scaler: Scaler,
        binary: Box<dyn Classifier>,
        multi: Box<dyn Classifier>,
        failure_encoder: LabelEncoder,
    ) -> Self {
        Self {
            scaler,
            binary,
            multi,
            failure_encoder,
        }
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let scaled = self.scaler.transform(features)?;

        let mut stage = Stage::Gate;
        loop {
            stage = match stage {
                Stage::Gate => {
                    let label = self.binary.predict(&scaled)?;
                    debug!("{} gate label {}", self.binary.name(), label);
                    if label == NO_FAILURE_LABEL {
                        Stage::Done(PredictionResult::healthy())
                    } else {
                        Stage::Classify
                    }
                }
                Stage::Classify => {
                    let code = self.multi.predict(&scaled)?;
                    let label = self
                        .failure_encoder
                        .decode(code)
                        .map_err(InferenceError::DecodeError)?;
                    debug!("{} failure code {} -> {}", self.multi.name(), code, label);
                    Stage::Done(PredictionResult::failure(label))
                }
                Stage::Done(prediction) => return Ok(prediction),
            };
        }
    }

    /// Run inference and measure its latency
    pub fn run(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();
        let prediction = self.predict(features)?;
        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Inference completed in {}us", latency_us);

        Ok(InferenceResult {
            prediction,
            latency_us,
        })
    }

    /// Fitted scaler
    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Failure-type label encoder
    pub fn failure_encoder(&self) -> &LabelEncoder {
        &self.failure_encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Classifier stub returning a fixed label and counting calls
    struct FixedClassifier {
        label: i64,
        calls: Arc<AtomicUsize>,
    }

    impl FixedClassifier {
        fn boxed(label: i64) -> (Box<dyn Classifier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let classifier = Self {
                label,
                calls: calls.clone(),
            };
            (Box::new(classifier), calls)
        }
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &[f64]) -> Result<i64, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.label)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn failure_encoder() -> LabelEncoder {
        LabelEncoder::new(
            "failure type",
            [
                "Heat Dissipation Failure",
                "No Failure",
                "Overstrain Failure",
                "Power Failure",
                "Random Failures",
                "Tool Wear Failure",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
        .unwrap()
    }

    fn scenario_features() -> FeatureVector {
        // [code(L), 300.0, 305.0, 1500, 50.0, 100]
        FeatureVector::from_values(vec![1.0, 300.0, 305.0, 1500.0, 50.0, 100.0])
    }

    fn pipeline(
        binary_label: i64,
        multi_label: i64,
    ) -> (InferencePipeline, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let (binary, binary_calls) = FixedClassifier::boxed(binary_label);
        let (multi, multi_calls) = FixedClassifier::boxed(multi_label);
        let pipeline = InferencePipeline::new(
            Scaler::identity(6).unwrap(),
            binary,
            multi,
            failure_encoder(),
        );
        (pipeline, binary_calls, multi_calls)
    }

    #[test]
    fn test_gate_no_failure_skips_multiclass() {
        let (pipeline, binary_calls, multi_calls) = pipeline(0, 0);

        let result = pipeline.predict(&scenario_features()).unwrap();
        assert_eq!(result, PredictionResult::healthy());
        assert_eq!(binary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(multi_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_gate_failure_runs_multiclass() {
        let code = failure_encoder().encode("Heat Dissipation Failure").unwrap();
        let (pipeline, binary_calls, multi_calls) = pipeline(1, code);

        let result = pipeline.predict(&scenario_features()).unwrap();
        assert_eq!(result, PredictionResult::failure("Heat Dissipation Failure"));
        assert!(result.will_fail);
        assert_eq!(binary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(multi_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_any_nonzero_gate_label_is_failure() {
        for gate in [-1, 2, 7] {
            let (pipeline, _, multi_calls) = pipeline(gate, 3);
            let result = pipeline.predict(&scenario_features()).unwrap();
            assert_eq!(result.failure_type.as_deref(), Some("Power Failure"));
            assert_eq!(multi_calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_predict_is_idempotent() {
        let (pipeline, _, _) = pipeline(1, 5);
        let features = scenario_features();

        let first = pipeline.predict(&features).unwrap();
        let second = pipeline.predict(&features).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scaling_error_before_any_model() {
        let (pipeline, binary_calls, multi_calls) = pipeline(1, 0);
        let short = FeatureVector::from_values(vec![1.0, 300.0]);

        let err = pipeline.predict(&short).unwrap_err();
        assert!(matches!(err, InferenceError::ScalingError { expected: 6, actual: 2 }));
        assert_eq!(binary_calls.load(Ordering::SeqCst), 0);
        assert_eq!(multi_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_decode_error_is_recoverable() {
        let (pipeline, _, multi_calls) = pipeline(1, 42);

        let err = pipeline.predict(&scenario_features()).unwrap_err();
        assert_eq!(err.kind(), "decode_error");

        // Same request fails the same way; nothing was cached or mutated
        let again = pipeline.predict(&scenario_features()).unwrap_err();
        assert_eq!(again.kind(), "decode_error");
        assert_eq!(multi_calls.load(Ordering::SeqCst), 2);
        assert_eq!(pipeline.failure_encoder().classes().len(), 6);
    }

    #[test]
    fn test_run_reports_prediction() {
        let (pipeline, _, _) = pipeline(0, 0);
        let result = pipeline.run(&scenario_features()).unwrap();
        assert!(!result.prediction.will_fail);
        assert!(result.prediction.failure_type.is_none());
    }
}
