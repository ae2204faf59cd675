//! Failure Inference Engine
//!
//! Scales a feature vector with the fitted scaler and runs the binary
//! failure gate, followed by the failure-type classifier when the gate fires.

mod classifier;
mod engine;
mod scaler;

pub use classifier::{Classifier, OnnxClassifier};
pub use engine::{InferencePipeline, InferenceResult, PredictionResult};
pub use scaler::{NormalizationMethod, Scaler};

use feature_engine::EncodingError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Scaling failed: expected {expected} features, got {actual}")]
    ScalingError { expected: usize, actual: usize },
    #[error("Failure type decode failed: {0}")]
    DecodeError(#[source] EncodingError),
    #[error("Invalid scaler: {0}")]
    InvalidScaler(String),
}

impl InferenceError {
    /// Stable short name for reporting
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::ModelLoadError(_) => "model_load_error",
            InferenceError::InferenceFailed(_) => "inference_failed",
            InferenceError::ScalingError { .. } => "scaling_error",
            InferenceError::DecodeError(_) => "decode_error",
            InferenceError::InvalidScaler(_) => "invalid_scaler",
        }
    }
}
