//! Classifier Models

use crate::InferenceError;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// A fitted classifier producing one integer class label per feature row
pub trait Classifier: Send + Sync {
    /// Predict the class label for an already scaled feature row
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;

    /// Model name for logs and diagnostics
    fn name(&self) -> &str;
}

/// Classifier backed by an ONNX graph, executed with tract.
///
/// The graph takes `float32[1, n_features]` and its first output holds the
/// predicted class label.
pub struct OnnxClassifier {
    name: String,
    n_features: usize,
    model: TractModel,
}

impl OnnxClassifier {
    /// Load and optimize an ONNX classifier from disk
    pub fn load(name: &str, path: &Path, n_features: usize) -> Result<Self, InferenceError> {
        info!("Loading {} model from {}", name, path.display());

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, n_features]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", name, e)))?;

        Ok(Self {
            name: name.to_string(),
            n_features,
            model,
        })
    }

    fn run(&self, features: &[f64]) -> TractResult<i64> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.n_features), data)?.into();

        let outputs = self.model.run(tvec!(input.into()))?;
        let label = outputs
            .first()
            .ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?
            .cast_to::<i64>()?;

        label
            .as_slice::<i64>()?
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("empty label tensor"))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::InferenceFailed(format!(
                "{} expects {} features, got {}",
                self.name,
                self.n_features,
                features.len()
            )));
        }

        let label = self
            .run(features)
            .map_err(|e| InferenceError::InferenceFailed(format!("{}: {}", self.name, e)))?;
        debug!("{} predicted label {}", self.name, label);
        Ok(label)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_file() {
        let result = OnnxClassifier::load("binary", Path::new("/nonexistent/model_binary.onnx"), 6);
        match result {
            Err(InferenceError::ModelLoadError(msg)) => assert!(msg.starts_with("binary")),
            _ => panic!("expected load error"),
        }
    }

    #[test]
    fn test_corrupt_model_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an onnx graph").unwrap();

        let result = OnnxClassifier::load("multi", file.path(), 6);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }
}
