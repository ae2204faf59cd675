//! Fitted Feature Scaler

use crate::InferenceError;
use feature_engine::{schema, FeatureVector};
use serde::Deserialize;

/// Scaling transform with its fitted parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum NormalizationMethod {
    /// Standardization: `(x - mean) / scale`
    ZScore { mean: Vec<f64>, scale: Vec<f64> },
    /// Min-max: `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
    /// No normalization
    None { n_features: usize },
}

impl NormalizationMethod {
    fn name(&self) -> &'static str {
        match self {
            NormalizationMethod::ZScore { .. } => "z_score",
            NormalizationMethod::MinMax { .. } => "min_max",
            NormalizationMethod::None { .. } => "none",
        }
    }
}

#[derive(Deserialize)]
struct ScalerArtifact {
    #[serde(flatten)]
    method: NormalizationMethod,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
}

/// Scaler fitted at training time. Parameters never change after load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ScalerArtifact")]
pub struct Scaler {
    method: NormalizationMethod,
    feature_names: Option<Vec<String>>,
}

impl TryFrom<ScalerArtifact> for Scaler {
    type Error = InferenceError;

    fn try_from(artifact: ScalerArtifact) -> Result<Self, Self::Error> {
        Scaler::new(artifact.method, artifact.feature_names)
    }
}

impl Scaler {
    /// Create a scaler from fitted parameters
    pub fn new(
        method: NormalizationMethod,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self, InferenceError> {
        let n_features = match &method {
            NormalizationMethod::ZScore { mean, scale } => {
                check_params(mean, scale)?;
                if scale.iter().any(|s| *s == 0.0) {
                    return Err(InferenceError::InvalidScaler(
                        "z_score scale contains zero".to_string(),
                    ));
                }
                mean.len()
            }
            NormalizationMethod::MinMax { min, scale } => {
                check_params(min, scale)?;
                min.len()
            }
            NormalizationMethod::None { n_features } => *n_features,
        };

        if n_features == 0 {
            return Err(InferenceError::InvalidScaler("no features".to_string()));
        }

        if let Some(names) = &feature_names {
            if names.len() != n_features {
                return Err(InferenceError::InvalidScaler(format!(
                    "{} feature names for {} features",
                    names.len(),
                    n_features
                )));
            }
        }

        Ok(Self {
            method,
            feature_names,
        })
    }

    /// Identity scaler of the given dimension
    pub fn identity(n_features: usize) -> Result<Self, InferenceError> {
        Self::new(NormalizationMethod::None { n_features }, None)
    }

    /// Number of features the scaler was fit on
    pub fn n_features(&self) -> usize {
        match &self.method {
            NormalizationMethod::ZScore { mean, .. } => mean.len(),
            NormalizationMethod::MinMax { min, .. } => min.len(),
            NormalizationMethod::None { n_features } => *n_features,
        }
    }

    /// Method name
    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    /// Column names recorded at fit time, if any
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Whether the scaler agrees with the training feature schema
    pub fn matches_schema(&self) -> bool {
        self.n_features() == schema::FEATURE_DIMENSION
            && self
                .feature_names
                .as_deref()
                .map_or(true, |names| schema::matches_schema(names))
    }

    /// Apply the fitted transform
    pub fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        if features.dimension() != self.n_features() {
            return Err(InferenceError::ScalingError {
                expected: self.n_features(),
                actual: features.dimension(),
            });
        }

        let values = features.values();

        let scaled = match &self.method {
            NormalizationMethod::ZScore { mean, scale } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            NormalizationMethod::MinMax { min, scale } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            NormalizationMethod::None { .. } => values.to_vec(),
        };
        Ok(scaled)
    }
}

fn check_params(offset: &[f64], scale: &[f64]) -> Result<(), InferenceError> {
    if offset.len() != scale.len() {
        return Err(InferenceError::InvalidScaler(format!(
            "parameter length mismatch: {} vs {}",
            offset.len(),
            scale.len()
        )));
    }
    if offset.iter().chain(scale).any(|v| !v.is_finite()) {
        return Err(InferenceError::InvalidScaler(
            "non-finite parameter".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FeatureVector {
        FeatureVector::from_values(vec![1.0, 300.0, 305.0, 1500.0, 50.0, 100.0])
    }

    #[test]
    fn test_zscore_transform() {
        let scaler = Scaler::new(
            NormalizationMethod::ZScore {
                mean: vec![1.0, 300.0, 310.0, 1500.0, 40.0, 100.0],
                scale: vec![1.0, 2.0, 5.0, 100.0, 10.0, 50.0],
            },
            None,
        )
        .unwrap();

        let scaled = scaler.transform(&features()).unwrap();
        assert_eq!(scaled, vec![0.0, 0.0, -1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_minmax_transform() {
        let scaler = Scaler::new(
            NormalizationMethod::MinMax {
                min: vec![0.0, -29.0, 0.0, 0.0, 0.0, 0.0],
                scale: vec![0.5, 0.1, 1.0, 0.001, 0.02, 0.01],
            },
            None,
        )
        .unwrap();

        let scaled = scaler.transform(&features()).unwrap();
        assert!((scaled[0] - 0.5).abs() < 1e-12);
        assert!((scaled[1] - 1.0).abs() < 1e-9);
        assert!((scaled[3] - 1.5).abs() < 1e-9);
        assert!((scaled[4] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let scaler = Scaler::identity(6).unwrap();
        let short = FeatureVector::from_values(vec![1.0; 5]);
        assert!(matches!(
            scaler.transform(&short),
            Err(InferenceError::ScalingError { expected: 6, actual: 5 })
        ));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(Scaler::new(
            NormalizationMethod::ZScore {
                mean: vec![0.0; 6],
                scale: vec![1.0; 5],
            },
            None,
        )
        .is_err());

        assert!(Scaler::new(
            NormalizationMethod::ZScore {
                mean: vec![0.0; 2],
                scale: vec![1.0, 0.0],
            },
            None,
        )
        .is_err());

        assert!(Scaler::identity(0).is_err());
        assert!(Scaler::new(
            NormalizationMethod::None { n_features: 6 },
            Some(vec!["Type".into()]),
        )
        .is_err());
    }

    #[test]
    fn test_deserialize_artifact() {
        let json = r#"{
            "method": "z_score",
            "mean": [1, 300.0, 310.0, 1538.8, 39.98, 107.95],
            "scale": [0.6, 2.0, 1.48, 179.3, 9.97, 63.65],
            "feature_names": ["Type", "Air temperature [K]", "Process temperature [K]",
                              "Rotational speed [rpm]", "Torque [Nm]", "Tool wear [min]"]
        }"#;
        let scaler: Scaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.method_name(), "z_score");
        assert_eq!(scaler.n_features(), 6);
        assert!(scaler.matches_schema());
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let json = r#"{"method": "min_max", "min": [0.0, 0.0], "scale": [1.0]}"#;
        assert!(serde_json::from_str::<Scaler>(json).is_err());
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let mut names: Vec<String> = schema::FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
        names.swap(3, 4);
        let scaler = Scaler::new(NormalizationMethod::None { n_features: 6 }, Some(names)).unwrap();
        assert!(!scaler.matches_schema());
        assert!(!Scaler::identity(5).unwrap().matches_schema());
    }
}
