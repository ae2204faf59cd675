//! Artifact Store Implementation

use crate::StorageError;
use feature_engine::{FeatureEncoder, LabelEncoder, FEATURE_DIMENSION};
use inference_engine::{InferencePipeline, OnnxClassifier, Scaler};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The five artifacts required at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Scaler,
    BinaryModel,
    MultiModel,
    TypeEncoder,
    FailureEncoder,
}

impl ArtifactKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::BinaryModel => "binary classifier",
            ArtifactKind::MultiModel => "multi-class classifier",
            ArtifactKind::TypeEncoder => "machine type encoder",
            ArtifactKind::FailureEncoder => "failure type encoder",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact locations. File names are resolved against `dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub scaler: PathBuf,
    pub binary_model: PathBuf,
    pub multi_model: PathBuf,
    pub type_encoder: PathBuf,
    pub failure_encoder: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            scaler: PathBuf::from("scaler.json"),
            binary_model: PathBuf::from("model_binary.onnx"),
            multi_model: PathBuf::from("model_multi.onnx"),
            type_encoder: PathBuf::from("label_encoder_type.json"),
            failure_encoder: PathBuf::from("label_encoder_target.json"),
        }
    }
}

impl ArtifactPaths {
    /// Full path of one artifact
    pub fn resolve(&self, kind: ArtifactKind) -> PathBuf {
        let file = match kind {
            ArtifactKind::Scaler => &self.scaler,
            ArtifactKind::BinaryModel => &self.binary_model,
            ArtifactKind::MultiModel => &self.multi_model,
            ArtifactKind::TypeEncoder => &self.type_encoder,
            ArtifactKind::FailureEncoder => &self.failure_encoder,
        };
        self.dir.join(file)
    }
}

/// Serialized label encoder
#[derive(Debug, Deserialize)]
struct LabelEncoderArtifact {
    classes: Vec<String>,
}

/// Everything inference needs, loaded once and read-only afterwards
pub struct Artifacts {
    encoder: FeatureEncoder,
    pipeline: InferencePipeline,
}

impl Artifacts {
    /// Assemble from already constructed parts
    pub fn new(encoder: FeatureEncoder, pipeline: InferencePipeline) -> Self {
        Self { encoder, pipeline }
    }

    /// Feature encoder (holds the machine-type encoder)
    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Scaler and classifier cascade
    pub fn pipeline(&self) -> &InferencePipeline {
        &self.pipeline
    }
}

/// Loads artifacts from disk
pub struct ArtifactStore {
    paths: ArtifactPaths,
}

impl ArtifactStore {
    /// Create a new store over the given locations
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    /// Load all five artifacts, failing on the first one that is unusable
    pub fn load(&self) -> Result<Artifacts, StorageError> {
        info!("Loading artifacts from {}", self.paths.dir.display());

        let scaler = self.load_scaler()?;
        let type_encoder = self.load_encoder(ArtifactKind::TypeEncoder)?;
        let failure_encoder = self.load_encoder(ArtifactKind::FailureEncoder)?;
        let binary = self.load_classifier(ArtifactKind::BinaryModel)?;
        let multi = self.load_classifier(ArtifactKind::MultiModel)?;

        info!(
            "Artifacts loaded: scaler={}, machine types={:?}, failure types={}",
            scaler.method_name(),
            type_encoder.classes(),
            failure_encoder.classes().len()
        );

        let pipeline =
            InferencePipeline::new(scaler, Box::new(binary), Box::new(multi), failure_encoder);
        Ok(Artifacts::new(FeatureEncoder::new(type_encoder), pipeline))
    }

    /// Load and check the fitted scaler
    pub fn load_scaler(&self) -> Result<Scaler, StorageError> {
        let kind = ArtifactKind::Scaler;
        let (path, raw) = self.read(kind)?;

        let scaler: Scaler =
            serde_json::from_str(&raw).map_err(|e| artifact_error(kind, &path, e))?;

        if !scaler.matches_schema() {
            return Err(artifact_error(
                kind,
                &path,
                format!(
                    "fitted on {} features {:?}, expected {} in training order",
                    scaler.n_features(),
                    scaler.feature_names().unwrap_or_default(),
                    FEATURE_DIMENSION
                ),
            ));
        }

        debug!("Scaler loaded ({})", scaler.method_name());
        Ok(scaler)
    }

    /// Load one of the two label encoders
    pub fn load_encoder(&self, kind: ArtifactKind) -> Result<LabelEncoder, StorageError> {
        let (path, raw) = self.read(kind)?;

        let artifact: LabelEncoderArtifact =
            serde_json::from_str(&raw).map_err(|e| artifact_error(kind, &path, e))?;

        LabelEncoder::new(kind.as_str(), artifact.classes).map_err(|e| artifact_error(kind, &path, e))
    }

    fn load_classifier(&self, kind: ArtifactKind) -> Result<OnnxClassifier, StorageError> {
        let path = self.existing_path(kind)?;
        OnnxClassifier::load(kind.as_str(), &path, FEATURE_DIMENSION)
            .map_err(|e| artifact_error(kind, &path, e))
    }

    fn read(&self, kind: ArtifactKind) -> Result<(PathBuf, String), StorageError> {
        let path = self.existing_path(kind)?;
        let raw = std::fs::read_to_string(&path).map_err(|e| artifact_error(kind, &path, e))?;
        Ok((path, raw))
    }

    fn existing_path(&self, kind: ArtifactKind) -> Result<PathBuf, StorageError> {
        let path = self.paths.resolve(kind);
        if !path.is_file() {
            return Err(artifact_error(kind, &path, "file not found"));
        }
        Ok(path)
    }
}

fn artifact_error(kind: ArtifactKind, path: &Path, reason: impl fmt::Display) -> StorageError {
    StorageError::Artifact {
        artifact: kind,
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
