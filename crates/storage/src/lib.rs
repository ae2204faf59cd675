//! Artifact Storage
//!
//! Loads the five pre-built model artifacts once at process start and hands
//! them out as one immutable value.

mod artifacts;

pub use artifacts::{ArtifactKind, ArtifactPaths, ArtifactStore, Artifacts};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A required artifact is missing, unreadable or inconsistent
    #[error("Failed to load {artifact} artifact from {}: {reason}", path.display())]
    Artifact {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}
