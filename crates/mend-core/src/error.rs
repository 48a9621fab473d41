//! Error types for mend

use thiserror::Error;

/// The main error type for mend operations
#[derive(Debug, Error)]
pub enum MendError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Registry version mismatch: expected {expected}, found {found}")]
    RegistryVersionMismatch { expected: u32, found: u32 },

    #[error("Registry locked: {0}")]
    RegistryLocked(String),

    #[error("Spec error: {0}")]
    SpecError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for mend operations
pub type Result<T> = std::result::Result<T, MendError>;
