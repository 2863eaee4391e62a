//! Error types for model fitting and artifact handling.

/// Errors that can occur while fitting, forecasting, or moving artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("empty input series")]
    EmptyData,

    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported artifact format version {got} (this build reads version {expected})")]
    UnsupportedArtifact { expected: u32, got: u32 },
}
