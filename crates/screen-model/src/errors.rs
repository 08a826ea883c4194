// errors.rs
use thiserror::Error;

/// Error de la capa de modelo: carga de artefactos, alineación e inferencia.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot read artifact {path}: {source}")]
    ArtifactIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse artifact {path}: {source}")]
    ArtifactFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("descriptor '{0}' missing from computed record")]
    MissingDescriptor(String),

    #[error("dimension mismatch: expected {expected} columns, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
