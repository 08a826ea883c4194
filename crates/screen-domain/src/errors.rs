// errors.rs
use thiserror::Error;

/// Error del dominio molecular (parsing y validación de estructuras).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid SMILES: {0}")]
    ParseError(String),

    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}
