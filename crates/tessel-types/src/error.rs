use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("missing required field: {path}")]
    MissingField { path: String },

    #[error("invalid field {path}: {reason}")]
    InvalidField { path: String, reason: String },

    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("invalid world id: {0}")]
    InvalidWorldId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
