use tessel_types::{KeyId, TypeError};
use tessel_value::ValueError;
use thiserror::Error;

/// Errors produced by trait construction and mutation.
///
/// Every variant is an invalid-data condition: the caller supplied data
/// that cannot be represented by the trait.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("invalid data for {key}: {reason}")]
    InvalidData { key: KeyId, reason: String },

    #[error("invalid container: {0}")]
    Container(#[from] TypeError),

    #[error("invalid value: {0}")]
    Value(#[from] ValueError),
}

impl DataError {
    pub fn invalid(key: KeyId, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            key,
            reason: reason.into(),
        }
    }
}

/// Result alias for trait operations.
pub type DataResult<T> = Result<T, DataError>;
