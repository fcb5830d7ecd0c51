use tessel_types::{BlockPos, WorldId};
use thiserror::Error;

/// Errors produced by native holders and block stores.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HolderError {
    #[error("{holder} has no field {field}")]
    UnsupportedField { holder: String, field: String },

    #[error("field {field} expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field {field} is required and cannot be cleared")]
    RequiredField { field: String },

    #[error("{holder} has no tag storage")]
    NoTagStorage { holder: String },

    #[error("unknown block type: {0}")]
    UnknownBlock(String),

    #[error("unknown block state: {0}")]
    UnknownState(u32),

    #[error("block {block} has no property {property}")]
    UnknownProperty { block: String, property: String },

    #[error("invalid value {value} for property {property} of {block}")]
    InvalidPropertyValue {
        block: String,
        property: String,
        value: String,
    },

    #[error("no block at {pos} in world {world}")]
    NoBlock { world: WorldId, pos: BlockPos },

    #[error("block store lock poisoned")]
    LockPoisoned,
}

/// Result alias for holder operations.
pub type HolderResult<T> = Result<T, HolderError>;
