use tessel_types::KeyId;

/// Errors produced by value operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A bounded value was offered something outside its range.
    #[error("value {value} for {key} is outside [{min}, {max}]")]
    OutOfBounds {
        key: KeyId,
        value: String,
        min: String,
        max: String,
    },

    /// A list index was outside the current element range.
    #[error("index {index} out of range for {key} (len {len})")]
    IndexOutOfRange { key: KeyId, index: usize, len: usize },

    /// A type-erased value was decoded against the wrong key.
    #[error("key mismatch: expected {expected}, got {actual}")]
    KeyMismatch { expected: KeyId, actual: KeyId },

    /// A type-erased value could not be decoded into the key's element type.
    #[error("cannot decode value for {key}: {reason}")]
    Decode { key: KeyId, reason: String },
}

/// Result alias for value operations.
pub type ValueResult<T> = Result<T, ValueError>;
