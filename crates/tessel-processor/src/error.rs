use tessel_data::DataError;
use tessel_holder::HolderError;
use tessel_types::KeyId;
use thiserror::Error;

/// Errors raised inside a processor.
///
/// [`Rejected`](ProcessorError::Rejected) and
/// [`Data`](ProcessorError::Data) describe values the holder refused; they
/// end up in a FAILURE result. The other variants are internal faults and
/// end up in an ERROR result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("value for {key} rejected: {reason}")]
    Rejected { key: KeyId, reason: String },

    #[error("invalid data: {0}")]
    Data(#[from] DataError),

    #[error("native holder error: {0}")]
    Holder(#[from] HolderError),

    #[error("processor {processor} failed: {reason}")]
    Internal {
        processor: &'static str,
        reason: String,
    },
}

impl ProcessorError {
    pub fn rejected(key: KeyId, reason: impl Into<String>) -> Self {
        Self::Rejected {
            key,
            reason: reason.into(),
        }
    }

    pub fn internal(processor: &'static str, reason: impl Into<String>) -> Self {
        Self::Internal {
            processor,
            reason: reason.into(),
        }
    }

    /// Whether the error means the value was refused rather than a fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Data(_))
    }

    /// Reason text suitable for a rejected-value entry.
    pub fn reason(&self) -> String {
        match self {
            Self::Rejected { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// Result alias for processor operations.
pub type ProcessorResult<T> = Result<T, ProcessorError>;
