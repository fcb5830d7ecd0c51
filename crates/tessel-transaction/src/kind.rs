use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a transaction.
///
/// Variants are declared from best to worst, so the derived ordering makes
/// `max` the "worst of" operation used when combining results.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    #[default]
    Success,
    /// Vetoed by a hook before anything was attempted.
    Cancelled,
    /// Every attempted value was rejected.
    Failure,
    /// An internal fault interrupted the transaction.
    Error,
}

impl TransactionKind {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Cancelled => "CANCELLED",
            Self::Failure => "FAILURE",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
