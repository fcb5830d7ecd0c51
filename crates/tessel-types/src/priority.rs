use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Merge precedence used when reconciling an incoming trait with the state
/// a holder already carries.
///
/// The token is pure configuration passed into a merge; it is never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataPriority {
    /// The holder's existing values win outright.
    DataHolder,
    /// The holder's values fill only what the incoming trait has not set.
    PreMerge,
    /// The incoming trait replaces the holder's state; nothing is read back.
    #[default]
    DataManipulator,
    /// The holder wins on scalars; incoming collection elements are appended.
    PostMerge,
}

impl DataPriority {
    pub const ALL: [DataPriority; 4] = [
        Self::DataHolder,
        Self::PreMerge,
        Self::DataManipulator,
        Self::PostMerge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataHolder => "DATA_HOLDER",
            Self::PreMerge => "PRE_MERGE",
            Self::DataManipulator => "DATA_MANIPULATOR",
            Self::PostMerge => "POST_MERGE",
        }
    }
}

impl fmt::Display for DataPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataPriority {
    type Err = TypeError;

    /// Accepts the canonical names case-insensitively, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| TypeError::UnknownPriority(s.to_string()))
    }
}
