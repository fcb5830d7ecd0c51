use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dotted path into a [`DataContainer`](crate::DataContainer).
///
/// `"Velocity.X"` addresses the `X` entry of the `Velocity` object. Paths
/// are part of the persisted wire contract; renaming one breaks round trips
/// of previously serialized data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataQuery {
    parts: Vec<String>,
}

impl DataQuery {
    /// Parse a dotted path. Empty segments are dropped.
    pub fn of(path: &str) -> Self {
        Self {
            parts: path
                .split('.')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append a child segment (which may itself be dotted).
    pub fn then(&self, child: &str) -> Self {
        let mut parts = self.parts.clone();
        parts.extend(DataQuery::of(child).parts);
        Self { parts }
    }

    /// The final segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }
}

impl fmt::Display for DataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

impl From<&str> for DataQuery {
    fn from(path: &str) -> Self {
        Self::of(path)
    }
}

impl From<&DataQuery> for DataQuery {
    fn from(query: &DataQuery) -> Self {
        query.clone()
    }
}

impl Serialize for DataQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataQuery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::of(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_path() {
        let q = DataQuery::of("Velocity.X");
        assert_eq!(q.parts(), &["Velocity".to_string(), "X".to_string()]);
        assert_eq!(q.last(), Some("X"));
    }

    #[test]
    fn empty_segments_dropped() {
        let q = DataQuery::of(".a..b.");
        assert_eq!(q.to_string(), "a.b");
        assert!(DataQuery::of("").is_empty());
    }

    #[test]
    fn then_appends_segments() {
        let q = DataQuery::of("display").then("Lore");
        assert_eq!(q.to_string(), "display.Lore");
        assert_eq!(q, DataQuery::from_parts(["display", "Lore"]));
    }

    #[test]
    fn serde_as_string() {
        let q = DataQuery::of("Velocity.Y");
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "\"Velocity.Y\"");
        let parsed: DataQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, q);
    }
}
