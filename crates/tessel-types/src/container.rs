use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::TypeError;
use crate::query::DataQuery;

/// Serialized form of a trait: an ordered mapping from dotted paths to
/// JSON values.
///
/// Nested paths are stored as nested objects, so `set("Velocity.X", 1.0)`
/// followed by `set("Velocity.Y", 2.0)` produces
/// `{"Velocity": {"X": 1.0, "Y": 2.0}}`. Setting through a path whose
/// intermediate segment holds a non-object replaces that segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContainer {
    root: Map<String, Json>,
}

impl DataContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Set a value at `path`, creating intermediate objects as needed.
    pub fn set<Q, V>(&mut self, path: Q, value: V) -> &mut Self
    where
        Q: Into<DataQuery>,
        V: Into<Json>,
    {
        let query = path.into();
        let Some((last, parents)) = query.parts().split_last() else {
            return self;
        };

        let mut node = &mut self.root;
        for part in parents {
            let entry = node
                .entry(part.clone())
                .or_insert_with(|| Json::Object(Map::new()));
            if !entry.is_object() {
                *entry = Json::Object(Map::new());
            }
            node = match entry {
                Json::Object(map) => map,
                _ => return self,
            };
        }
        node.insert(last.clone(), value.into());
        self
    }

    /// The raw value at `path`, if present.
    pub fn get<Q: Into<DataQuery>>(&self, path: Q) -> Option<&Json> {
        let query = path.into();
        let (last, parents) = query.parts().split_last()?;
        let mut node = &self.root;
        for part in parents {
            node = node.get(part)?.as_object()?;
        }
        node.get(last)
    }

    pub fn contains<Q: Into<DataQuery>>(&self, path: Q) -> bool {
        self.get(path).is_some()
    }

    /// Remove and return the value at `path`.
    pub fn remove<Q: Into<DataQuery>>(&mut self, path: Q) -> Option<Json> {
        let query = path.into();
        let (last, parents) = query.parts().split_last()?;
        let mut node = &mut self.root;
        for part in parents {
            node = node.get_mut(part)?.as_object_mut()?;
        }
        node.remove(last)
    }

    /// Decode the value at `path`, returning `Ok(None)` when it is absent.
    pub fn get_as<T, Q>(&self, path: Q) -> Result<Option<T>, TypeError>
    where
        T: DeserializeOwned,
        Q: Into<DataQuery>,
    {
        let query = path.into();
        match self.get(&query) {
            None => Ok(None),
            Some(raw) => serde_json::from_value(raw.clone())
                .map(Some)
                .map_err(|e| TypeError::InvalidField {
                    path: query.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Decode the value at `path`, failing with [`TypeError::MissingField`]
    /// when it is absent.
    pub fn require<T, Q>(&self, path: Q) -> Result<T, TypeError>
    where
        T: DeserializeOwned,
        Q: Into<DataQuery>,
    {
        let query = path.into();
        self.get_as(&query)?.ok_or_else(|| TypeError::MissingField {
            path: query.to_string(),
        })
    }

    /// Every leaf path in the container, in key order.
    pub fn paths(&self) -> Vec<DataQuery> {
        fn walk(prefix: &DataQuery, node: &Map<String, Json>, out: &mut Vec<DataQuery>) {
            for (name, value) in node {
                let path = prefix.then(name);
                match value {
                    Json::Object(child) if !child.is_empty() => walk(&path, child, out),
                    _ => out.push(path),
                }
            }
        }
        let mut out = Vec::new();
        walk(&DataQuery::default(), &self.root, &mut out);
        out
    }

    pub fn to_json(&self) -> Json {
        Json::Object(self.root.clone())
    }

    /// Wrap a JSON object. Any other JSON value is rejected.
    pub fn from_json(value: Json) -> Result<Self, TypeError> {
        match value {
            Json::Object(root) => Ok(Self { root }),
            other => Err(TypeError::Serialization(format!(
                "container root must be an object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn set_and_get_top_level() {
        let mut c = DataContainer::new();
        c.set("Color", 0xff0000);
        assert_eq!(c.get("Color"), Some(&json!(0xff0000)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn nested_paths_create_objects() {
        let mut c = DataContainer::new();
        c.set("Velocity.X", 1.5).set("Velocity.Y", -2.0).set("Velocity.Z", 0.0);
        assert_eq!(c.to_json(), json!({"Velocity": {"X": 1.5, "Y": -2.0, "Z": 0.0}}));
        assert_eq!(c.get("Velocity.Y"), Some(&json!(-2.0)));
    }

    #[test]
    fn set_through_scalar_replaces_it() {
        let mut c = DataContainer::new();
        c.set("a", 1).set("a.b", 2);
        assert_eq!(c.to_json(), json!({"a": {"b": 2}}));
    }

    #[test]
    fn require_reports_missing_path() {
        let c = DataContainer::new();
        let err = c.require::<i32, _>("Growth").unwrap_err();
        assert_eq!(
            err,
            TypeError::MissingField {
                path: "Growth".into()
            }
        );
    }

    #[test]
    fn get_as_reports_type_mismatch() {
        let mut c = DataContainer::new();
        c.set("Age", "old");
        let err = c.get_as::<i32, _>("Age").unwrap_err();
        assert!(matches!(err, TypeError::InvalidField { .. }));
    }

    #[test]
    fn remove_nested() {
        let mut c = DataContainer::new();
        c.set("display.Name", "Excalibur");
        assert_eq!(c.remove("display.Name"), Some(json!("Excalibur")));
        assert!(!c.contains("display.Name"));
        assert!(c.remove("display.Missing").is_none());
    }

    #[test]
    fn paths_lists_leaves_in_order() {
        let mut c = DataContainer::new();
        c.set("Lore", json!(["a"])).set("Velocity.X", 1.0).set("Velocity.Y", 2.0);
        let paths: Vec<String> = c.paths().iter().map(ToString::to_string).collect();
        assert_eq!(paths, vec!["Lore", "Velocity.X", "Velocity.Y"]);
    }

    #[test]
    fn from_json_rejects_non_object() {
        assert!(DataContainer::from_json(json!([1, 2])).is_err());
        let c = DataContainer::from_json(json!({"Axis": "y"})).unwrap();
        assert_eq!(c.require::<String, _>("Axis").unwrap(), "y");
    }

    #[test]
    fn serde_roundtrip() {
        let mut c = DataContainer::new();
        c.set("Direction", "north").set("Velocity.X", 3.0);
        let text = serde_json::to_string(&c).unwrap();
        let parsed: DataContainer = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, c);
    }

    proptest! {
        #[test]
        fn set_then_get_returns_value(
            segments in proptest::collection::vec("[A-Za-z]{1,6}", 1..4),
            value in any::<i64>(),
        ) {
            let path = segments.join(".");
            let mut c = DataContainer::new();
            c.set(path.as_str(), value);
            prop_assert_eq!(c.require::<i64, _>(path.as_str()).unwrap(), value);
        }
    }
}
