use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A native tagged value, as found in raw holder fields and persistence
/// blobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    Compound(TagCompound),
}

impl Tag {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Short(_) => "short",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::Float(_) => "float",
            Tag::Double(_) => "double",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }

    /// Integer view; byte, short and int widen, long narrows if it fits.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Byte(v) => Some(i32::from(*v)),
            Tag::Short(v) => Some(i32::from(*v)),
            Tag::Int(v) => Some(*v),
            Tag::Long(v) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.as_i32().and_then(|v| i16::try_from(v).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tag::Float(v) => Some(f64::from(*v)),
            Tag::Double(v) => Some(*v),
            other => other.as_i32().map(f64::from),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i32().map(|v| v != 0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&TagCompound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// A list of string tags.
    pub fn string_list<I, S>(items: I) -> Tag
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tag::List(items.into_iter().map(|s| Tag::String(s.into())).collect())
    }

    pub fn to_json(&self) -> Json {
        match self {
            Tag::Byte(v) => Json::from(*v),
            Tag::Short(v) => Json::from(*v),
            Tag::Int(v) => Json::from(*v),
            Tag::Long(v) => Json::from(*v),
            Tag::Float(v) => Json::from(f64::from(*v)),
            Tag::Double(v) => Json::from(*v),
            Tag::String(s) => Json::from(s.as_str()),
            Tag::List(items) => Json::Array(items.iter().map(Tag::to_json).collect()),
            Tag::Compound(c) => c.to_json(),
        }
    }

    /// Best-effort conversion from JSON: integers become `Int` (or `Long`
    /// when they do not fit), other numbers `Double`, booleans `Byte`.
    /// `null` has no tag form.
    pub fn from_json(value: &Json) -> Option<Tag> {
        Some(match value {
            Json::Null => return None,
            Json::Bool(b) => Tag::Byte(i8::from(*b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).map(Tag::Int).unwrap_or(Tag::Long(i)),
                None => Tag::Double(n.as_f64()?),
            },
            Json::String(s) => Tag::String(s.clone()),
            Json::Array(items) => Tag::List(items.iter().filter_map(Tag::from_json).collect()),
            Json::Object(map) => {
                let mut compound = TagCompound::new();
                for (name, v) in map {
                    if let Some(tag) = Tag::from_json(v) {
                        compound.insert(name.clone(), tag);
                    }
                }
                Tag::Compound(compound)
            }
        })
    }
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<i16> for Tag {
    fn from(v: i16) -> Self {
        Tag::Short(v)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<bool> for Tag {
    fn from(v: bool) -> Self {
        Tag::Byte(i8::from(v))
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_string())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

impl From<TagCompound> for Tag {
    fn from(v: TagCompound) -> Self {
        Tag::Compound(v)
    }
}

/// Named tags, kept in name order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCompound {
    entries: BTreeMap<String, Tag>,
}

impl TagCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(name.into(), tag.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        self.entries.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Tag::as_i32)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Tag::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&[Tag]> {
        self.get(name).and_then(Tag::as_list)
    }

    /// A nested compound, if present.
    pub fn compound(&self, name: &str) -> Option<&TagCompound> {
        self.get(name).and_then(Tag::as_compound)
    }

    /// A nested compound, created when missing. `None` when `name` already
    /// holds a tag of another type.
    pub fn compound_mut(&mut self, name: &str) -> Option<&mut TagCompound> {
        match self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Tag::Compound(TagCompound::new()))
        {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Json {
        Json::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Tag)> for TagCompound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
