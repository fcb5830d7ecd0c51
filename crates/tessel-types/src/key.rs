use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::query::DataQuery;

/// Bound satisfied by every element type a [`Key`] can point at.
///
/// Values cross the type-erased seams of the framework (transaction audit
/// trails, the priority merge, serialized containers) as JSON, so the
/// element must round-trip through serde.
pub trait ValueType:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> ValueType for T where
    T: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Stable identifier of a key, e.g. `"tessel:color"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyId(&'static str);

impl KeyId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.0)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The shape of the value a key is associated with.
///
/// The shape decides how the priority merge treats a field: single values
/// are scalars, the other shapes are collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Single,
    List,
    Set,
    Map,
}

impl ValueShape {
    /// Returns `true` for list, set, and map shapes.
    pub fn is_collection(&self) -> bool {
        !matches!(self, Self::Single)
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::List => write!(f, "list"),
            Self::Set => write!(f, "set"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// Type-erased description of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct KeyDescriptor {
    pub id: KeyId,
    pub shape: ValueShape,
    /// Dotted serialization path, e.g. `"Velocity"` or `"Lore"`.
    pub path: &'static str,
}

impl KeyDescriptor {
    /// The serialization path as a parsed query.
    pub fn query(&self) -> DataQuery {
        DataQuery::of(self.path)
    }
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.shape, self.path)
    }
}

/// Immutable identifier for one property slot holding values of type `E`.
///
/// A key carries no data and no default; whoever produces a value for the
/// key decides the default. Keys are `const`-constructible and meant to be
/// declared once as process-wide constants:
///
/// ```rust
/// use tessel_types::Key;
///
/// const HEALTH: Key<f64> = Key::single("example:health", "Health");
/// assert_eq!(HEALTH.id().as_str(), "example:health");
/// ```
pub struct Key<E> {
    descriptor: KeyDescriptor,
    _element: PhantomData<fn() -> E>,
}

impl<E> Key<E> {
    pub const fn new(id: &'static str, shape: ValueShape, path: &'static str) -> Self {
        Self {
            descriptor: KeyDescriptor {
                id: KeyId::new(id),
                shape,
                path,
            },
            _element: PhantomData,
        }
    }

    /// A key for a single (scalar) value.
    pub const fn single(id: &'static str, path: &'static str) -> Self {
        Self::new(id, ValueShape::Single, path)
    }

    /// A key for an ordered list value.
    pub const fn list(id: &'static str, path: &'static str) -> Self {
        Self::new(id, ValueShape::List, path)
    }

    /// A key for a set value.
    pub const fn set(id: &'static str, path: &'static str) -> Self {
        Self::new(id, ValueShape::Set, path)
    }

    /// A key for a map value.
    pub const fn map(id: &'static str, path: &'static str) -> Self {
        Self::new(id, ValueShape::Map, path)
    }

    pub const fn id(&self) -> KeyId {
        self.descriptor.id
    }

    pub const fn shape(&self) -> ValueShape {
        self.descriptor.shape
    }

    pub const fn path(&self) -> &'static str {
        self.descriptor.path
    }

    pub const fn descriptor(&self) -> KeyDescriptor {
        self.descriptor
    }

    pub fn query(&self) -> DataQuery {
        self.descriptor.query()
    }
}

// Manual impls: deriving would require `E: Clone` and friends.

impl<E> Clone for Key<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Key<E> {}

impl<E> PartialEq for Key<E> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor
    }
}

impl<E> Eq for Key<E> {}

impl<E> Hash for Key<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.hash(state);
    }
}

impl<E> fmt::Debug for Key<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.descriptor.id.as_str())
            .field("shape", &self.descriptor.shape)
            .field("path", &self.descriptor.path)
            .finish()
    }
}

impl<E> fmt::Display for Key<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.descriptor.id, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: Key<String> = Key::single("test:name", "Name");
    const TAGS: Key<Vec<String>> = Key::list("test:tags", "Meta.Tags");

    #[test]
    fn const_keys_expose_descriptor() {
        assert_eq!(NAME.id(), KeyId::new("test:name"));
        assert_eq!(NAME.shape(), ValueShape::Single);
        assert_eq!(NAME.path(), "Name");
        assert_eq!(TAGS.shape(), ValueShape::List);
    }

    #[test]
    fn key_query_splits_path() {
        assert_eq!(TAGS.query().parts(), &["Meta".to_string(), "Tags".to_string()]);
    }

    #[test]
    fn keys_compare_by_descriptor() {
        let a: Key<u8> = Key::single("test:a", "A");
        let b: Key<u8> = Key::single("test:a", "A");
        let c: Key<u8> = Key::single("test:c", "A");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn shape_collection_flag() {
        assert!(!ValueShape::Single.is_collection());
        assert!(ValueShape::List.is_collection());
        assert!(ValueShape::Set.is_collection());
        assert!(ValueShape::Map.is_collection());
    }

    #[test]
    fn display_is_id() {
        assert_eq!(format!("{NAME}"), "test:name");
        assert_eq!(format!("{}", NAME.descriptor()), "test:name (single, Name)");
    }

    #[test]
    fn key_id_serializes_as_string() {
        let json = serde_json::to_string(&NAME.id()).unwrap();
        assert_eq!(json, "\"test:name\"");
    }
}
