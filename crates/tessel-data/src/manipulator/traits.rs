use std::fmt;

use serde::Serialize;
use serde_json::Value as Json;
use tessel_types::{DataContainer, Key, KeyDescriptor, KeyId, ValueType};
use tessel_value::{AnyValue, ImmutableValue};

use crate::error::{DataError, DataResult};

/// Identifier of one trait (manipulator) type, e.g. `tessel:colored`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TraitType {
    id: &'static str,
    name: &'static str,
}

impl TraitType {
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }

    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Human-readable name, e.g. `ColoredData`.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TraitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id)
    }
}

/// Read access to a named bundle of values.
///
/// Only the declared keys are answered; any other key yields `None` or
/// `false`, never an error.
pub trait ValueContainer: Clone + fmt::Debug + Send + Sync + 'static {
    const TRAIT: TraitType;

    fn declared_keys() -> &'static [KeyDescriptor];

    /// The erased value for `key`, or `None` if the key is not declared.
    fn value_of(&self, key: KeyId) -> Option<AnyValue>;

    /// Serialized form, keyed by each key's path.
    fn to_container(&self) -> DataContainer;

    fn supports_key(key: KeyId) -> bool {
        Self::declared_keys().iter().any(|d| d.id == key)
    }

    fn supports<E>(&self, key: &Key<E>) -> bool {
        Self::supports_key(key.id())
    }

    fn get_value<E: ValueType>(&self, key: &Key<E>) -> Option<ImmutableValue<E>> {
        self.value_of(key.id())?.typed(key).ok()
    }

    /// The current (actual or default) value of `key`.
    fn get<E: ValueType>(&self, key: &Key<E>) -> Option<E> {
        self.get_value(key).map(|v| v.get().clone())
    }

    fn get_or_else<E: ValueType>(&self, key: &Key<E>, default: E) -> E {
        self.get(key).unwrap_or(default)
    }

    /// Point-in-time snapshot of the declared keys.
    fn keys(&self) -> Vec<KeyDescriptor> {
        Self::declared_keys().to_vec()
    }

    /// Point-in-time snapshot of every declared value.
    fn values(&self) -> Vec<AnyValue> {
        Self::declared_keys()
            .iter()
            .filter_map(|d| self.value_of(d.id))
            .collect()
    }

    /// Whether any value carries actual (non-default) data.
    fn is_populated(&self) -> bool {
        self.values().iter().any(AnyValue::exists)
    }
}

/// A mutable trait.
pub trait DataManipulator: ValueContainer + Default + Ord {
    type Immutable: ImmutableDataManipulator<Mutable = Self> + From<Self>;

    /// Set `key` from its erased form.
    ///
    /// Returns `Ok(false)` for a key this trait does not declare and an
    /// invalid-data error when the value is malformed or out of bounds. On
    /// error the trait is unchanged.
    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool>;

    /// Rebuild from a serialized container; missing required paths are
    /// invalid data.
    fn from_container(container: &DataContainer) -> DataResult<Self>;

    /// Set a typed value and return `self` for chaining. A foreign key is a
    /// no-op.
    fn set<E: ValueType>(&mut self, key: &Key<E>, value: E) -> DataResult<&mut Self> {
        let json = serde_json::to_value(&value).map_err(|e| DataError::invalid(key.id(), e.to_string()))?;
        self.set_raw(key.id(), json)?;
        Ok(self)
    }

    /// Replace the current value of `key` with `f(current)`.
    fn transform<E, F>(&mut self, key: &Key<E>, f: F) -> DataResult<&mut Self>
    where
        E: ValueType,
        F: FnOnce(E) -> E,
    {
        match self.get(key) {
            Some(current) => self.set(key, f(current)),
            None => Ok(self),
        }
    }

    /// A deep copy; mutating it never affects `self`.
    fn copy(&self) -> Self {
        self.clone()
    }

    fn as_immutable(&self) -> Self::Immutable {
        Self::Immutable::from(self.clone())
    }
}

/// An immutable trait. Every "mutation" returns a new instance.
pub trait ImmutableDataManipulator: ValueContainer + Ord {
    type Mutable: DataManipulator;

    fn as_mutable(&self) -> Self::Mutable;

    /// A copy with `key` set to `value`, or `None` when the key is not
    /// declared or the value is invalid.
    fn with<E: ValueType>(&self, key: &Key<E>, value: E) -> Option<Self>
    where
        Self: From<Self::Mutable>,
    {
        if !self.supports(key) {
            return None;
        }
        let mut mutable = self.as_mutable();
        mutable.set(key, value).ok()?;
        Some(Self::from(mutable))
    }
}

/// Decode an erased value for `key`.
pub(crate) fn decode<E: ValueType>(key: &Key<E>, value: Json) -> DataResult<E> {
    serde_json::from_value(value).map_err(|e| DataError::invalid(key.id(), e.to_string()))
}
