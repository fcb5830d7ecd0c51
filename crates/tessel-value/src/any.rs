use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as Json;
use tessel_types::{Key, KeyDescriptor, KeyId, ValueType};

use crate::error::{ValueError, ValueResult};
use crate::value::ImmutableValue;

/// Type-erased immutable value.
///
/// This is what crosses the typed/untyped boundary: transaction results,
/// `values()` snapshots, and hook inputs all carry `AnyValue`s. The typed
/// view is recovered with [`typed`](Self::typed) against the original key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnyValue {
    key: KeyDescriptor,
    default: Json,
    actual: Option<Json>,
}

impl AnyValue {
    pub fn new(key: KeyDescriptor, default: Json, actual: Option<Json>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    /// Erase a typed value.
    pub fn of<E: ValueType>(key: &Key<E>, default: &E, actual: Option<&E>) -> Self {
        Self {
            key: key.descriptor(),
            default: encode(key.id(), default),
            actual: actual.map(|a| encode(key.id(), a)),
        }
    }

    pub fn key(&self) -> KeyDescriptor {
        self.key
    }

    pub fn id(&self) -> KeyId {
        self.key.id
    }

    pub fn exists(&self) -> bool {
        self.actual.is_some()
    }

    pub fn get(&self) -> &Json {
        self.actual.as_ref().unwrap_or(&self.default)
    }

    pub fn get_direct(&self) -> Option<&Json> {
        self.actual.as_ref()
    }

    pub fn default_value(&self) -> &Json {
        &self.default
    }

    /// Replace the actual value, keeping key and default.
    pub fn with(&self, actual: Json) -> Self {
        Self {
            key: self.key,
            default: self.default.clone(),
            actual: Some(actual),
        }
    }

    /// Decode the current value (actual or default).
    pub fn decode<E: DeserializeOwned>(&self) -> Option<E> {
        serde_json::from_value(self.get().clone()).ok()
    }

    /// Recover the typed immutable value for `key`.
    pub fn typed<E: ValueType>(&self, key: &Key<E>) -> ValueResult<ImmutableValue<E>> {
        if self.key.id != key.id() {
            return Err(ValueError::KeyMismatch {
                expected: key.id(),
                actual: self.key.id,
            });
        }
        let decode = |raw: &Json| -> ValueResult<E> {
            serde_json::from_value(raw.clone()).map_err(|e| ValueError::Decode {
                key: key.id(),
                reason: e.to_string(),
            })
        };
        let default = decode(&self.default)?;
        let actual = self.actual.as_ref().map(decode).transpose()?;
        Ok(ImmutableValue::from_parts(*key, default, actual))
    }
}

/// Encode a value for the erased representation.
///
/// Element types are restricted to data that serializes to JSON without
/// error; a failure (for example a map with non-string keys) degrades to
/// `null` and is logged.
pub(crate) fn encode<E: Serialize>(key: KeyId, value: &E) -> Json {
    match serde_json::to_value(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "value does not serialize to JSON");
            Json::Null
        }
    }
}
