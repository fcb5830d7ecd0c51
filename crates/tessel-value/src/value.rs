use tessel_types::{Key, ValueType};

use crate::any::AnyValue;

/// Mutable value handle bound to exactly one [`Key`].
///
/// Holds a default that never changes after construction and an optional
/// actual value. [`exists`](Self::exists) is `true` iff an actual value is
/// present; every mutation marks the value as existing.
#[derive(Clone, Debug, PartialEq)]
pub struct Value<E> {
    key: Key<E>,
    default: E,
    actual: Option<E>,
}

impl<E: ValueType> Value<E> {
    /// A value with only a default (does not exist yet).
    pub fn new(key: Key<E>, default: E) -> Self {
        Self {
            key,
            default,
            actual: None,
        }
    }

    pub fn with_actual(key: Key<E>, default: E, actual: E) -> Self {
        Self {
            key,
            default,
            actual: Some(actual),
        }
    }

    pub(crate) fn from_parts(key: Key<E>, default: E, actual: Option<E>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn key(&self) -> Key<E> {
        self.key
    }

    /// The actual value, or the default if none exists.
    pub fn get(&self) -> &E {
        self.actual.as_ref().unwrap_or(&self.default)
    }

    /// The actual value only.
    pub fn get_direct(&self) -> Option<&E> {
        self.actual.as_ref()
    }

    pub fn default_value(&self) -> &E {
        &self.default
    }

    pub fn exists(&self) -> bool {
        self.actual.is_some()
    }

    pub fn set(&mut self, value: E) -> &mut Self {
        self.actual = Some(value);
        self
    }

    /// Replace the current value (actual or default) with `f(current)`.
    pub fn transform<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(E) -> E,
    {
        let current = self.get().clone();
        self.actual = Some(f(current));
        self
    }

    /// Mutable access to the actual value, materializing it from the
    /// default first. The value exists afterwards.
    pub fn get_mut(&mut self) -> &mut E {
        let default = &self.default;
        self.actual.get_or_insert_with(|| default.clone())
    }

    pub fn as_immutable(&self) -> ImmutableValue<E> {
        ImmutableValue::from_parts(self.key, self.default.clone(), self.actual.clone())
    }

    pub fn to_any(&self) -> AnyValue {
        AnyValue::of(&self.key, &self.default, self.actual.as_ref())
    }
}

/// Copy-on-write value handle bound to exactly one [`Key`].
///
/// Every "mutation" returns a new instance; the receiver never changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableValue<E> {
    key: Key<E>,
    default: E,
    actual: Option<E>,
}

impl<E: ValueType> ImmutableValue<E> {
    pub fn new(key: Key<E>, default: E) -> Self {
        Self::from_parts(key, default, None)
    }

    pub fn with_actual(key: Key<E>, default: E, actual: E) -> Self {
        Self::from_parts(key, default, Some(actual))
    }

    pub(crate) fn from_parts(key: Key<E>, default: E, actual: Option<E>) -> Self {
        Self {
            key,
            default,
            actual,
        }
    }

    pub fn key(&self) -> Key<E> {
        self.key
    }

    pub fn get(&self) -> &E {
        self.actual.as_ref().unwrap_or(&self.default)
    }

    pub fn get_direct(&self) -> Option<&E> {
        self.actual.as_ref()
    }

    pub fn default_value(&self) -> &E {
        &self.default
    }

    pub fn exists(&self) -> bool {
        self.actual.is_some()
    }

    /// A new value holding `value` as its actual value.
    pub fn with(&self, value: E) -> Self {
        Self::from_parts(self.key, self.default.clone(), Some(value))
    }

    pub fn transform<F>(&self, f: F) -> Self
    where
        F: FnOnce(E) -> E,
    {
        self.with(f(self.get().clone()))
    }

    pub fn as_mutable(&self) -> Value<E> {
        Value::from_parts(self.key, self.default.clone(), self.actual.clone())
    }

    pub fn to_any(&self) -> AnyValue {
        AnyValue::of(&self.key, &self.default, self.actual.as_ref())
    }
}
