use std::fmt::Debug;

use tessel_types::{Key, ValueType};

use crate::any::AnyValue;
use crate::error::{ValueError, ValueResult};
use crate::value::{ImmutableValue, Value};

/// A [`Value`] constrained to an inclusive `[min, max]` range.
///
/// Out-of-range writes are refused and leave the value untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedValue<E> {
    inner: Value<E>,
    min: E,
    max: E,
}

impl<E: ValueType + PartialOrd> BoundedValue<E> {
    /// A bounded value with no actual value. A default outside the range is
    /// clamped into it.
    pub fn new(key: Key<E>, default: E, min: E, max: E) -> Self {
        let default = clamp(default, &min, &max);
        Self {
            inner: Value::new(key, default),
            min,
            max,
        }
    }

    /// A bounded value holding `actual`, which must be within range.
    pub fn with_actual(key: Key<E>, default: E, min: E, max: E, actual: E) -> ValueResult<Self> {
        let mut value = Self::new(key, default, min, max);
        value.set(actual)?;
        Ok(value)
    }

    pub fn key(&self) -> Key<E> {
        self.inner.key()
    }

    pub fn min(&self) -> &E {
        &self.min
    }

    pub fn max(&self) -> &E {
        &self.max
    }

    pub fn get(&self) -> &E {
        self.inner.get()
    }

    pub fn get_direct(&self) -> Option<&E> {
        self.inner.get_direct()
    }

    pub fn default_value(&self) -> &E {
        self.inner.default_value()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn contains(&self, value: &E) -> bool {
        *value >= self.min && *value <= self.max
    }

    pub fn set(&mut self, value: E) -> ValueResult<&mut Self> {
        check(self.key(), &value, &self.min, &self.max)?;
        self.inner.set(value);
        Ok(self)
    }

    pub fn transform<F>(&mut self, f: F) -> ValueResult<&mut Self>
    where
        F: FnOnce(E) -> E,
    {
        let next = f(self.get().clone());
        self.set(next)
    }

    /// The unconstrained view of this value.
    pub fn as_value(&self) -> &Value<E> {
        &self.inner
    }

    pub fn as_immutable(&self) -> ImmutableBoundedValue<E> {
        ImmutableBoundedValue {
            inner: self.inner.as_immutable(),
            min: self.min.clone(),
            max: self.max.clone(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

/// Immutable counterpart of [`BoundedValue`].
#[derive(Clone, Debug, PartialEq)]
pub struct ImmutableBoundedValue<E> {
    inner: ImmutableValue<E>,
    min: E,
    max: E,
}

impl<E: ValueType + PartialOrd> ImmutableBoundedValue<E> {
    pub fn new(key: Key<E>, default: E, min: E, max: E) -> Self {
        BoundedValue::new(key, default, min, max).as_immutable()
    }

    pub fn key(&self) -> Key<E> {
        self.inner.key()
    }

    pub fn min(&self) -> &E {
        &self.min
    }

    pub fn max(&self) -> &E {
        &self.max
    }

    pub fn get(&self) -> &E {
        self.inner.get()
    }

    pub fn get_direct(&self) -> Option<&E> {
        self.inner.get_direct()
    }

    pub fn default_value(&self) -> &E {
        self.inner.default_value()
    }

    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    pub fn with(&self, value: E) -> ValueResult<Self> {
        check(self.key(), &value, &self.min, &self.max)?;
        Ok(Self {
            inner: self.inner.with(value),
            min: self.min.clone(),
            max: self.max.clone(),
        })
    }

    pub fn as_value(&self) -> &ImmutableValue<E> {
        &self.inner
    }

    pub fn as_mutable(&self) -> BoundedValue<E> {
        BoundedValue {
            inner: self.inner.as_mutable(),
            min: self.min.clone(),
            max: self.max.clone(),
        }
    }

    pub fn to_any(&self) -> AnyValue {
        self.inner.to_any()
    }
}

fn check<E: PartialOrd + Debug>(key: Key<E>, value: &E, min: &E, max: &E) -> ValueResult<()> {
    if value < min || value > max {
        return Err(ValueError::OutOfBounds {
            key: key.id(),
            value: format!("{value:?}"),
            min: format!("{min:?}"),
            max: format!("{max:?}"),
        });
    }
    Ok(())
}

fn clamp<E: PartialOrd>(value: E, min: &E, max: &E) -> E
where
    E: Clone,
{
    if value < *min {
        min.clone()
    } else if value > *max {
        max.clone()
    } else {
        value
    }
}
