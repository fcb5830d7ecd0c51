use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, BoundedValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::{DataError, DataResult};
use crate::keys::{MAX_AIR, REMAINING_AIR};

/// Air supply of a freshly spawned breathing entity.
pub const DEFAULT_MAX_AIR: i32 = 300;

static KEYS: [KeyDescriptor; 2] = [REMAINING_AIR.descriptor(), MAX_AIR.descriptor()];

/// Air supply of a breathing entity. Remaining air is bounded by
/// `[0, max_air]`; lowering the maximum clamps the remaining air.
#[derive(Clone, Debug)]
pub struct BreathingData {
    remaining: BoundedValue<i32>,
    max: Value<i32>,
}

impl BreathingData {
    pub fn new(remaining: i32, max: i32) -> DataResult<Self> {
        let mut data = Self::default();
        data.set_max(max)?;
        data.remaining.set(remaining)?;
        Ok(data)
    }

    pub fn remaining_air(&self) -> i32 {
        *self.remaining.get()
    }

    pub fn max_air(&self) -> i32 {
        *self.max.get()
    }

    fn set_max(&mut self, max: i32) -> DataResult<()> {
        if max < 0 {
            return Err(DataError::invalid(MAX_AIR.id(), format!("max air {max} is negative")));
        }
        let mut remaining = BoundedValue::new(REMAINING_AIR, max, 0, max);
        if let Some(current) = self.remaining.get_direct() {
            remaining.set((*current).min(max))?;
        }
        self.remaining = remaining;
        self.max.set(max);
        Ok(())
    }

    fn cmp_key(&self) -> (i32, i32) {
        (self.remaining_air(), self.max_air())
    }
}

impl Default for BreathingData {
    fn default() -> Self {
        Self {
            remaining: BoundedValue::new(REMAINING_AIR, DEFAULT_MAX_AIR, 0, DEFAULT_MAX_AIR),
            max: Value::new(MAX_AIR, DEFAULT_MAX_AIR),
        }
    }
}

impl ValueContainer for BreathingData {
    const TRAIT: TraitType = TraitType::new("tessel:breathing", "BreathingData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        if key == REMAINING_AIR.id() {
            Some(self.remaining.to_any())
        } else if key == MAX_AIR.id() {
            Some(self.max.to_any())
        } else {
            None
        }
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container
            .set(REMAINING_AIR.path(), self.remaining_air())
            .set(MAX_AIR.path(), self.max_air());
        container
    }
}

impl DataManipulator for BreathingData {
    type Immutable = ImmutableBreathingData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key == REMAINING_AIR.id() {
            self.remaining.set(decode(&REMAINING_AIR, value)?)?;
        } else if key == MAX_AIR.id() {
            self.set_max(decode(&MAX_AIR, value)?)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// `MaxAir` is optional and defaults to [`DEFAULT_MAX_AIR`].
    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let remaining: i32 = container.require(REMAINING_AIR.path())?;
        let max = container
            .get_as::<i32, _>(MAX_AIR.path())?
            .unwrap_or(DEFAULT_MAX_AIR);
        Self::new(remaining, max)
    }
}

trait_pair!(BreathingData, ImmutableBreathingData);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manipulator::ImmutableDataManipulator;
    use tessel_value::ValueError;

    #[test]
    fn remaining_air_is_bounded() {
        let mut data = BreathingData::default();
        data.set(&REMAINING_AIR, 120).unwrap();
        assert_eq!(data.remaining_air(), 120);
        let err = data.set(&REMAINING_AIR, 301).unwrap_err();
        assert!(matches!(err, DataError::Value(ValueError::OutOfBounds { .. })));
        assert_eq!(data.remaining_air(), 120);
    }

    #[test]
    fn lowering_max_clamps_remaining() {
        let mut data = BreathingData::new(250, 300).unwrap();
        data.set(&MAX_AIR, 100).unwrap();
        assert_eq!(data.remaining_air(), 100);
        assert!(data.set(&MAX_AIR, -1).is_err());
        assert_eq!(data.max_air(), 100);
    }

    #[test]
    fn immutable_with_out_of_bounds_is_none() {
        let frozen = BreathingData::default().as_immutable();
        assert!(frozen.with(&REMAINING_AIR, 1000).is_none());
        assert_eq!(frozen.with(&REMAINING_AIR, 5).unwrap().get(&REMAINING_AIR), Some(5));
    }

    #[test]
    fn container_roundtrip() {
        let data = BreathingData::new(42, 200).unwrap();
        assert_eq!(BreathingData::from_container(&data.to_container()).unwrap(), data);
    }

    #[test]
    fn build_defaults_max_air() {
        let mut container = DataContainer::new();
        container.set("RemainingAir", 10);
        let data = BreathingData::from_container(&container).unwrap();
        assert_eq!(data.max_air(), DEFAULT_MAX_AIR);
        container.set("RemainingAir", 400);
        assert!(BreathingData::from_container(&container).is_err());
    }
}
