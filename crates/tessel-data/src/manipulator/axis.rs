use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::AXIS;
use crate::types::Axis;

static KEYS: [KeyDescriptor; 1] = [AXIS.descriptor()];

/// Orientation axis of a block such as a log.
#[derive(Clone, Debug)]
pub struct AxisData {
    axis: Value<Axis>,
}

impl AxisData {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis: Value::with_actual(AXIS, Axis::default(), axis),
        }
    }

    pub fn axis(&self) -> Axis {
        *self.axis.get()
    }

    fn cmp_key(&self) -> Axis {
        self.axis()
    }
}

impl Default for AxisData {
    fn default() -> Self {
        Self {
            axis: Value::new(AXIS, Axis::default()),
        }
    }
}

impl ValueContainer for AxisData {
    const TRAIT: TraitType = TraitType::new("tessel:axis", "AxisData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == AXIS.id()).then(|| self.axis.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container.set(AXIS.path(), self.axis().as_str());
        container
    }
}

impl DataManipulator for AxisData {
    type Immutable = ImmutableAxisData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != AXIS.id() {
            return Ok(false);
        }
        self.axis.set(decode(&AXIS, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        Ok(Self::new(container.require(AXIS.path())?))
    }
}

trait_pair!(AxisData, ImmutableAxisData);
