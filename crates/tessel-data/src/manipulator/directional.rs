use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::DIRECTION;
use crate::types::Direction;

static KEYS: [KeyDescriptor; 1] = [DIRECTION.descriptor()];

/// Facing of a directional block.
#[derive(Clone, Debug)]
pub struct DirectionalData {
    direction: Value<Direction>,
}

impl DirectionalData {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction: Value::with_actual(DIRECTION, Direction::default(), direction),
        }
    }

    pub fn direction(&self) -> Direction {
        *self.direction.get()
    }

    fn cmp_key(&self) -> Direction {
        self.direction()
    }
}

impl Default for DirectionalData {
    fn default() -> Self {
        Self {
            direction: Value::new(DIRECTION, Direction::default()),
        }
    }
}

impl ValueContainer for DirectionalData {
    const TRAIT: TraitType = TraitType::new("tessel:directional", "DirectionalData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == DIRECTION.id()).then(|| self.direction.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container.set(DIRECTION.path(), self.direction().as_str());
        container
    }
}

impl DataManipulator for DirectionalData {
    type Immutable = ImmutableDirectionalData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != DIRECTION.id() {
            return Ok(false);
        }
        self.direction.set(decode(&DIRECTION, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        Ok(Self::new(container.require(DIRECTION.path())?))
    }
}

trait_pair!(DirectionalData, ImmutableDirectionalData);
