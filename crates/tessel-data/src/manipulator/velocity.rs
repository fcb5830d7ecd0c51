use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::VELOCITY;
use crate::types::Vector3d;

static KEYS: [KeyDescriptor; 1] = [VELOCITY.descriptor()];

/// Current motion of a moving entity, in blocks per tick.
#[derive(Clone, Debug)]
pub struct VelocityData {
    velocity: Value<Vector3d>,
}

impl VelocityData {
    pub fn new(velocity: Vector3d) -> Self {
        Self {
            velocity: Value::with_actual(VELOCITY, Vector3d::ZERO, velocity),
        }
    }

    pub fn velocity(&self) -> Vector3d {
        *self.velocity.get()
    }

    fn cmp_key(&self) -> Vector3d {
        self.velocity()
    }
}

impl Default for VelocityData {
    fn default() -> Self {
        Self {
            velocity: Value::new(VELOCITY, Vector3d::ZERO),
        }
    }
}

impl ValueContainer for VelocityData {
    const TRAIT: TraitType = TraitType::new("tessel:velocity", "VelocityData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == VELOCITY.id()).then(|| self.velocity.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let v = self.velocity();
        let base = VELOCITY.query();
        let mut container = DataContainer::new();
        container
            .set(&base.then("X"), v.x)
            .set(&base.then("Y"), v.y)
            .set(&base.then("Z"), v.z);
        container
    }
}

impl DataManipulator for VelocityData {
    type Immutable = ImmutableVelocityData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != VELOCITY.id() {
            return Ok(false);
        }
        self.velocity.set(decode(&VELOCITY, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let base = VELOCITY.query();
        let x = container.require(&base.then("X"))?;
        let y = container.require(&base.then("Y"))?;
        let z = container.require(&base.then("Z"))?;
        Ok(Self::new(Vector3d::new(x, y, z)))
    }
}

trait_pair!(VelocityData, ImmutableVelocityData);
