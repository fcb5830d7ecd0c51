use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, BoundedValue};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::{DataError, DataResult};
use crate::keys::GROWTH_STAGE;

static KEYS: [KeyDescriptor; 1] = [GROWTH_STAGE.descriptor()];

const MAX_GROWTH_PATH: &str = "MaxGrowth";

/// Growth stage of a crop. The maximum comes from the block type.
#[derive(Clone, Debug)]
pub struct GrowthData {
    growth: BoundedValue<i32>,
}

impl GrowthData {
    pub fn new(growth: i32, max: i32) -> DataResult<Self> {
        let mut data = Self::with_max(max)?;
        data.growth.set(growth)?;
        Ok(data)
    }

    /// An unset growth stage ranging over `[0, max]`.
    pub fn with_max(max: i32) -> DataResult<Self> {
        if max < 0 {
            return Err(DataError::invalid(
                GROWTH_STAGE.id(),
                format!("maximum growth {max} is negative"),
            ));
        }
        Ok(Self {
            growth: BoundedValue::new(GROWTH_STAGE, 0, 0, max),
        })
    }

    pub fn growth(&self) -> i32 {
        *self.growth.get()
    }

    pub fn max_growth(&self) -> i32 {
        *self.growth.max()
    }

    pub fn is_fully_grown(&self) -> bool {
        self.growth() == self.max_growth()
    }

    fn cmp_key(&self) -> (i32, i32) {
        (self.growth(), self.max_growth())
    }
}

impl Default for GrowthData {
    fn default() -> Self {
        Self {
            growth: BoundedValue::new(GROWTH_STAGE, 0, 0, 7),
        }
    }
}

impl ValueContainer for GrowthData {
    const TRAIT: TraitType = TraitType::new("tessel:growth", "GrowthData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == GROWTH_STAGE.id()).then(|| self.growth.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container
            .set(GROWTH_STAGE.path(), self.growth())
            .set(MAX_GROWTH_PATH, self.max_growth());
        container
    }
}

impl DataManipulator for GrowthData {
    type Immutable = ImmutableGrowthData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != GROWTH_STAGE.id() {
            return Ok(false);
        }
        self.growth.set(decode(&GROWTH_STAGE, value)?)?;
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let growth: i32 = container.require(GROWTH_STAGE.path())?;
        let max: i32 = container.require(MAX_GROWTH_PATH)?;
        Self::new(growth, max)
    }
}

trait_pair!(GrowthData, ImmutableGrowthData);
