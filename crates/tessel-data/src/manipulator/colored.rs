use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::COLOR;
use crate::types::Color;

static KEYS: [KeyDescriptor; 1] = [COLOR.descriptor()];

/// RGB color of a dyeable holder.
#[derive(Clone, Debug)]
pub struct ColoredData {
    color: Value<Color>,
}

impl ColoredData {
    pub fn new(color: Color) -> Self {
        Self {
            color: Value::with_actual(COLOR, Color::WHITE, color),
        }
    }

    pub fn color(&self) -> Color {
        *self.color.get()
    }

    pub fn color_value(&self) -> &Value<Color> {
        &self.color
    }

    fn cmp_key(&self) -> Color {
        self.color()
    }
}

impl Default for ColoredData {
    fn default() -> Self {
        Self {
            color: Value::new(COLOR, Color::WHITE),
        }
    }
}

impl ValueContainer for ColoredData {
    const TRAIT: TraitType = TraitType::new("tessel:colored", "ColoredData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == COLOR.id()).then(|| self.color.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container.set(COLOR.path(), self.color().rgb());
        container
    }
}

impl DataManipulator for ColoredData {
    type Immutable = ImmutableColoredData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != COLOR.id() {
            return Ok(false);
        }
        self.color.set(decode(&COLOR, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let rgb: u32 = container.require(COLOR.path())?;
        Ok(Self::new(Color::from_rgb(rgb)))
    }
}

trait_pair!(ColoredData, ImmutableColoredData);
