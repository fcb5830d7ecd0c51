use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value, ValueError, ValueResult};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::SIGN_LINES;

static KEYS: [KeyDescriptor; 1] = [SIGN_LINES.descriptor()];

/// The four text lines of a sign.
#[derive(Clone, Debug)]
pub struct SignData {
    lines: Value<[String; 4]>,
}

impl SignData {
    pub fn new(lines: [String; 4]) -> Self {
        Self {
            lines: Value::with_actual(SIGN_LINES, Default::default(), lines),
        }
    }

    pub fn lines(&self) -> &[String; 4] {
        self.lines.get()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get().get(index).map(String::as_str)
    }

    pub fn set_line(&mut self, index: usize, text: impl Into<String>) -> ValueResult<&mut Self> {
        if index >= 4 {
            return Err(ValueError::IndexOutOfRange {
                key: SIGN_LINES.id(),
                index,
                len: 4,
            });
        }
        self.lines.get_mut()[index] = text.into();
        Ok(self)
    }

    /// Blank every line.
    pub fn reset(&mut self) -> &mut Self {
        self.lines.set(Default::default());
        self
    }

    fn cmp_key(&self) -> &[String; 4] {
        self.lines()
    }
}

impl Default for SignData {
    fn default() -> Self {
        Self {
            lines: Value::new(SIGN_LINES, Default::default()),
        }
    }
}

impl ValueContainer for SignData {
    const TRAIT: TraitType = TraitType::new("tessel:sign", "SignData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == SIGN_LINES.id()).then(|| self.lines.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container.set(SIGN_LINES.path(), self.lines().to_vec());
        container
    }
}

impl DataManipulator for SignData {
    type Immutable = ImmutableSignData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != SIGN_LINES.id() {
            return Ok(false);
        }
        self.lines.set(decode(&SIGN_LINES, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        Ok(Self::new(container.require(SIGN_LINES.path())?))
    }
}

trait_pair!(SignData, ImmutableSignData);
