use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, CollectionValue, ListValue, ValueResult};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::ITEM_LORE;

static KEYS: [KeyDescriptor; 1] = [ITEM_LORE.descriptor()];

/// Lines of descriptive text shown under an item's name.
#[derive(Clone, Debug)]
pub struct LoreData {
    lore: ListValue<String>,
}

impl LoreData {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lore: ListValue::with_elements(ITEM_LORE, lines.into_iter().map(Into::into)),
        }
    }

    /// Independent copy of the lines.
    pub fn lines(&self) -> Vec<String> {
        self.lore.get_all()
    }

    pub fn len(&self) -> usize {
        self.lore.size()
    }

    pub fn is_empty(&self) -> bool {
        self.lore.is_empty()
    }

    pub fn add(&mut self, line: impl Into<String>) -> &mut Self {
        self.lore.add(line.into());
        self
    }

    pub fn insert(&mut self, index: usize, line: impl Into<String>) -> ValueResult<&mut Self> {
        self.lore.insert(index, line.into())?;
        Ok(self)
    }

    pub fn remove(&mut self, index: usize) -> ValueResult<String> {
        self.lore.remove_at(index)
    }

    fn cmp_key(&self) -> &[String] {
        self.lore.get()
    }
}

impl Default for LoreData {
    fn default() -> Self {
        Self {
            lore: ListValue::new(ITEM_LORE),
        }
    }
}

impl ValueContainer for LoreData {
    const TRAIT: TraitType = TraitType::new("tessel:lore", "LoreData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        (key == ITEM_LORE.id()).then(|| self.lore.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container.set(ITEM_LORE.path(), self.lines());
        container
    }
}

impl DataManipulator for LoreData {
    type Immutable = ImmutableLoreData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key != ITEM_LORE.id() {
            return Ok(false);
        }
        self.lore.set(decode(&ITEM_LORE, value)?);
        Ok(true)
    }

    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let lines: Vec<String> = container.require(ITEM_LORE.path())?;
        Ok(Self::new(lines))
    }
}

trait_pair!(LoreData, ImmutableLoreData);
