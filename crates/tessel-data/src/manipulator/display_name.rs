use serde_json::Value as Json;
use tessel_types::{DataContainer, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::DataResult;
use crate::keys::{CUSTOM_NAME_VISIBLE, DISPLAY_NAME};

static KEYS: [KeyDescriptor; 2] = [DISPLAY_NAME.descriptor(), CUSTOM_NAME_VISIBLE.descriptor()];

/// Custom display name and whether it is rendered.
#[derive(Clone, Debug)]
pub struct DisplayNameData {
    name: Value<String>,
    visible: Value<bool>,
}

impl DisplayNameData {
    pub fn new(name: impl Into<String>, visible: bool) -> Self {
        Self {
            name: Value::with_actual(DISPLAY_NAME, String::new(), name.into()),
            visible: Value::with_actual(CUSTOM_NAME_VISIBLE, false, visible),
        }
    }

    pub fn name(&self) -> &str {
        self.name.get()
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.get()
    }

    fn cmp_key(&self) -> (&str, bool) {
        (self.name(), self.is_visible())
    }
}

impl Default for DisplayNameData {
    fn default() -> Self {
        Self {
            name: Value::new(DISPLAY_NAME, String::new()),
            visible: Value::new(CUSTOM_NAME_VISIBLE, false),
        }
    }
}

impl ValueContainer for DisplayNameData {
    const TRAIT: TraitType = TraitType::new("tessel:display_name", "DisplayNameData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        if key == DISPLAY_NAME.id() {
            Some(self.name.to_any())
        } else if key == CUSTOM_NAME_VISIBLE.id() {
            Some(self.visible.to_any())
        } else {
            None
        }
    }

    fn to_container(&self) -> DataContainer {
        let mut container = DataContainer::new();
        container
            .set(DISPLAY_NAME.path(), self.name())
            .set(CUSTOM_NAME_VISIBLE.path(), self.is_visible());
        container
    }
}

impl DataManipulator for DisplayNameData {
    type Immutable = ImmutableDisplayNameData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key == DISPLAY_NAME.id() {
            self.name.set(decode(&DISPLAY_NAME, value)?);
        } else if key == CUSTOM_NAME_VISIBLE.id() {
            self.visible.set(decode(&CUSTOM_NAME_VISIBLE, value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// `CustomNameVisible` is optional and defaults to hidden.
    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let name: String = container.require(DISPLAY_NAME.path())?;
        let visible = container
            .get_as::<bool, _>(CUSTOM_NAME_VISIBLE.path())?
            .unwrap_or(false);
        Ok(Self::new(name, visible))
    }
}

trait_pair!(DisplayNameData, ImmutableDisplayNameData);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_snapshot_lists_both() {
        let data = DisplayNameData::default();
        let ids: Vec<&str> = data.keys().iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["tessel:display_name", "tessel:custom_name_visible"]);
        assert_eq!(data.values().len(), 2);
    }

    #[test]
    fn container_roundtrip() {
        let data = DisplayNameData::new("Grumm", true);
        let back = DisplayNameData::from_container(&data.to_container()).unwrap();
        assert_eq!(back, data);
        assert!(back.is_visible());
    }

    #[test]
    fn visibility_is_optional_in_container() {
        let mut container = DataContainer::new();
        container.set("DisplayName", "Dinnerbone");
        let data = DisplayNameData::from_container(&container).unwrap();
        assert_eq!(data.name(), "Dinnerbone");
        assert!(!data.is_visible());
    }

    #[test]
    fn transform_name() {
        let mut data = DisplayNameData::new("steve", false);
        data.transform(&DISPLAY_NAME, |n| n.to_uppercase()).unwrap();
        assert_eq!(data.name(), "STEVE");
    }
}
