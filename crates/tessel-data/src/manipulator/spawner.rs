use serde_json::{json, Value as Json};
use tessel_types::{DataContainer, Key, KeyDescriptor, KeyId};
use tessel_value::{AnyValue, CollectionValue, ListValue, Value};

use super::macros::trait_pair;
use super::traits::{decode, DataManipulator, TraitType, ValueContainer};
use crate::error::{DataError, DataResult};
use crate::keys::{
    SPAWNER_ENTITIES, SPAWNER_MAXIMUM_DELAY, SPAWNER_MAXIMUM_NEARBY_ENTITIES,
    SPAWNER_MINIMUM_DELAY, SPAWNER_REMAINING_DELAY, SPAWNER_REQUIRED_PLAYER_RANGE,
    SPAWNER_SPAWN_COUNT, SPAWNER_SPAWN_RANGE,
};
use crate::types::WeightedEntity;

static KEYS: [KeyDescriptor; 8] = [
    SPAWNER_REMAINING_DELAY.descriptor(),
    SPAWNER_MINIMUM_DELAY.descriptor(),
    SPAWNER_MAXIMUM_DELAY.descriptor(),
    SPAWNER_SPAWN_COUNT.descriptor(),
    SPAWNER_MAXIMUM_NEARBY_ENTITIES.descriptor(),
    SPAWNER_REQUIRED_PLAYER_RANGE.descriptor(),
    SPAWNER_SPAWN_RANGE.descriptor(),
    SPAWNER_ENTITIES.descriptor(),
];

/// Configuration of a mob spawner.
///
/// The remaining delay always lies within `[minimum, maximum]`:
/// - a delay outside the range is clamped to the nearest end;
/// - a minimum above the maximum is clamped down to it, and a maximum
///   below the minimum is clamped up to it.
///
/// Negative delays or counts, and ranges below one, are invalid data.
#[derive(Clone, Debug)]
pub struct MobSpawnerData {
    delay: Value<i16>,
    min_delay: Value<i16>,
    max_delay: Value<i16>,
    count: Value<i16>,
    max_nearby: Value<i16>,
    player_range: Value<i16>,
    spawn_range: Value<i16>,
    entities: ListValue<WeightedEntity>,
}

impl MobSpawnerData {
    pub fn remaining_delay(&self) -> i16 {
        *self.delay.get()
    }

    pub fn minimum_delay(&self) -> i16 {
        *self.min_delay.get()
    }

    pub fn maximum_delay(&self) -> i16 {
        *self.max_delay.get()
    }

    pub fn spawn_count(&self) -> i16 {
        *self.count.get()
    }

    pub fn maximum_nearby_entities(&self) -> i16 {
        *self.max_nearby.get()
    }

    pub fn required_player_range(&self) -> i16 {
        *self.player_range.get()
    }

    pub fn spawn_range(&self) -> i16 {
        *self.spawn_range.get()
    }

    /// Independent copy of the weighted spawn candidates.
    pub fn entities(&self) -> Vec<WeightedEntity> {
        self.entities.get_all()
    }

    pub fn add_entity(&mut self, entity: WeightedEntity) -> &mut Self {
        self.entities.add(entity);
        self
    }

    pub fn set_remaining_delay(&mut self, delay: i16) -> DataResult<&mut Self> {
        non_negative(&SPAWNER_REMAINING_DELAY, delay)?;
        let clamped = delay.clamp(self.minimum_delay(), self.maximum_delay());
        self.delay.set(clamped);
        Ok(self)
    }

    pub fn set_minimum_delay(&mut self, delay: i16) -> DataResult<&mut Self> {
        non_negative(&SPAWNER_MINIMUM_DELAY, delay)?;
        self.min_delay.set(delay.min(self.maximum_delay()));
        self.reclamp_delay();
        Ok(self)
    }

    pub fn set_maximum_delay(&mut self, delay: i16) -> DataResult<&mut Self> {
        non_negative(&SPAWNER_MAXIMUM_DELAY, delay)?;
        self.max_delay.set(delay.max(self.minimum_delay()));
        self.reclamp_delay();
        Ok(self)
    }

    pub fn set_spawn_count(&mut self, count: i16) -> DataResult<&mut Self> {
        non_negative(&SPAWNER_SPAWN_COUNT, count)?;
        self.count.set(count);
        Ok(self)
    }

    pub fn set_maximum_nearby_entities(&mut self, count: i16) -> DataResult<&mut Self> {
        at_least(&SPAWNER_MAXIMUM_NEARBY_ENTITIES, count, 1)?;
        self.max_nearby.set(count);
        Ok(self)
    }

    pub fn set_required_player_range(&mut self, range: i16) -> DataResult<&mut Self> {
        at_least(&SPAWNER_REQUIRED_PLAYER_RANGE, range, 1)?;
        self.player_range.set(range);
        Ok(self)
    }

    pub fn set_spawn_range(&mut self, range: i16) -> DataResult<&mut Self> {
        at_least(&SPAWNER_SPAWN_RANGE, range, 1)?;
        self.spawn_range.set(range);
        Ok(self)
    }

    fn reclamp_delay(&mut self) {
        if let Some(&delay) = self.delay.get_direct() {
            self.delay
                .set(delay.clamp(self.minimum_delay(), self.maximum_delay()));
        }
    }

    #[allow(clippy::type_complexity)]
    fn cmp_key(&self) -> ((i16, i16, i16, i16, i16, i16, i16), &[WeightedEntity]) {
        (
            (
                self.remaining_delay(),
                self.minimum_delay(),
                self.maximum_delay(),
                self.spawn_count(),
                self.required_player_range(),
                self.spawn_range(),
                self.maximum_nearby_entities(),
            ),
            self.entities.get(),
        )
    }
}

fn non_negative(key: &Key<i16>, value: i16) -> DataResult<()> {
    at_least(key, value, 0)
}

fn at_least(key: &Key<i16>, value: i16, min: i16) -> DataResult<()> {
    if value < min {
        return Err(DataError::invalid(
            key.id(),
            format!("{value} is below the minimum of {min}"),
        ));
    }
    Ok(())
}

impl Default for MobSpawnerData {
    fn default() -> Self {
        Self {
            delay: Value::new(SPAWNER_REMAINING_DELAY, 200),
            min_delay: Value::new(SPAWNER_MINIMUM_DELAY, 200),
            max_delay: Value::new(SPAWNER_MAXIMUM_DELAY, 800),
            count: Value::new(SPAWNER_SPAWN_COUNT, 4),
            max_nearby: Value::new(SPAWNER_MAXIMUM_NEARBY_ENTITIES, 6),
            player_range: Value::new(SPAWNER_REQUIRED_PLAYER_RANGE, 16),
            spawn_range: Value::new(SPAWNER_SPAWN_RANGE, 4),
            entities: ListValue::new(SPAWNER_ENTITIES),
        }
    }
}

impl ValueContainer for MobSpawnerData {
    const TRAIT: TraitType = TraitType::new("tessel:mob_spawner", "MobSpawnerData");

    fn declared_keys() -> &'static [KeyDescriptor] {
        &KEYS
    }

    fn value_of(&self, key: KeyId) -> Option<AnyValue> {
        let value = if key == SPAWNER_REMAINING_DELAY.id() {
            &self.delay
        } else if key == SPAWNER_MINIMUM_DELAY.id() {
            &self.min_delay
        } else if key == SPAWNER_MAXIMUM_DELAY.id() {
            &self.max_delay
        } else if key == SPAWNER_SPAWN_COUNT.id() {
            &self.count
        } else if key == SPAWNER_MAXIMUM_NEARBY_ENTITIES.id() {
            &self.max_nearby
        } else if key == SPAWNER_REQUIRED_PLAYER_RANGE.id() {
            &self.player_range
        } else if key == SPAWNER_SPAWN_RANGE.id() {
            &self.spawn_range
        } else if key == SPAWNER_ENTITIES.id() {
            return Some(self.entities.to_any());
        } else {
            return None;
        };
        Some(value.to_any())
    }

    fn to_container(&self) -> DataContainer {
        let entities: Vec<Json> = self
            .entities
            .get()
            .iter()
            .map(|e| json!({"Type": e.entity_type, "Weight": e.weight}))
            .collect();
        let mut container = DataContainer::new();
        container
            .set(SPAWNER_REMAINING_DELAY.path(), self.remaining_delay())
            .set(SPAWNER_MINIMUM_DELAY.path(), self.minimum_delay())
            .set(SPAWNER_MAXIMUM_DELAY.path(), self.maximum_delay())
            .set(SPAWNER_SPAWN_COUNT.path(), self.spawn_count())
            .set(SPAWNER_MAXIMUM_NEARBY_ENTITIES.path(), self.maximum_nearby_entities())
            .set(SPAWNER_REQUIRED_PLAYER_RANGE.path(), self.required_player_range())
            .set(SPAWNER_SPAWN_RANGE.path(), self.spawn_range())
            .set(SPAWNER_ENTITIES.path(), Json::Array(entities));
        container
    }
}

impl DataManipulator for MobSpawnerData {
    type Immutable = ImmutableMobSpawnerData;

    fn set_raw(&mut self, key: KeyId, value: Json) -> DataResult<bool> {
        if key == SPAWNER_ENTITIES.id() {
            self.entities.set(decode(&SPAWNER_ENTITIES, value)?);
            return Ok(true);
        }
        let setter: fn(&mut Self, i16) -> DataResult<&mut Self> = if key == SPAWNER_REMAINING_DELAY.id() {
            Self::set_remaining_delay
        } else if key == SPAWNER_MINIMUM_DELAY.id() {
            Self::set_minimum_delay
        } else if key == SPAWNER_MAXIMUM_DELAY.id() {
            Self::set_maximum_delay
        } else if key == SPAWNER_SPAWN_COUNT.id() {
            Self::set_spawn_count
        } else if key == SPAWNER_MAXIMUM_NEARBY_ENTITIES.id() {
            Self::set_maximum_nearby_entities
        } else if key == SPAWNER_REQUIRED_PLAYER_RANGE.id() {
            Self::set_required_player_range
        } else if key == SPAWNER_SPAWN_RANGE.id() {
            Self::set_spawn_range
        } else {
            return Ok(false);
        };
        let number: i16 = serde_json::from_value(value)
            .map_err(|e| DataError::invalid(key, e.to_string()))?;
        setter(self, number)?;
        Ok(true)
    }

    /// Bounds are applied before the remaining delay so the delay is
    /// clamped against the persisted range.
    fn from_container(container: &DataContainer) -> DataResult<Self> {
        let mut data = Self::default();
        let min: i16 = container.require(SPAWNER_MINIMUM_DELAY.path())?;
        let max: i16 = container.require(SPAWNER_MAXIMUM_DELAY.path())?;
        non_negative(&SPAWNER_MINIMUM_DELAY, min)?;
        non_negative(&SPAWNER_MAXIMUM_DELAY, max)?;
        data.min_delay.set(min.min(max));
        data.max_delay.set(max);
        data.set_remaining_delay(container.require(SPAWNER_REMAINING_DELAY.path())?)?
            .set_spawn_count(container.require(SPAWNER_SPAWN_COUNT.path())?)?
            .set_maximum_nearby_entities(container.require(SPAWNER_MAXIMUM_NEARBY_ENTITIES.path())?)?
            .set_required_player_range(container.require(SPAWNER_REQUIRED_PLAYER_RANGE.path())?)?
            .set_spawn_range(container.require(SPAWNER_SPAWN_RANGE.path())?)?;
        let entities: Vec<WeightedEntity> = container.require(SPAWNER_ENTITIES.path())?;
        data.entities.set(entities);
        Ok(data)
    }
}

trait_pair!(MobSpawnerData, ImmutableMobSpawnerData);
