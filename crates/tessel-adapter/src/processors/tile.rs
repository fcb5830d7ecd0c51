//! Processors over tile entities persisted under native field names.

use tessel_data::keys::{
    SPAWNER_ENTITIES, SPAWNER_MAXIMUM_DELAY, SPAWNER_MAXIMUM_NEARBY_ENTITIES,
    SPAWNER_MINIMUM_DELAY, SPAWNER_REMAINING_DELAY, SPAWNER_REQUIRED_PLAYER_RANGE,
    SPAWNER_SPAWN_COUNT, SPAWNER_SPAWN_RANGE,
};
use tessel_data::{DataManipulator, MobSpawnerData, SignData, ValueContainer};
use tessel_holder::tile::{SIGN_LINE_FIELDS, SPAWN_POTENTIALS};
use tessel_holder::{Capability, DataHolder, Tag, TagCompound};
use tessel_processor::{ProcessorError, ProcessorResult, TraitProcessor};
use tessel_types::{DataContainer, Key};

use super::required;

/// Sign lines from `Text1` .. `Text4`.
pub struct SignProcessor;

impl TraitProcessor for SignProcessor {
    type Data = SignData;

    fn name(&self) -> &'static str {
        "tessel:sign"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        holder.has(Capability::Sign)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<SignData>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let mut lines: [String; 4] = Default::default();
        for (line, field) in lines.iter_mut().zip(SIGN_LINE_FIELDS) {
            let tag = required(self.name(), holder, field)?;
            *line = tag
                .as_str()
                .ok_or_else(|| ProcessorError::internal(self.name(), format!("{field} is not a string")))?
                .to_string();
        }
        Ok(Some(SignData::new(lines)))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &SignData) -> ProcessorResult<()> {
        for (line, field) in data.lines().iter().zip(SIGN_LINE_FIELDS) {
            holder.set_field(field, Tag::from(line.as_str()))?;
        }
        Ok(())
    }

    /// A sign always has four lines; clear them with `SignData::reset`.
    fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }
}

/// Spawner numbers and their native field names.
const SPAWNER_FIELDS: [(Key<i16>, &str); 7] = [
    (SPAWNER_REMAINING_DELAY, "Delay"),
    (SPAWNER_MINIMUM_DELAY, "MinSpawnDelay"),
    (SPAWNER_MAXIMUM_DELAY, "MaxSpawnDelay"),
    (SPAWNER_SPAWN_COUNT, "SpawnCount"),
    (SPAWNER_MAXIMUM_NEARBY_ENTITIES, "MaxNearbyEntities"),
    (SPAWNER_REQUIRED_PLAYER_RANGE, "RequiredPlayerRange"),
    (SPAWNER_SPAWN_RANGE, "SpawnRange"),
];

/// Mob spawner configuration.
///
/// Native fields are read through the trait's serialized form, so the
/// trait's own validation applies: the remaining delay is clamped into
/// `[min, max]` on read, and a native layout the trait cannot represent is
/// reported as invalid data.
pub struct MobSpawnerProcessor;

impl TraitProcessor for MobSpawnerProcessor {
    type Data = MobSpawnerData;

    fn name(&self) -> &'static str {
        "tessel:mob_spawner"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        holder.has(Capability::MobSpawner)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<MobSpawnerData>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let mut container = DataContainer::new();
        for (key, field) in SPAWNER_FIELDS {
            let value = required(self.name(), holder, field)?
                .as_i16()
                .ok_or_else(|| ProcessorError::internal(self.name(), format!("{field} is not a short")))?;
            container.set(key.path(), value);
        }
        let potentials = required(self.name(), holder, SPAWN_POTENTIALS)?;
        container.set(SPAWNER_ENTITIES.path(), potentials.to_json());
        Ok(Some(MobSpawnerData::from_container(&container)?))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &MobSpawnerData) -> ProcessorResult<()> {
        for (key, field) in SPAWNER_FIELDS {
            let value = data
                .get(&key)
                .ok_or_else(|| ProcessorError::internal(self.name(), format!("no value for {}", key.id())))?;
            holder.set_field(field, Tag::Short(value))?;
        }
        let potentials = data
            .entities()
            .into_iter()
            .map(|entity| {
                let mut compound = TagCompound::new();
                compound.insert("Type", entity.entity_type);
                compound.insert("Weight", entity.weight);
                Tag::Compound(compound)
            })
            .collect();
        holder.set_field(SPAWN_POTENTIALS, Tag::List(potentials))?;
        Ok(())
    }

    fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }
}
