use tessel_data::{DataManipulator, ValueContainer};
use tessel_holder::DataHolder;
use tessel_processor::{ProcessorError, ProcessorResult, TraitProcessor, ValueProcessor};
use tessel_types::{Key, ValueType};

/// Single-value fast path for one key of a trait, backed by that trait's
/// processor.
///
/// Reads pull the holder's trait and pick the key out of it; writes read
/// the trait (or start from its default), set the key through the trait so
/// its bounds apply, and write the whole trait back. A value the trait
/// would store in adjusted form (a clamped spawner delay) is rejected.
pub struct TraitValue<P: TraitProcessor, E: ValueType> {
    name: &'static str,
    key: Key<E>,
    default: E,
    removable: bool,
    processor: P,
}

impl<P: TraitProcessor, E: ValueType> TraitValue<P, E> {
    /// `None` when the trait does not declare `key`.
    pub fn new(name: &'static str, key: Key<E>, processor: P) -> Option<Self> {
        let default = processor.create().get(&key)?;
        Some(Self {
            name,
            key,
            default,
            removable: false,
            processor,
        })
    }

    /// Clearing the value removes the whole trait from the holder.
    pub fn removable(mut self) -> Self {
        self.removable = true;
        self
    }
}

impl<P: TraitProcessor, E: ValueType> ValueProcessor for TraitValue<P, E> {
    type Element = E;

    fn name(&self) -> &'static str {
        self.name
    }

    fn key(&self) -> Key<E> {
        self.key
    }

    fn default_value(&self) -> E {
        self.default.clone()
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        self.processor.supports(holder)
    }

    fn get_value(&self, holder: &dyn DataHolder) -> Option<E> {
        match self.processor.read(holder) {
            Ok(data) => data?.get(&self.key),
            Err(e) => {
                tracing::warn!(processor = self.name, error = %e, "failed to read backing trait");
                None
            }
        }
    }

    fn set_value(&self, holder: &mut dyn DataHolder, value: &E) -> ProcessorResult<()> {
        let mut data = self
            .processor
            .read(holder)?
            .unwrap_or_else(|| self.processor.create());
        data.set(&self.key, value.clone())?;
        match data.get(&self.key) {
            Some(stored) if stored == *value => self.processor.write(holder, &data),
            stored => Err(ProcessorError::rejected(
                self.key.id(),
                format!("{value:?} would be stored as {stored:?}"),
            )),
        }
    }

    fn clear_value(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        if !self.removable {
            return Ok(false);
        }
        self.processor.remove(holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessel_data::keys::{COLOR, DISPLAY_NAME, REMAINING_AIR, SPAWNER_MINIMUM_DELAY};
    use tessel_holder::{Entity, EntityKind, TileEntity, TileKind};
    use tessel_transaction::TransactionKind;
    use tessel_types::BlockPos;

    use crate::processors::{BreathingProcessor, EntityDisplayNameProcessor, MobSpawnerProcessor};

    fn air() -> TraitValue<BreathingProcessor, i32> {
        TraitValue::new("test:air", REMAINING_AIR, BreathingProcessor).unwrap()
    }

    #[test]
    fn default_comes_from_the_trait() {
        assert_eq!(air().default_value(), 300);
        assert!(TraitValue::new("test:color", COLOR, BreathingProcessor).is_none());
    }

    #[test]
    fn offer_writes_through_the_trait() {
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = air().offer_to_store(&mut zombie, 120).unwrap();
        assert!(result.is_successful());
        assert_eq!(zombie.air(), 120);
        assert_eq!(result.replaced()[0].get(), &json!(300));
        assert_eq!(air().get_value(&zombie), Some(120));
    }

    #[test]
    fn trait_bounds_apply_to_single_values() {
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = air().offer_to_store(&mut zombie, 301).unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(REMAINING_AIR.id()));
        assert_eq!(zombie.air(), 300);
    }

    #[test]
    fn clamped_values_are_rejected() {
        let spawner_min =
            TraitValue::new("test:min_delay", SPAWNER_MINIMUM_DELAY, MobSpawnerProcessor).unwrap();
        let mut spawner = TileEntity::new(TileKind::MobSpawner, BlockPos::ORIGIN);
        let result = spawner_min.offer_to_store(&mut spawner, 900).unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.successful().is_empty());
        assert_eq!(spawner_min.get_value(&spawner), Some(200));

        let result = spawner_min.offer_to_store(&mut spawner, 750).unwrap();
        assert!(result.is_successful());
        assert_eq!(spawner_min.get_value(&spawner), Some(750));
    }

    #[test]
    fn unsupported_holder() {
        let mut boat = Entity::new(EntityKind::Boat);
        assert!(air().get_value(&boat).is_none());
        let result = air().offer_to_store(&mut boat, 10).unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
    }

    #[test]
    fn remove_only_when_removable() {
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = air().remove_from(&mut zombie).unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);

        let name = TraitValue::new("test:name", DISPLAY_NAME, EntityDisplayNameProcessor)
            .unwrap()
            .removable();
        name.offer_to_store(&mut zombie, "Grumbles".to_string()).unwrap();
        assert_eq!(zombie.custom_name(), Some("Grumbles"));
        let result = name.remove_from(&mut zombie).unwrap();
        assert!(result.is_successful());
        assert_eq!(result.replaced()[0].get(), &json!("Grumbles"));
        assert!(zombie.custom_name().is_none());
    }
}
