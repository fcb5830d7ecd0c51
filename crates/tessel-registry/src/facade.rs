use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use serde_json::Value as Json;
use tessel_data::{DataManipulator, DataResult, TraitType, ValueContainer};
use tessel_holder::{DataHolder, FlyweightStore};
use tessel_processor::{reject_all, ProcessorResult};
use tessel_transaction::{DataTransactionResult, RejectedValue};
use tessel_types::{BlockPos, DataContainer, DataPriority, Key, KeyDescriptor, ValueType, WorldId};
use tessel_value::{AnyValue, ImmutableValue};

use crate::config::RegistryConfig;
use crate::hooks::{HookDecision, OfferTarget};
use crate::registry::ProcessorRegistry;

/// The single entry point native adapters call.
///
/// Every read dispatches to the first supporting processor of the
/// relevant chain and yields `None` when there is none. Every write runs
/// the offer hooks first, then the processor, and reports through a
/// [`DataTransactionResult`]. Processor faults (and, when configured,
/// panics) become ERROR results that list the offered values as rejected;
/// they never propagate.
#[derive(Debug)]
pub struct DataFacade {
    registry: ProcessorRegistry,
}

impl DataFacade {
    /// Seal `registry` and wrap it.
    pub fn new(mut registry: ProcessorRegistry) -> Self {
        registry.seal();
        Self { registry }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RegistryConfig {
        self.registry.config()
    }

    // -----------------------------------------------------------------------
    // Capability queries
    // -----------------------------------------------------------------------

    pub fn supports_key<E: ValueType>(&self, holder: &dyn DataHolder, key: &Key<E>) -> bool {
        self.registry.value_processor(key.id(), holder).is_some()
    }

    pub fn supports_trait<M: DataManipulator>(&self, holder: &dyn DataHolder) -> bool {
        self.registry.trait_processor(M::TRAIT, holder).is_some()
    }

    pub fn supports_block_trait<M: DataManipulator>(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> bool {
        store
            .state_at(world, pos)
            .and_then(|state| self.registry.block_processor(M::TRAIT, store.table(), state))
            .is_some()
    }

    // -----------------------------------------------------------------------
    // Single values
    // -----------------------------------------------------------------------

    pub fn get<E: ValueType>(&self, holder: &dyn DataHolder, key: &Key<E>) -> Option<E> {
        self.get_value(holder, key).map(|v| v.get().clone())
    }

    pub fn get_value<E: ValueType>(
        &self,
        holder: &dyn DataHolder,
        key: &Key<E>,
    ) -> Option<ImmutableValue<E>> {
        let processor = self.registry.value_handle(key, holder)?.processor();
        self.read(processor.name(), || Ok(processor.api_value(holder)))
    }

    /// Erased read, for callers that only know the key at runtime.
    pub fn get_any(&self, holder: &dyn DataHolder, key: KeyDescriptor) -> Option<AnyValue> {
        let processor = self.registry.value_processor(key.id, holder)?;
        self.read(processor.name(), || Ok(processor.get_any(holder)))
    }

    pub fn offer<E: ValueType>(
        &self,
        holder: &mut dyn DataHolder,
        key: &Key<E>,
        value: E,
    ) -> DataTransactionResult {
        let Some(handle) = self.registry.value_handle(key, holder) else {
            let offered = AnyValue::of(key, &value, Some(&value));
            return unsupported(offered, holder);
        };
        let processor = handle.processor();
        let offered = AnyValue::of(key, &processor.default_value(), Some(&value));
        if let Some(cancelled) = self.vetoed(OfferTarget::Holder(holder), slice::from_ref(&offered)) {
            return cancelled;
        }
        self.write(processor.name(), slice::from_ref(&offered), || {
            processor.offer_to_store(holder, value)
        })
    }

    /// Erased offer: `value` is decoded by the processor, and an
    /// undecodable value is rejected.
    pub fn offer_json(
        &self,
        holder: &mut dyn DataHolder,
        key: KeyDescriptor,
        value: Json,
    ) -> DataTransactionResult {
        let Some(processor) = self.registry.value_processor(key.id, holder) else {
            return unsupported(AnyValue::new(key, Json::Null, Some(value)), holder);
        };
        let offered = processor
            .get_any(holder)
            .map(|current| current.with(value.clone()))
            .unwrap_or_else(|| AnyValue::new(key, Json::Null, Some(value.clone())));
        if let Some(cancelled) = self.vetoed(OfferTarget::Holder(holder), slice::from_ref(&offered)) {
            return cancelled;
        }
        self.write(processor.name(), slice::from_ref(&offered), || {
            processor.offer_json(holder, value)
        })
    }

    pub fn remove_value<E: ValueType>(
        &self,
        holder: &mut dyn DataHolder,
        key: &Key<E>,
    ) -> DataTransactionResult {
        let Some(handle) = self.registry.value_handle(key, holder) else {
            return DataTransactionResult::fail_no_data();
        };
        let processor = handle.processor();
        let current: Vec<AnyValue> = processor.api_value(holder).map(|v| v.to_any()).into_iter().collect();
        if let Some(cancelled) = self.vetoed(OfferTarget::Holder(holder), &current) {
            return cancelled;
        }
        self.write(processor.name(), &current, || processor.remove_from(holder))
    }

    /// Start a batch of offers against one holder. The batch result is the
    /// combination of every offer's result.
    pub fn transaction<'a>(&'a self, holder: &'a mut dyn DataHolder) -> Transaction<'a> {
        Transaction {
            facade: self,
            holder,
            result: DataTransactionResult::success_no_data(),
        }
    }

    // -----------------------------------------------------------------------
    // Traits on per-instance holders
    // -----------------------------------------------------------------------

    pub fn get_data<M: DataManipulator>(&self, holder: &dyn DataHolder) -> Option<M> {
        let processor = self.registry.trait_handle::<M>(holder)?.processor();
        self.read(processor.name(), || processor.create_from(holder))
    }

    /// Offer a trait with the configured default priority.
    pub fn offer_data<M: DataManipulator>(
        &self,
        holder: &mut dyn DataHolder,
        data: M,
    ) -> DataTransactionResult {
        self.offer_data_with(holder, data, self.config().default_priority)
    }

    pub fn offer_data_with<M: DataManipulator>(
        &self,
        holder: &mut dyn DataHolder,
        data: M,
        priority: DataPriority,
    ) -> DataTransactionResult {
        let Some(handle) = self.registry.trait_handle::<M>(holder) else {
            return reject_all(
                &data,
                &format!("no processor for {} supports {}", M::TRAIT, holder.holder_type()),
            );
        };
        let offered = data.values();
        if let Some(cancelled) = self.vetoed(OfferTarget::Holder(holder), &offered) {
            return cancelled;
        }
        let processor = handle.processor();
        self.write(processor.name(), &offered, || processor.set_data(holder, data, priority))
    }

    /// Fill `data` from the holder with the holder's values winning.
    pub fn fill<M: DataManipulator>(&self, holder: &dyn DataHolder, data: &M) -> Option<M> {
        self.fill_data(holder, data, DataPriority::DataHolder)
    }

    pub fn fill_data<M: DataManipulator>(
        &self,
        holder: &dyn DataHolder,
        data: &M,
        priority: DataPriority,
    ) -> Option<M> {
        let processor = self.registry.trait_handle::<M>(holder)?.processor();
        self.read(processor.name(), || processor.fill_data(holder, data, priority))
    }

    pub fn remove_data<M: DataManipulator>(&self, holder: &mut dyn DataHolder) -> DataTransactionResult {
        let Some(handle) = self.registry.trait_handle::<M>(holder) else {
            return DataTransactionResult::fail_no_data();
        };
        let processor = handle.processor();
        let current = self
            .read(processor.name(), || processor.create_from(holder))
            .map(|data| data.values())
            .unwrap_or_default();
        if let Some(cancelled) = self.vetoed(OfferTarget::Holder(holder), &current) {
            return cancelled;
        }
        self.write(processor.name(), &current, || {
            if processor.remove(holder)? {
                Ok(DataTransactionResult::builder().replace_all(current.clone()).build())
            } else {
                Ok(DataTransactionResult::fail_no_data())
            }
        })
    }

    /// Rebuild a trait from its serialized form, through the first
    /// registered processor for it when there is one.
    pub fn build_data<M: DataManipulator>(&self, container: &DataContainer) -> DataResult<M> {
        match self.registry.any_trait_handle::<M>() {
            Some(handle) => handle.processor().build(container),
            None => M::from_container(container),
        }
    }

    /// Every trait the holder currently carries, with its values.
    pub fn inspect(&self, holder: &dyn DataHolder) -> Vec<(TraitType, Vec<AnyValue>)> {
        self.registry
            .trait_types()
            .into_iter()
            .filter_map(|trait_type| {
                let processor = self.registry.trait_processor(trait_type, holder)?;
                let values = self.read(processor.name(), || processor.values_of(holder))?;
                Some((trait_type, values))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Traits on flyweight blocks
    // -----------------------------------------------------------------------

    pub fn get_block_data<M: DataManipulator>(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> Option<M> {
        let state = store.state_at(world, pos)?;
        let processor = self.registry.block_handle::<M>(store.table(), state)?.processor();
        self.read(processor.name(), || Ok(processor.get_at(store, world, pos)))
    }

    pub fn offer_block_data<M: DataManipulator>(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
        data: M,
        priority: DataPriority,
    ) -> DataTransactionResult {
        let Some(state) = store.state_at(world, pos) else {
            return reject_all(&data, &format!("no block at {pos} in {world}"));
        };
        let Some(handle) = self.registry.block_handle::<M>(store.table(), state) else {
            return reject_all(&data, &format!("no processor for {} supports {state}", M::TRAIT));
        };
        let target = OfferTarget::Block { world, pos };
        let offered = data.values();
        if let Some(cancelled) = self.vetoed(target, &offered) {
            return cancelled;
        }
        let processor = handle.processor();
        self.write(processor.name(), &offered, || {
            processor.offer_at(store, world, pos, data, priority)
        })
    }

    pub fn fill_block_data<M: DataManipulator>(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
        data: &M,
        priority: DataPriority,
    ) -> Option<M> {
        let state = store.state_at(world, pos)?;
        let processor = self.registry.block_handle::<M>(store.table(), state)?.processor();
        self.read(processor.name(), || Ok(processor.fill_at(store, world, pos, data, priority)))
    }

    pub fn remove_block_data<M: DataManipulator>(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> DataTransactionResult {
        let Some(state) = store.state_at(world, pos) else {
            return DataTransactionResult::fail_no_data();
        };
        let Some(handle) = self.registry.block_handle::<M>(store.table(), state) else {
            return DataTransactionResult::fail_no_data();
        };
        let processor = handle.processor();
        let current = processor
            .from_state(store.table(), state)
            .map(|data| data.values())
            .unwrap_or_default();
        if let Some(cancelled) = self.vetoed(OfferTarget::Block { world, pos }, &current) {
            return cancelled;
        }
        self.write(processor.name(), &current, || processor.remove_at(store, world, pos))
    }

    /// Every block trait the state at `pos` exhibits.
    pub fn block_traits(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> Vec<TraitType> {
        let Some(state) = store.state_at(world, pos) else {
            return Vec::new();
        };
        self.registry
            .block_trait_types()
            .into_iter()
            .filter(|t| self.registry.block_processor(*t, store.table(), state).is_some())
            .collect()
    }

    /// Every block trait at `pos`, with its values.
    pub fn inspect_block(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> Vec<(TraitType, Vec<AnyValue>)> {
        let Some(state) = store.state_at(world, pos) else {
            return Vec::new();
        };
        let table = store.table();
        self.block_traits(store, world, pos)
            .into_iter()
            .filter_map(|trait_type| {
                let processor = self.registry.block_processor(trait_type, table, state)?;
                let values = self.read(processor.name(), || Ok(processor.values_of(table, state)))?;
                Some((trait_type, values))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Dispatch plumbing
    // -----------------------------------------------------------------------

    fn vetoed(&self, target: OfferTarget<'_>, values: &[AnyValue]) -> Option<DataTransactionResult> {
        if !self.config().hooks_enabled {
            return None;
        }
        self.registry.hooks().iter().find_map(|hook| {
            match hook.before_offer(target, values) {
                HookDecision::Allow => None,
                HookDecision::Veto { reason } => {
                    tracing::info!(hook = hook.name(), ?target, reason = %reason, "offer vetoed");
                    Some(DataTransactionResult::cancelled(values.iter().cloned(), &reason))
                }
            }
        })
    }

    /// Run a processor call, turning faults and captured panics into an
    /// error description.
    fn guarded<T>(&self, processor: &str, op: impl FnOnce() -> ProcessorResult<T>) -> Result<T, String> {
        let outcome = if self.config().capture_panics {
            match panic::catch_unwind(AssertUnwindSafe(op)) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(processor, panic = %message, "processor panicked");
                    return Err(format!("processor {processor} panicked: {message}"));
                }
            }
        } else {
            op()
        };
        outcome.map_err(|e| {
            tracing::warn!(processor, error = %e, "processor fault");
            e.to_string()
        })
    }

    fn read<T>(&self, processor: &str, op: impl FnOnce() -> ProcessorResult<Option<T>>) -> Option<T> {
        self.guarded(processor, op).ok().flatten()
    }

    /// `offered` is what the call tried to apply; a fault reports all of it
    /// as rejected.
    fn write(
        &self,
        processor: &str,
        offered: &[AnyValue],
        op: impl FnOnce() -> ProcessorResult<DataTransactionResult>,
    ) -> DataTransactionResult {
        self.guarded(processor, op).unwrap_or_else(|reason| {
            let rejected = offered
                .iter()
                .map(|value| RejectedValue::new(value.clone(), reason.clone()));
            DataTransactionResult::builder()
                .reject_all(rejected)
                .error(reason)
                .build()
        })
    }
}

fn unsupported(offered: AnyValue, holder: &dyn DataHolder) -> DataTransactionResult {
    let reason = format!("no processor for {} supports {}", offered.id(), holder.holder_type());
    tracing::debug!(reason = %reason, "offer unsupported");
    DataTransactionResult::fail_result(offered, reason)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic".to_string())
}

/// A batch of offers against one holder.
pub struct Transaction<'a> {
    facade: &'a DataFacade,
    holder: &'a mut dyn DataHolder,
    result: DataTransactionResult,
}

impl Transaction<'_> {
    pub fn offer<E: ValueType>(&mut self, key: &Key<E>, value: E) -> &mut Self {
        let result = self.facade.offer(&mut *self.holder, key, value);
        self.result.absorb(result);
        self
    }

    pub fn offer_data<M: DataManipulator>(&mut self, data: M, priority: DataPriority) -> &mut Self {
        let result = self.facade.offer_data_with(&mut *self.holder, data, priority);
        self.result.absorb(result);
        self
    }

    /// The combined result so far.
    pub fn result(&self) -> &DataTransactionResult {
        &self.result
    }

    pub fn commit(self) -> DataTransactionResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessel_data::keys::{GROWTH_STAGE, ITEM_LORE, REMAINING_AIR, VELOCITY};
    use tessel_data::{GrowthData, LoreData, Vector3d};
    use tessel_holder::block::{PropertyRange, PropertyValue, STONE, WHEAT};
    use tessel_holder::{
        Capability, Entity, EntityKind, InMemoryBlockStore, ItemStack, StateId, StateTable, Tag,
    };
    use tessel_processor::{
        check_range, BlockTraitProcessor, ProcessorError, TraitProcessor, ValueProcessor,
    };
    use tessel_transaction::TransactionKind;

    use crate::hooks::KeyVetoHook;

    struct AirProcessor;

    impl ValueProcessor for AirProcessor {
        type Element = i32;

        fn name(&self) -> &'static str {
            "test:air"
        }

        fn key(&self) -> Key<i32> {
            REMAINING_AIR
        }

        fn default_value(&self) -> i32 {
            300
        }

        fn supports(&self, holder: &dyn DataHolder) -> bool {
            holder.has(Capability::Breathing)
        }

        fn get_value(&self, holder: &dyn DataHolder) -> Option<i32> {
            holder.field("Air")?.as_i32()
        }

        fn set_value(&self, holder: &mut dyn DataHolder, value: &i32) -> ProcessorResult<()> {
            check_range(&REMAINING_AIR, value, &0, &300)?;
            holder.set_field("Air", Tag::Short(*value as i16))?;
            Ok(())
        }
    }

    /// Blows up on every call.
    struct PanickingProcessor;

    impl ValueProcessor for PanickingProcessor {
        type Element = Vector3d;

        fn name(&self) -> &'static str {
            "test:panicking"
        }

        fn key(&self) -> Key<Vector3d> {
            VELOCITY
        }

        fn default_value(&self) -> Vector3d {
            Vector3d::ZERO
        }

        fn supports(&self, _holder: &dyn DataHolder) -> bool {
            true
        }

        fn get_value(&self, _holder: &dyn DataHolder) -> Option<Vector3d> {
            panic!("motion unavailable")
        }

        fn set_value(&self, _holder: &mut dyn DataHolder, _value: &Vector3d) -> ProcessorResult<()> {
            panic!("motion unavailable")
        }
    }

    struct LoreProcessor;

    impl TraitProcessor for LoreProcessor {
        type Data = LoreData;

        fn name(&self) -> &'static str {
            "test:lore"
        }

        fn supports(&self, holder: &dyn DataHolder) -> bool {
            holder.has(Capability::ItemTag)
        }

        fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<LoreData>> {
            let Some(lines) = holder
                .tag()
                .and_then(|t| t.compound("display"))
                .and_then(|d| d.get_list("Lore"))
            else {
                return Ok(None);
            };
            Ok(Some(LoreData::new(lines.iter().filter_map(Tag::as_str))))
        }

        fn write(&self, holder: &mut dyn DataHolder, data: &LoreData) -> ProcessorResult<()> {
            let display = holder
                .tag_mut()
                .and_then(|t| t.compound_mut("display"))
                .ok_or_else(|| ProcessorError::internal("test:lore", "no display compound"))?;
            display.insert("Lore", Tag::string_list(data.lines()));
            Ok(())
        }

        fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
            Ok(holder
                .tag_mut()
                .and_then(|t| t.compound_mut("display"))
                .and_then(|d| d.remove("Lore"))
                .is_some())
        }
    }

    struct AgeProcessor;

    impl BlockTraitProcessor for AgeProcessor {
        type Data = GrowthData;

        fn name(&self) -> &'static str {
            "test:age"
        }

        fn supports_state(&self, table: &StateTable, state: StateId) -> bool {
            table.block_of(state) == Some(WHEAT)
        }

        fn from_state(&self, table: &StateTable, state: StateId) -> Option<GrowthData> {
            let age = table.property(state, "age")?.as_int()?;
            let PropertyRange::Int { max, .. } = table.range(state, "age")? else {
                return None;
            };
            GrowthData::new(age, *max).ok()
        }

        fn with_data(
            &self,
            table: &StateTable,
            state: StateId,
            data: &GrowthData,
        ) -> ProcessorResult<StateId> {
            table
                .with_property(state, "age", PropertyValue::Int(data.growth()))
                .map_err(|e| ProcessorError::rejected(GROWTH_STAGE.id(), e.to_string()))
        }
    }

    fn registry(config: RegistryConfig) -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new(config);
        registry.register_value(AirProcessor).unwrap();
        registry.register_value(PanickingProcessor).unwrap();
        registry.register_trait(LoreProcessor).unwrap();
        registry.register_block(AgeProcessor).unwrap();
        registry
    }

    fn facade() -> DataFacade {
        DataFacade::new(registry(RegistryConfig::default()))
    }

    fn lore_of(facade: &DataFacade, item: &ItemStack) -> Vec<String> {
        facade.get_data::<LoreData>(item).map(|d| d.lines()).unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    #[test]
    fn facade_seals_registry() {
        let facade = facade();
        assert!(facade.registry().is_sealed());
    }

    #[test]
    fn offer_and_get_value() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        assert!(facade.supports_key(&zombie, &REMAINING_AIR));

        let result = facade.offer(&mut zombie, &REMAINING_AIR, 42);
        assert_eq!(result.kind(), TransactionKind::Success);
        assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(42));
        assert_eq!(*facade.get_value(&zombie, &REMAINING_AIR).unwrap().default_value(), 300);
    }

    #[test]
    fn unsupported_holder_fails_without_touching_it() {
        let facade = facade();
        let mut cart = Entity::new(EntityKind::Minecart);
        assert!(!facade.supports_key(&cart, &REMAINING_AIR));
        assert_eq!(facade.get(&cart, &REMAINING_AIR), None);

        let result = facade.offer(&mut cart, &REMAINING_AIR, 10);
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(REMAINING_AIR.id()));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = facade.offer(&mut zombie, &REMAINING_AIR, 301);
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(300));
    }

    #[test]
    fn erased_offer_and_read() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let key = REMAINING_AIR.descriptor();
        assert!(facade.offer_json(&mut zombie, key, json!(7)).is_successful());
        assert_eq!(facade.get_any(&zombie, key).unwrap().get(), &json!(7));

        let bad = facade.offer_json(&mut zombie, key, json!("seven"));
        assert_eq!(bad.kind(), TransactionKind::Failure);
    }

    // -----------------------------------------------------------------------
    // Fault isolation
    // -----------------------------------------------------------------------

    #[test]
    fn panicking_processor_becomes_error_result() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = facade.offer(&mut zombie, &VELOCITY, Vector3d::new(1.0, 0.0, 0.0));
        assert_eq!(result.kind(), TransactionKind::Error);
        assert!(result.error().unwrap().contains("motion unavailable"));
        assert!(result.is_rejected(VELOCITY.id()));
        assert_eq!(result.rejected().len(), 1);
        assert_eq!(facade.get(&zombie, &VELOCITY), None);

        let batch = {
            let mut tx = facade.transaction(&mut zombie);
            tx.offer(&REMAINING_AIR, 120)
                .offer(&VELOCITY, Vector3d::new(0.0, 1.0, 0.0));
            tx.commit()
        };
        assert_eq!(batch.kind(), TransactionKind::Error);
        assert_eq!(batch.replaced().len() + batch.rejected().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Hooks
    // -----------------------------------------------------------------------

    #[test]
    fn hook_veto_cancels_before_processor_runs() {
        let mut registry = registry(RegistryConfig::default());
        registry.add_hook(KeyVetoHook::new([REMAINING_AIR.id()])).unwrap();
        let facade = DataFacade::new(registry);

        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = facade.offer(&mut zombie, &REMAINING_AIR, 1);
        assert_eq!(result.kind(), TransactionKind::Cancelled);
        assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(300));
    }

    #[test]
    fn hooks_can_be_disabled() {
        let mut registry = registry(RegistryConfig::permissive());
        registry.add_hook(KeyVetoHook::new([REMAINING_AIR.id()])).unwrap();
        let facade = DataFacade::new(registry);

        let mut zombie = Entity::new(EntityKind::Zombie);
        assert!(facade.offer(&mut zombie, &REMAINING_AIR, 1).is_successful());
    }

    // -----------------------------------------------------------------------
    // Traits
    // -----------------------------------------------------------------------

    #[test]
    fn offer_fill_and_remove_trait() {
        let facade = facade();
        let mut item = ItemStack::new("minecraft:stick");
        assert!(facade.supports_trait::<LoreData>(&item));
        assert!(facade.get_data::<LoreData>(&item).is_none());

        let result = facade.offer_data(&mut item, LoreData::new(["a", "b"]));
        assert!(result.is_successful());
        assert_eq!(lore_of(&facade, &item), vec!["a", "b"]);

        let filled = facade.fill(&item, &LoreData::new(["x"])).unwrap();
        assert_eq!(filled.lines(), vec!["a", "b"]);

        let removed = facade.remove_data::<LoreData>(&mut item);
        assert!(removed.is_successful());
        assert_eq!(removed.replaced()[0].get(), &json!(["a", "b"]));
        assert!(facade.get_data::<LoreData>(&item).is_none());
    }

    #[test]
    fn trait_offer_to_unsupported_holder_rejects_every_key() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = facade.offer_data(&mut zombie, LoreData::new(["a"]));
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(ITEM_LORE.id()));
    }

    #[test]
    fn build_data_from_container() {
        let facade = facade();
        let container = LoreData::new(["one"]).to_container();
        let built: LoreData = facade.build_data(&container).unwrap();
        assert_eq!(built.lines(), vec!["one"]);
    }

    #[test]
    fn inspect_lists_present_traits() {
        let facade = facade();
        let mut item = ItemStack::new("minecraft:stick");
        assert!(facade.inspect(&item).is_empty());
        facade.offer_data(&mut item, LoreData::new(["a"]));
        let traits = facade.inspect(&item);
        assert_eq!(traits.len(), 1);
        assert_eq!(traits[0].0, LoreData::TRAIT);
    }

    #[test]
    fn transaction_combines_results() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let mut tx = facade.transaction(&mut zombie);
        tx.offer(&REMAINING_AIR, 10).offer(&REMAINING_AIR, 900);
        let result = tx.commit();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert_eq!(result.successful().len(), 1);
        assert_eq!(result.rejected().len(), 1);
        assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(10));
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    #[test]
    fn block_trait_round_trip() {
        let facade = facade();
        let store = InMemoryBlockStore::new(StateTable::standard());
        let world = WorldId::from_u128(3);
        let (wheat, stone) = (BlockPos::new(0, 64, 0), BlockPos::new(1, 64, 0));
        store.place(world, wheat, WHEAT).unwrap();
        store.place(world, stone, STONE).unwrap();

        assert!(facade.supports_block_trait::<GrowthData>(&store, world, wheat));
        assert!(!facade.supports_block_trait::<GrowthData>(&store, world, stone));
        assert_eq!(facade.block_traits(&store, world, wheat), vec![GrowthData::TRAIT]);
        assert!(facade.block_traits(&store, world, stone).is_empty());

        let grown = GrowthData::new(6, 7).unwrap();
        let result = facade.offer_block_data(&store, world, wheat, grown, DataPriority::DataManipulator);
        assert!(result.is_successful());
        let read: GrowthData = facade.get_block_data(&store, world, wheat).unwrap();
        assert_eq!(read.growth(), 6);

        let filled = facade
            .fill_block_data(&store, world, wheat, &GrowthData::default(), DataPriority::DataHolder)
            .unwrap();
        assert_eq!(filled.growth(), 6);
        assert_eq!(facade.inspect_block(&store, world, wheat).len(), 1);
    }

    #[test]
    fn block_offer_to_empty_position_rejects() {
        let facade = facade();
        let store = InMemoryBlockStore::new(StateTable::standard());
        let result = facade.offer_block_data(
            &store,
            WorldId::from_u128(3),
            BlockPos::ORIGIN,
            GrowthData::default(),
            DataPriority::DataManipulator,
        );
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(GROWTH_STAGE.id()));
        assert_eq!(
            facade
                .remove_block_data::<GrowthData>(&store, WorldId::from_u128(3), BlockPos::ORIGIN)
                .kind(),
            TransactionKind::Failure
        );
    }
}
