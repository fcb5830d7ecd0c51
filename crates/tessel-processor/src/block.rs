use std::any::Any;
use std::sync::Arc;

use tessel_data::{DataManipulator, TraitType, ValueContainer};
use tessel_holder::{FlyweightStore, StateId, StateTable};
use tessel_transaction::DataTransactionResult;
use tessel_types::{BlockPos, DataPriority, WorldId};
use tessel_value::AnyValue;

use crate::data::reject_all;
use crate::error::ProcessorResult;
use crate::merge::merge;

/// Trait processor for coordinate-addressed (flyweight) block states.
///
/// A block's traits are read off its interned state, and a mutation is a
/// pure function `(current state, trait) -> new state` whose result is
/// swapped in at the position.
pub trait BlockTraitProcessor: Send + Sync + 'static {
    type Data: DataManipulator;

    fn name(&self) -> &'static str;

    /// Whether states of this block exhibit the trait. Pure.
    fn supports_state(&self, table: &StateTable, state: StateId) -> bool;

    fn from_state(&self, table: &StateTable, state: StateId) -> Option<Self::Data>;

    /// The state equal to `state` but carrying `data`.
    fn with_data(
        &self,
        table: &StateTable,
        state: StateId,
        data: &Self::Data,
    ) -> ProcessorResult<StateId>;

    /// The state with the trait stripped, or `None` when the block cannot
    /// lose it.
    fn remove_from(&self, _table: &StateTable, _state: StateId) -> Option<StateId> {
        None
    }

    fn trait_type(&self) -> TraitType {
        <Self::Data as ValueContainer>::TRAIT
    }

    fn get_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> Option<Self::Data> {
        let state = store.state_at(world, pos)?;
        let table = store.table();
        if !self.supports_state(table, state) {
            return None;
        }
        self.from_state(table, state)
    }

    fn fill_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
        data: &Self::Data,
        priority: DataPriority,
    ) -> Option<Self::Data> {
        let current = self.get_at(store, world, pos)?;
        Some(merge(Some(&current), data, priority).into_data())
    }

    fn offer_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
        data: Self::Data,
        priority: DataPriority,
    ) -> ProcessorResult<DataTransactionResult> {
        let table = store.table();
        let Some(state) = store.state_at(world, pos) else {
            return Ok(reject_all(&data, &format!("no block at {pos}")));
        };
        if !self.supports_state(table, state) {
            return Ok(reject_all(&data, "block does not support this trait"));
        }
        let current = self.from_state(table, state);
        let merged = merge(current.as_ref(), &data, priority);
        match self.with_data(table, state, merged.data()) {
            Ok(next) => {
                store.set_state(world, pos, next)?;
                tracing::debug!(processor = self.name(), pos = %pos, from = %state, to = %next, "block trait offered");
                Ok(merged.into_result())
            }
            Err(e) if e.is_rejection() => Ok(reject_all(merged.data(), &e.reason())),
            Err(e) => Err(e),
        }
    }

    fn remove_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> ProcessorResult<DataTransactionResult> {
        let Some(state) = store.state_at(world, pos) else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        let table = store.table();
        let Some(current) = self.from_state(table, state) else {
            return Ok(DataTransactionResult::fail_no_data());
        };
        match self.remove_from(table, state) {
            Some(next) => {
                store.set_state(world, pos, next)?;
                Ok(DataTransactionResult::builder()
                    .replace_all(current.values())
                    .build())
            }
            None => Ok(DataTransactionResult::fail_no_data()),
        }
    }
}

/// Manipulator-erased view of a block trait processor.
pub trait ErasedBlockProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn trait_type(&self) -> TraitType;

    fn supports_state(&self, table: &StateTable, state: StateId) -> bool;

    fn values_of(&self, table: &StateTable, state: StateId) -> Option<Vec<AnyValue>>;

    fn remove_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> ProcessorResult<DataTransactionResult>;

    fn as_any(&self) -> &dyn Any;
}

/// Registry entry wrapping a typed block trait processor.
pub struct BlockHandle<M: DataManipulator> {
    processor: Arc<dyn BlockTraitProcessor<Data = M>>,
}

impl<M: DataManipulator> BlockHandle<M> {
    pub fn new<P: BlockTraitProcessor<Data = M>>(processor: P) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    pub fn processor(&self) -> &dyn BlockTraitProcessor<Data = M> {
        self.processor.as_ref()
    }
}

impl<M: DataManipulator> ErasedBlockProcessor for BlockHandle<M> {
    fn name(&self) -> &'static str {
        self.processor.name()
    }

    fn trait_type(&self) -> TraitType {
        M::TRAIT
    }

    fn supports_state(&self, table: &StateTable, state: StateId) -> bool {
        self.processor.supports_state(table, state)
    }

    fn values_of(&self, table: &StateTable, state: StateId) -> Option<Vec<AnyValue>> {
        if !self.processor.supports_state(table, state) {
            return None;
        }
        self.processor.from_state(table, state).map(|d| d.values())
    }

    fn remove_at(
        &self,
        store: &dyn FlyweightStore,
        world: WorldId,
        pos: BlockPos,
    ) -> ProcessorResult<DataTransactionResult> {
        self.processor.remove_at(store, world, pos)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
