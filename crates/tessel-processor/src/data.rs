use std::any::Any;
use std::sync::Arc;

use tessel_data::{DataManipulator, DataResult, TraitType, ValueContainer};
use tessel_holder::DataHolder;
use tessel_transaction::DataTransactionResult;
use tessel_types::{DataContainer, DataPriority};
use tessel_value::AnyValue;

use crate::error::ProcessorResult;
use crate::merge::merge;

/// Slow path for one trait type: maps a holder's native fields to a whole
/// trait and back.
///
/// Concrete processors only implement the native mapping (`read`,
/// `write`, `remove`); `fill_data` and `set_data` apply the shared priority
/// merge.
pub trait TraitProcessor: Send + Sync + 'static {
    type Data: DataManipulator;

    fn name(&self) -> &'static str;

    /// Whether this processor can handle `holder`. Pure.
    fn supports(&self, holder: &dyn DataHolder) -> bool;

    /// Build the trait from the holder's native state, or `None` when the
    /// holder currently carries none of it.
    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<Self::Data>>;

    /// Write `data` to the native state. Must validate before writing.
    fn write(&self, holder: &mut dyn DataHolder, data: &Self::Data) -> ProcessorResult<()>;

    /// Strip the trait from the holder. Returns whether anything was
    /// removed; holders that cannot lose the trait return `false`.
    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool>;

    fn trait_type(&self) -> TraitType {
        <Self::Data as ValueContainer>::TRAIT
    }

    /// A trait in its default state.
    fn create(&self) -> Self::Data {
        Self::Data::default()
    }

    fn create_from(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<Self::Data>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        self.read(holder)
    }

    fn build(&self, container: &DataContainer) -> DataResult<Self::Data> {
        Self::Data::from_container(container)
    }

    /// Merge the holder's state into `data` without writing anything.
    fn fill_data(
        &self,
        holder: &dyn DataHolder,
        data: &Self::Data,
        priority: DataPriority,
    ) -> ProcessorResult<Option<Self::Data>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let current = self.read(holder)?;
        Ok(Some(merge(current.as_ref(), data, priority).into_data()))
    }

    /// Merge `data` with the holder's state and write the outcome.
    fn set_data(
        &self,
        holder: &mut dyn DataHolder,
        data: Self::Data,
        priority: DataPriority,
    ) -> ProcessorResult<DataTransactionResult> {
        if !self.supports(holder) {
            return Ok(reject_all(&data, "holder does not support this trait"));
        }
        let current = self.read(holder)?;
        let merged = merge(current.as_ref(), &data, priority);
        match self.write(holder, merged.data()) {
            Ok(()) => Ok(merged.into_result()),
            Err(e) if e.is_rejection() => {
                tracing::debug!(processor = self.name(), reason = %e, "trait rejected");
                Ok(reject_all(merged.data(), &e.reason()))
            }
            Err(e) => Err(e),
        }
    }
}

/// FAILURE listing every value of `data` as rejected.
pub fn reject_all<M: ValueContainer>(data: &M, reason: &str) -> DataTransactionResult {
    let mut builder = DataTransactionResult::builder();
    for value in data.values() {
        builder = builder.reject(value, reason);
    }
    builder.build()
}

/// Manipulator-erased view of a trait processor, as stored in a registry
/// chain.
pub trait ErasedTraitProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn trait_type(&self) -> TraitType;

    fn supports(&self, holder: &dyn DataHolder) -> bool;

    /// The holder's values for this trait, or `None` when it has none.
    fn values_of(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<Vec<AnyValue>>>;

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool>;

    fn as_any(&self) -> &dyn Any;
}

/// Registry entry wrapping a typed trait processor.
pub struct TraitHandle<M: DataManipulator> {
    processor: Arc<dyn TraitProcessor<Data = M>>,
}

impl<M: DataManipulator> TraitHandle<M> {
    pub fn new<P: TraitProcessor<Data = M>>(processor: P) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    pub fn processor(&self) -> &dyn TraitProcessor<Data = M> {
        self.processor.as_ref()
    }
}

impl<M: DataManipulator> ErasedTraitProcessor for TraitHandle<M> {
    fn name(&self) -> &'static str {
        self.processor.name()
    }

    fn trait_type(&self) -> TraitType {
        M::TRAIT
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        self.processor.supports(holder)
    }

    fn values_of(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<Vec<AnyValue>>> {
        Ok(self.processor.create_from(holder)?.map(|data| data.values()))
    }

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        self.processor.remove(holder)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tessel_data::keys::ITEM_LORE;
    use tessel_data::LoreData;
    use tessel_holder::{Capability, ItemStack, Tag};
    use tessel_transaction::TransactionKind;

    use crate::error::ProcessorError;

    /// Lore under `display.Lore` of an item's tag.
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
            let lines: Vec<&str> = lines.iter().filter_map(Tag::as_str).collect();
            Ok(Some(LoreData::new(lines)))
        }

        fn write(&self, holder: &mut dyn DataHolder, data: &LoreData) -> ProcessorResult<()> {
            if data.lines().iter().any(|l| l.len() > 32) {
                return Err(ProcessorError::rejected(ITEM_LORE.id(), "line too long"));
            }
            let tag = holder
                .tag_mut()
                .and_then(|t| t.compound_mut("display"))
                .ok_or_else(|| ProcessorError::internal("test:lore", "no display compound"))?;
            tag.insert("Lore", Tag::string_list(data.lines()));
            Ok(())
        }

        fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
            Ok(false)
        }
    }

    fn item_with(lines: &[&str]) -> ItemStack {
        let mut item = ItemStack::new("minecraft:stick");
        LoreProcessor
            .set_data(&mut item, LoreData::new(lines.iter().copied()), DataPriority::DataManipulator)
            .unwrap();
        item
    }

    fn lines_of(item: &ItemStack) -> Vec<String> {
        LoreProcessor.create_from(item).unwrap().unwrap_or_default().lines()
    }

    // -----------------------------------------------------------------------
    // Priority semantics through a real holder
    // -----------------------------------------------------------------------

    #[test]
    fn lore_example_fill() {
        let item = item_with(&["A", "B"]);
        let incoming = LoreData::new(["C"]);
        let fill = |p| LoreProcessor.fill_data(&item, &incoming, p).unwrap().unwrap().lines();
        assert_eq!(fill(DataPriority::PostMerge), vec!["A", "B", "C"]);
        assert_eq!(fill(DataPriority::PreMerge), vec!["C"]);
        assert_eq!(fill(DataPriority::DataHolder), vec!["A", "B"]);
    }

    #[test]
    fn lore_example_set_data() {
        let mut item = item_with(&["A", "B"]);
        let result = LoreProcessor
            .set_data(&mut item, LoreData::new(["C"]), DataPriority::DataManipulator)
            .unwrap();
        assert!(result.is_successful());
        assert_eq!(lines_of(&item), vec!["C"]);
        assert_eq!(result.replaced().len() + result.rejected().len(), 1);
    }

    #[test]
    fn rejected_write_leaves_holder_unchanged() {
        let mut item = item_with(&["A"]);
        let long = "x".repeat(40);
        let result = LoreProcessor
            .set_data(&mut item, LoreData::new([long]), DataPriority::DataManipulator)
            .unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(ITEM_LORE.id()));
        assert_eq!(lines_of(&item), vec!["A"]);
    }

    #[test]
    fn fill_without_holder_state_returns_incoming() {
        let item = ItemStack::new("minecraft:stick");
        let incoming = LoreData::new(["C"]);
        let filled = LoreProcessor
            .fill_data(&item, &incoming, DataPriority::DataHolder)
            .unwrap();
        assert_eq!(filled, Some(incoming));
    }

    #[test]
    fn erased_handle_lists_values() {
        let handle = TraitHandle::new(LoreProcessor);
        let item = item_with(&["A"]);
        let values = handle.values_of(&item).unwrap().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(handle.trait_type(), LoreData::TRAIT);
        assert!(handle.as_any().downcast_ref::<TraitHandle<LoreData>>().is_some());
    }

    proptest! {
        #[test]
        fn fill_data_is_pure(
            held in proptest::collection::vec("[a-d]", 0..3),
            offered in proptest::collection::vec("[a-d]", 0..3),
            index in 0usize..4,
        ) {
            let held: Vec<&str> = held.iter().map(String::as_str).collect();
            let item = item_with(&held);
            let before = item.clone();
            let incoming = LoreData::new(offered);
            let priority = DataPriority::ALL[index];
            let first = LoreProcessor.fill_data(&item, &incoming, priority).unwrap();
            let second = LoreProcessor.fill_data(&item, &incoming, priority).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(item, before);
        }
    }
}
