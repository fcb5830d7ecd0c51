use std::any::Any;
use std::sync::Arc;

use serde_json::Value as Json;
use tessel_holder::DataHolder;
use tessel_transaction::DataTransactionResult;
use tessel_types::{Key, KeyDescriptor, ValueType};
use tessel_value::{AnyValue, ImmutableValue};

use crate::error::{ProcessorError, ProcessorResult};

/// Fast path for one key: reads and writes a single value straight from
/// the holder's native storage, without building a whole trait.
///
/// Implementations supply the native accessors; the offer and removal
/// bookkeeping is shared.
pub trait ValueProcessor: Send + Sync + 'static {
    type Element: ValueType;

    fn name(&self) -> &'static str;

    fn key(&self) -> Key<Self::Element>;

    /// The value reported when the holder carries no actual value.
    fn default_value(&self) -> Self::Element;

    /// Whether this processor can handle `holder`. Pure.
    fn supports(&self, holder: &dyn DataHolder) -> bool;

    fn get_value(&self, holder: &dyn DataHolder) -> Option<Self::Element>;

    /// Write `value` to the native storage. Must validate before writing
    /// and return [`ProcessorError::Rejected`] without touching the holder
    /// when the value is refused.
    fn set_value(&self, holder: &mut dyn DataHolder, value: &Self::Element) -> ProcessorResult<()>;

    /// Clear the native value. Returns whether anything was removed.
    fn clear_value(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }

    /// The holder's value as a value handle.
    fn api_value(&self, holder: &dyn DataHolder) -> Option<ImmutableValue<Self::Element>> {
        let actual = self.get_value(holder)?;
        Some(ImmutableValue::with_actual(self.key(), self.default_value(), actual))
    }

    /// Write exactly one value. A refused value yields FAILURE with the
    /// value rejected; success records the previous value as replaced.
    fn offer_to_store(
        &self,
        holder: &mut dyn DataHolder,
        value: Self::Element,
    ) -> ProcessorResult<DataTransactionResult> {
        let key = self.key();
        let default = self.default_value();
        let offered = AnyValue::of(&key, &default, Some(&value));
        if !self.supports(holder) {
            return Ok(DataTransactionResult::fail_result(
                offered,
                format!("{} does not support {}", holder.holder_type(), key.id()),
            ));
        }
        let previous = self.get_value(holder);
        match self.set_value(holder, &value) {
            Ok(()) => Ok(DataTransactionResult::success_replace_result(
                offered,
                AnyValue::of(&key, &default, previous.as_ref()),
            )),
            Err(e) if e.is_rejection() => {
                tracing::debug!(processor = self.name(), key = %key.id(), reason = %e, "value rejected");
                Ok(DataTransactionResult::fail_result(offered, e.reason()))
            }
            Err(e) => Err(e),
        }
    }

    fn remove_from(&self, holder: &mut dyn DataHolder) -> ProcessorResult<DataTransactionResult> {
        if !self.supports(holder) {
            return Ok(DataTransactionResult::fail_no_data());
        }
        let previous = self.get_value(holder);
        if !self.clear_value(holder)? {
            return Ok(DataTransactionResult::fail_no_data());
        }
        let replaced = AnyValue::of(&self.key(), &self.default_value(), previous.as_ref());
        Ok(DataTransactionResult::builder().replace(replaced).build())
    }
}

/// Element-erased view of a value processor, as stored in a registry chain.
pub trait ErasedValueProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn key(&self) -> KeyDescriptor;

    fn supports(&self, holder: &dyn DataHolder) -> bool;

    /// The holder's value in erased form, or `None` when it has none.
    fn get_any(&self, holder: &dyn DataHolder) -> Option<AnyValue>;

    /// Decode `value` and offer it. An undecodable value is rejected.
    fn offer_json(
        &self,
        holder: &mut dyn DataHolder,
        value: Json,
    ) -> ProcessorResult<DataTransactionResult>;

    fn remove_from(&self, holder: &mut dyn DataHolder) -> ProcessorResult<DataTransactionResult>;

    fn as_any(&self) -> &dyn Any;
}

/// Registry entry wrapping a typed value processor.
pub struct ValueHandle<E: ValueType> {
    processor: Arc<dyn ValueProcessor<Element = E>>,
}

impl<E: ValueType> ValueHandle<E> {
    pub fn new<P: ValueProcessor<Element = E>>(processor: P) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    pub fn processor(&self) -> &dyn ValueProcessor<Element = E> {
        self.processor.as_ref()
    }
}

impl<E: ValueType> ErasedValueProcessor for ValueHandle<E> {
    fn name(&self) -> &'static str {
        self.processor.name()
    }

    fn key(&self) -> KeyDescriptor {
        self.processor.key().descriptor()
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        self.processor.supports(holder)
    }

    fn get_any(&self, holder: &dyn DataHolder) -> Option<AnyValue> {
        self.processor.api_value(holder).map(|v| v.to_any())
    }

    fn offer_json(
        &self,
        holder: &mut dyn DataHolder,
        value: Json,
    ) -> ProcessorResult<DataTransactionResult> {
        match serde_json::from_value::<E>(value.clone()) {
            Ok(typed) => self.processor.offer_to_store(holder, typed),
            Err(e) => {
                let key = self.processor.key();
                let raw = AnyValue::of(&key, &self.processor.default_value(), None).with(value);
                Ok(DataTransactionResult::fail_result(raw, e.to_string()))
            }
        }
    }

    fn remove_from(&self, holder: &mut dyn DataHolder) -> ProcessorResult<DataTransactionResult> {
        self.processor.remove_from(holder)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reject anything outside `[min, max]` before it reaches native storage.
pub fn check_range<E>(key: &Key<E>, value: &E, min: &E, max: &E) -> ProcessorResult<()>
where
    E: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ProcessorError::rejected(
            key.id(),
            format!("{value} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}
