//! Built-in processors for the reference native model.

pub mod block;
pub mod entity;
pub mod item;
pub mod tile;

pub use block::{AxisProcessor, FacingProcessor, GrowthProcessor};
pub use entity::{BreathingProcessor, EntityColorProcessor, EntityDisplayNameProcessor, VelocityProcessor};
pub use item::{ItemDisplayNameProcessor, LeatherColorProcessor, LoreProcessor};
pub use tile::{MobSpawnerProcessor, SignProcessor};

use tessel_holder::{DataHolder, Tag};
use tessel_processor::{ProcessorError, ProcessorResult};
use tessel_types::Key;

/// A raw field the holder must have; its absence is a fault in the native
/// model, not a refused value.
pub(crate) fn required(
    processor: &'static str,
    holder: &dyn DataHolder,
    field: &str,
) -> ProcessorResult<Tag> {
    holder.field(field).ok_or_else(|| {
        ProcessorError::internal(processor, format!("{} has no {field}", holder.holder_type()))
    })
}

/// Narrow to the native short width, rejecting values that do not fit.
pub(crate) fn to_short(key: &Key<i32>, value: i32) -> ProcessorResult<i16> {
    i16::try_from(value).map_err(|_| {
        ProcessorError::rejected(key.id(), format!("{value} does not fit the native field"))
    })
}
