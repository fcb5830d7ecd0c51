use std::fmt;

use crate::capability::{Capability, CapabilitySet};
use crate::error::HolderResult;
use crate::tag::{Tag, TagCompound};

/// Per-instance native object the framework reads and writes through.
///
/// Implementations expose raw fields by native name and, where the object
/// persists extra state, a tag compound. The framework never downcasts a
/// holder; processors decide applicability from [`capabilities`].
///
/// [`capabilities`]: DataHolder::capabilities
pub trait DataHolder: fmt::Debug + Send {
    /// Native type identifier, e.g. `"minecraft:sheep"`.
    fn holder_type(&self) -> &str;

    fn capabilities(&self) -> CapabilitySet;

    fn has(&self, cap: Capability) -> bool {
        self.capabilities().contains(cap)
    }

    /// Read a raw field. `None` when the holder has no such field or the
    /// field is unset.
    fn field(&self, name: &str) -> Option<Tag>;

    /// Write a raw field.
    fn set_field(&mut self, name: &str, value: Tag) -> HolderResult<()>;

    /// Clear an optional raw field. Returns whether a value was present.
    fn clear_field(&mut self, name: &str) -> HolderResult<bool>;

    /// Persisted tag storage, if the holder has any.
    fn tag(&self) -> Option<&TagCompound> {
        None
    }

    /// Mutable tag storage, created on first access where supported.
    fn tag_mut(&mut self) -> Option<&mut TagCompound> {
        None
    }
}

/// Decode a tag with `read`, or fail with a type mismatch naming `field`.
pub(crate) fn expect_tag<T>(
    field: &str,
    expected: &'static str,
    tag: &Tag,
    read: impl FnOnce(&Tag) -> Option<T>,
) -> HolderResult<T> {
    read(tag).ok_or_else(|| crate::error::HolderError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: tag.type_name(),
    })
}
