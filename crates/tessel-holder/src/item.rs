use crate::capability::{Capability, CapabilitySet};
use crate::error::{HolderError, HolderResult};
use crate::holder::{expect_tag, DataHolder};
use crate::tag::{Tag, TagCompound};

pub const WRITTEN_BOOK: &str = "minecraft:written_book";

/// An item stack: an item type, a count, and an optional tag compound.
///
/// Display data lives in the tag under `display` (`Name`, `Lore`,
/// `color`); written books keep their title in a top-level `title` tag.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    item_type: String,
    count: i8,
    tag: Option<TagCompound>,
}

impl ItemStack {
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            count: 1,
            tag: None,
        }
    }

    pub fn with_count(mut self, count: i8) -> Self {
        self.count = count;
        self
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn count(&self) -> i8 {
        self.count
    }

    pub fn has_tag(&self) -> bool {
        self.tag.is_some()
    }

    pub fn is_written_book(&self) -> bool {
        self.item_type == WRITTEN_BOOK
    }

    /// Dyeable leather armor exposes a color.
    pub fn is_dyeable(&self) -> bool {
        self.item_type.starts_with("minecraft:leather_")
    }

    /// The `display` sub-compound, if present.
    pub fn display(&self) -> Option<&TagCompound> {
        self.tag.as_ref()?.compound("display")
    }

    /// The `display` sub-compound, created along with the tag when missing.
    pub fn display_mut(&mut self) -> HolderResult<&mut TagCompound> {
        self.tag
            .get_or_insert_with(TagCompound::new)
            .compound_mut("display")
            .ok_or_else(|| HolderError::TypeMismatch {
                field: "display".to_string(),
                expected: "compound",
                found: "other",
            })
    }
}

impl DataHolder for ItemStack {
    fn holder_type(&self) -> &str {
        &self.item_type
    }

    fn capabilities(&self) -> CapabilitySet {
        let mut caps = CapabilitySet::of([Capability::ItemTag, Capability::Nameable]);
        if self.is_dyeable() {
            caps.insert(Capability::Colorable);
        }
        caps
    }

    fn field(&self, name: &str) -> Option<Tag> {
        match name {
            "Count" => Some(Tag::Byte(self.count)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Tag) -> HolderResult<()> {
        match name {
            "Count" => {
                self.count = expect_tag(name, "byte", &value, |t| {
                    t.as_i32().and_then(|v| i8::try_from(v).ok())
                })?;
                Ok(())
            }
            _ => Err(HolderError::UnsupportedField {
                holder: self.item_type.clone(),
                field: name.to_string(),
            }),
        }
    }

    fn clear_field(&mut self, name: &str) -> HolderResult<bool> {
        match name {
            "Count" => Err(HolderError::RequiredField {
                field: name.to_string(),
            }),
            _ => Err(HolderError::UnsupportedField {
                holder: self.item_type.clone(),
                field: name.to_string(),
            }),
        }
    }

    fn tag(&self) -> Option<&TagCompound> {
        self.tag.as_ref()
    }

    fn tag_mut(&mut self) -> Option<&mut TagCompound> {
        Some(self.tag.get_or_insert_with(TagCompound::new))
    }
}
