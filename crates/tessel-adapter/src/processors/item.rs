//! Processors over an item's tag compound.
//!
//! Item state lives under the `display` compound (`Lore`, `Name`, `color`),
//! except written books, whose name is the root `title`.

use tessel_data::{Color, ColoredData, DisplayNameData, LoreData};
use tessel_holder::{Capability, DataHolder, Tag, TagCompound};
use tessel_processor::{ProcessorError, ProcessorResult, TraitProcessor};

const WRITTEN_BOOK: &str = tessel_holder::item::WRITTEN_BOOK;

fn is_item(holder: &dyn DataHolder) -> bool {
    holder.has(Capability::ItemTag)
}

fn display(holder: &dyn DataHolder) -> Option<&TagCompound> {
    holder.tag()?.compound("display")
}

fn display_mut<'a>(
    processor: &'static str,
    holder: &'a mut dyn DataHolder,
) -> ProcessorResult<&'a mut TagCompound> {
    holder
        .tag_mut()
        .and_then(|t| t.compound_mut("display"))
        .ok_or_else(|| ProcessorError::internal(processor, "display is not a compound"))
}

/// Remove `field` from the display compound, if there is one.
fn clear_display(holder: &mut dyn DataHolder, field: &str) -> bool {
    if display(holder).is_none() {
        return false;
    }
    holder
        .tag_mut()
        .and_then(|t| t.compound_mut("display"))
        .and_then(|d| d.remove(field))
        .is_some()
}

/// `display.Lore` as a list of strings.
pub struct LoreProcessor;

impl TraitProcessor for LoreProcessor {
    type Data = LoreData;

    fn name(&self) -> &'static str {
        "tessel:item_lore"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_item(holder)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<LoreData>> {
        let Some(lore) = display(holder).and_then(|d| d.get("Lore")) else {
            return Ok(None);
        };
        let lines: Option<Vec<&str>> = lore
            .as_list()
            .and_then(|items| items.iter().map(Tag::as_str).collect());
        match lines {
            Some(lines) => Ok(Some(LoreData::new(lines))),
            None => Err(ProcessorError::internal(self.name(), "Lore is not a list of strings")),
        }
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &LoreData) -> ProcessorResult<()> {
        display_mut(self.name(), holder)?.insert("Lore", Tag::string_list(data.lines()));
        Ok(())
    }

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(clear_display(holder, "Lore"))
    }
}

/// `display.Name`, or the root `title` of a written book. Item names are
/// always shown.
pub struct ItemDisplayNameProcessor;

impl TraitProcessor for ItemDisplayNameProcessor {
    type Data = DisplayNameData;

    fn name(&self) -> &'static str {
        "tessel:item_display_name"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_item(holder)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<DisplayNameData>> {
        let name = if holder.holder_type() == WRITTEN_BOOK {
            holder.tag().and_then(|t| t.get("title"))
        } else {
            display(holder).and_then(|d| d.get("Name"))
        };
        let Some(name) = name else {
            return Ok(None);
        };
        match name.as_str() {
            Some(name) => Ok(Some(DisplayNameData::new(name, true))),
            None => Err(ProcessorError::internal(self.name(), "item name is not a string")),
        }
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &DisplayNameData) -> ProcessorResult<()> {
        if holder.holder_type() == WRITTEN_BOOK {
            let tag = holder
                .tag_mut()
                .ok_or_else(|| ProcessorError::internal(self.name(), "item has no tag storage"))?;
            tag.insert("title", data.name());
        } else {
            display_mut(self.name(), holder)?.insert("Name", data.name());
        }
        Ok(())
    }

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        if holder.holder_type() == WRITTEN_BOOK {
            if holder.tag().is_none() {
                return Ok(false);
            }
            return Ok(holder
                .tag_mut()
                .and_then(|t| t.remove("title"))
                .is_some());
        }
        Ok(clear_display(holder, "Name"))
    }
}

/// `display.color` of dyeable leather.
pub struct LeatherColorProcessor;

impl TraitProcessor for LeatherColorProcessor {
    type Data = ColoredData;

    fn name(&self) -> &'static str {
        "tessel:leather_color"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_item(holder) && holder.has(Capability::Colorable)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<ColoredData>> {
        let Some(color) = display(holder).and_then(|d| d.get("color")) else {
            return Ok(None);
        };
        let rgb = color
            .as_i32()
            .ok_or_else(|| ProcessorError::internal(self.name(), "color is not an integer"))?;
        Ok(Some(ColoredData::new(Color::from_rgb(rgb as u32))))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &ColoredData) -> ProcessorResult<()> {
        display_mut(self.name(), holder)?.insert("color", Tag::Int(data.color().rgb() as i32));
        Ok(())
    }

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(clear_display(holder, "color"))
    }
}
