//! Processors over entity struct fields.
//!
//! Entities are the holders that move; every processor here checks
//! [`Capability::Moving`] alongside the capability its trait needs, so
//! items sharing a capability (a nameable stack, a dyed boot) fall through
//! to the item processors.

use tessel_data::keys::{MAX_AIR, REMAINING_AIR};
use tessel_data::{BreathingData, Color, ColoredData, DisplayNameData, Vector3d, VelocityData};
use tessel_holder::{Capability, DataHolder, Tag};
use tessel_processor::{ProcessorError, ProcessorResult, TraitProcessor};

use super::{required, to_short};

fn is_entity(holder: &dyn DataHolder) -> bool {
    holder.has(Capability::Moving)
}

/// `Air` and `MaxAir` on breathing entities.
pub struct BreathingProcessor;

impl TraitProcessor for BreathingProcessor {
    type Data = BreathingData;

    fn name(&self) -> &'static str {
        "tessel:entity_breathing"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_entity(holder) && holder.has(Capability::Breathing)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<BreathingData>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let air = required(self.name(), holder, "Air")?.as_i32();
        let max = required(self.name(), holder, "MaxAir")?.as_i32();
        match (air, max) {
            (Some(air), Some(max)) => Ok(Some(BreathingData::new(air, max)?)),
            _ => Err(ProcessorError::internal(self.name(), "air fields are not integers")),
        }
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &BreathingData) -> ProcessorResult<()> {
        let max = to_short(&MAX_AIR, data.max_air())?;
        let air = to_short(&REMAINING_AIR, data.remaining_air())?;
        holder.set_field("MaxAir", Tag::Short(max))?;
        holder.set_field("Air", Tag::Short(air))?;
        Ok(())
    }

    /// Breathing is intrinsic to the entity.
    fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }
}

/// `CustomName` and `CustomNameVisible`. An entity without a custom name
/// has no display name trait.
pub struct EntityDisplayNameProcessor;

impl TraitProcessor for EntityDisplayNameProcessor {
    type Data = DisplayNameData;

    fn name(&self) -> &'static str {
        "tessel:entity_display_name"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_entity(holder) && holder.has(Capability::Nameable)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<DisplayNameData>> {
        let Some(name) = holder.field("CustomName") else {
            return Ok(None);
        };
        let Some(name) = name.as_str() else {
            return Err(ProcessorError::internal(self.name(), "CustomName is not a string"));
        };
        let visible = holder
            .field("CustomNameVisible")
            .and_then(|t| t.as_bool())
            .unwrap_or(false);
        Ok(Some(DisplayNameData::new(name, visible)))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &DisplayNameData) -> ProcessorResult<()> {
        holder.set_field("CustomName", Tag::from(data.name()))?;
        holder.set_field("CustomNameVisible", Tag::from(data.is_visible()))?;
        Ok(())
    }

    fn remove(&self, holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(holder.clear_field("CustomName")?)
    }
}

/// `Motion` as a velocity vector.
pub struct VelocityProcessor;

impl TraitProcessor for VelocityProcessor {
    type Data = VelocityData;

    fn name(&self) -> &'static str {
        "tessel:entity_velocity"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_entity(holder)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<VelocityData>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let motion = required(self.name(), holder, "Motion")?;
        let components: Option<Vec<f64>> = motion
            .as_list()
            .and_then(|items| items.iter().map(Tag::as_f64).collect());
        match components.as_deref() {
            Some(&[x, y, z]) => Ok(Some(VelocityData::new(Vector3d::new(x, y, z)))),
            _ => Err(ProcessorError::internal(self.name(), "Motion is not three doubles")),
        }
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &VelocityData) -> ProcessorResult<()> {
        let v = data.velocity();
        let motion = Tag::List(vec![Tag::Double(v.x), Tag::Double(v.y), Tag::Double(v.z)]);
        holder.set_field("Motion", motion)?;
        Ok(())
    }

    fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }
}

/// Fleece `Color` of colorable entities.
pub struct EntityColorProcessor;

impl TraitProcessor for EntityColorProcessor {
    type Data = ColoredData;

    fn name(&self) -> &'static str {
        "tessel:entity_color"
    }

    fn supports(&self, holder: &dyn DataHolder) -> bool {
        is_entity(holder) && holder.has(Capability::Colorable)
    }

    fn read(&self, holder: &dyn DataHolder) -> ProcessorResult<Option<ColoredData>> {
        if !self.supports(holder) {
            return Ok(None);
        }
        let rgb = required(self.name(), holder, "Color")?
            .as_i32()
            .ok_or_else(|| ProcessorError::internal(self.name(), "Color is not an integer"))?;
        Ok(Some(ColoredData::new(Color::from_rgb(rgb as u32))))
    }

    fn write(&self, holder: &mut dyn DataHolder, data: &ColoredData) -> ProcessorResult<()> {
        holder.set_field("Color", Tag::Int(data.color().rgb() as i32))?;
        Ok(())
    }

    fn remove(&self, _holder: &mut dyn DataHolder) -> ProcessorResult<bool> {
        Ok(false)
    }
}
