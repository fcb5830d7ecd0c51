//! Processors over flyweight block states.
//!
//! A block trait maps onto one block property. Applicability is decided by
//! the property's presence on the block type, so any registered block with
//! an `age`, `facing` or `axis` property is covered.

use tessel_data::keys::{AXIS, DIRECTION, GROWTH_STAGE};
use tessel_data::{Axis, AxisData, Direction, DirectionalData, GrowthData};
use tessel_holder::{PropertyRange, PropertyValue, StateId, StateTable};
use tessel_processor::{BlockTraitProcessor, ProcessorError, ProcessorResult};
use tessel_types::KeyId;

const AGE: &str = "age";
const FACING: &str = "facing";
const AXIS_PROPERTY: &str = "axis";

/// Log axis value meaning "bark on every side".
const NO_AXIS: &str = "none";

/// Swap one property, turning an out-of-range value into a rejection.
fn swap(
    table: &StateTable,
    state: StateId,
    property: &str,
    value: PropertyValue,
    key: KeyId,
) -> ProcessorResult<StateId> {
    table
        .with_property(state, property, value)
        .map_err(|e| ProcessorError::rejected(key, e.to_string()))
}

/// Crop `age` as growth stage; the maximum is the top of the age range.
pub struct GrowthProcessor;

impl BlockTraitProcessor for GrowthProcessor {
    type Data = GrowthData;

    fn name(&self) -> &'static str {
        "tessel:block_growth"
    }

    fn supports_state(&self, table: &StateTable, state: StateId) -> bool {
        matches!(table.range(state, AGE), Some(PropertyRange::Int { .. }))
    }

    fn from_state(&self, table: &StateTable, state: StateId) -> Option<GrowthData> {
        let age = table.property(state, AGE)?.as_int()?;
        let PropertyRange::Int { max, .. } = table.range(state, AGE)? else {
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
        swap(table, state, AGE, PropertyValue::Int(data.growth()), GROWTH_STAGE.id())
    }
}

/// Block `facing` as a direction. Horizontal-only blocks such as furnaces
/// reject `up` and `down`.
pub struct FacingProcessor;

impl BlockTraitProcessor for FacingProcessor {
    type Data = DirectionalData;

    fn name(&self) -> &'static str {
        "tessel:block_facing"
    }

    fn supports_state(&self, table: &StateTable, state: StateId) -> bool {
        matches!(table.range(state, FACING), Some(PropertyRange::Names(_)))
    }

    fn from_state(&self, table: &StateTable, state: StateId) -> Option<DirectionalData> {
        let facing = table.property(state, FACING)?.as_name()?;
        Direction::from_name(facing).map(DirectionalData::new)
    }

    fn with_data(
        &self,
        table: &StateTable,
        state: StateId,
        data: &DirectionalData,
    ) -> ProcessorResult<StateId> {
        let value = PropertyValue::from(data.direction().as_str());
        swap(table, state, FACING, value, DIRECTION.id())
    }
}

/// Log `axis`. A log with no axis exhibits no axis trait, and removing the
/// trait turns the log into one.
pub struct AxisProcessor;

impl BlockTraitProcessor for AxisProcessor {
    type Data = AxisData;

    fn name(&self) -> &'static str {
        "tessel:block_axis"
    }

    fn supports_state(&self, table: &StateTable, state: StateId) -> bool {
        matches!(table.range(state, AXIS_PROPERTY), Some(PropertyRange::Names(_)))
    }

    fn from_state(&self, table: &StateTable, state: StateId) -> Option<AxisData> {
        let axis = table.property(state, AXIS_PROPERTY)?.as_name()?;
        Axis::from_name(axis).map(AxisData::new)
    }

    fn with_data(
        &self,
        table: &StateTable,
        state: StateId,
        data: &AxisData,
    ) -> ProcessorResult<StateId> {
        let value = PropertyValue::from(data.axis().as_str());
        swap(table, state, AXIS_PROPERTY, value, AXIS.id())
    }

    fn remove_from(&self, table: &StateTable, state: StateId) -> Option<StateId> {
        table
            .with_property(state, AXIS_PROPERTY, PropertyValue::from(NO_AXIS))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_holder::block::{FURNACE, LOG, PISTON, STONE, WHEAT};
    use tessel_holder::{FlyweightStore, InMemoryBlockStore};
    use tessel_transaction::TransactionKind;
    use tessel_types::{BlockPos, DataPriority, WorldId};

    const WORLD: WorldId = WorldId::from_u128(11);

    fn store_with(block: &str) -> (InMemoryBlockStore, BlockPos) {
        let store = InMemoryBlockStore::new(StateTable::standard());
        let pos = BlockPos::new(2, 70, -3);
        store.place(WORLD, pos, block).unwrap();
        (store, pos)
    }

    // -----------------------------------------------------------------------
    // Growth
    // -----------------------------------------------------------------------

    #[test]
    fn wheat_growth_range_comes_from_block() {
        let (store, pos) = store_with(WHEAT);
        let data = GrowthProcessor.get_at(&store, WORLD, pos).unwrap();
        assert_eq!((data.growth(), data.max_growth()), (0, 7));
    }

    #[test]
    fn growth_offer_swaps_flyweight() {
        let (store, pos) = store_with(WHEAT);
        let result = GrowthProcessor
            .offer_at(&store, WORLD, pos, GrowthData::new(7, 7).unwrap(), DataPriority::DataManipulator)
            .unwrap();
        assert!(result.is_successful());
        assert!(GrowthProcessor.get_at(&store, WORLD, pos).unwrap().is_fully_grown());
    }

    #[test]
    fn growth_beyond_block_range_is_rejected() {
        let (store, pos) = store_with(WHEAT);
        let before = store.state_at(WORLD, pos);
        let result = GrowthProcessor
            .offer_at(&store, WORLD, pos, GrowthData::new(9, 9).unwrap(), DataPriority::DataManipulator)
            .unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert_eq!(store.state_at(WORLD, pos), before);
    }

    #[test]
    fn stone_does_not_grow() {
        let (store, pos) = store_with(STONE);
        assert!(GrowthProcessor.get_at(&store, WORLD, pos).is_none());
    }

    // -----------------------------------------------------------------------
    // Facing
    // -----------------------------------------------------------------------

    #[test]
    fn furnace_rejects_vertical_facing() {
        let (store, pos) = store_with(FURNACE);
        let up = DirectionalData::new(Direction::Up);
        let result = FacingProcessor
            .offer_at(&store, WORLD, pos, up, DataPriority::DataManipulator)
            .unwrap();
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(DIRECTION.id()));
    }

    #[test]
    fn piston_accepts_any_facing() {
        let (store, pos) = store_with(PISTON);
        FacingProcessor
            .offer_at(&store, WORLD, pos, DirectionalData::new(Direction::Up), DataPriority::DataManipulator)
            .unwrap();
        let data = FacingProcessor.get_at(&store, WORLD, pos).unwrap();
        assert_eq!(data.direction(), Direction::Up);
        let state = store.state_at(WORLD, pos).unwrap();
        assert_eq!(store.table().property(state, "extended"), Some(&PropertyValue::Bool(false)));
    }

    // -----------------------------------------------------------------------
    // Axis
    // -----------------------------------------------------------------------

    #[test]
    fn log_axis_round_trip_and_remove() {
        let (store, pos) = store_with(LOG);
        assert_eq!(AxisProcessor.get_at(&store, WORLD, pos).unwrap().axis(), Axis::Y);

        AxisProcessor
            .offer_at(&store, WORLD, pos, AxisData::new(Axis::X), DataPriority::DataManipulator)
            .unwrap();
        assert_eq!(AxisProcessor.get_at(&store, WORLD, pos).unwrap().axis(), Axis::X);

        let removed = AxisProcessor.remove_at(&store, WORLD, pos).unwrap();
        assert!(removed.is_successful());
        assert!(AxisProcessor.get_at(&store, WORLD, pos).is_none());
        assert!(AxisProcessor.supports_state(store.table(), store.state_at(WORLD, pos).unwrap()));
    }
}
