use std::collections::HashMap;
use std::sync::RwLock;

use tessel_types::{BlockPos, WorldId};

use crate::block::{StateId, StateTable};
use crate::error::{HolderError, HolderResult};

/// Coordinate-addressed accessor/mutator pair for flyweight block states.
///
/// All implementations must satisfy these invariants:
/// - Every stored [`StateId`] is valid in [`table`](FlyweightStore::table).
/// - `set_state` replaces the index at one position and touches nothing else.
pub trait FlyweightStore: Send + Sync {
    /// The shared state table every world indexes into.
    fn table(&self) -> &StateTable;

    /// The state at `pos`, or `None` when no block is placed there.
    fn state_at(&self, world: WorldId, pos: BlockPos) -> Option<StateId>;

    /// Swap in `state` at `pos`, returning the previous state.
    fn set_state(&self, world: WorldId, pos: BlockPos, state: StateId)
        -> HolderResult<Option<StateId>>;
}

/// In-memory, HashMap-based block store over any number of worlds.
///
/// Intended for tests and embedding. Positions are held behind a `RwLock`
/// so the store can be shared across threads.
pub struct InMemoryBlockStore {
    table: StateTable,
    worlds: RwLock<HashMap<WorldId, HashMap<BlockPos, StateId>>>,
}

impl InMemoryBlockStore {
    pub fn new(table: StateTable) -> Self {
        Self {
            table,
            worlds: RwLock::new(HashMap::new()),
        }
    }

    /// Place the default state of `block` at `pos`.
    pub fn place(&self, world: WorldId, pos: BlockPos, block: &str) -> HolderResult<StateId> {
        let state = self.table.default_state(block)?;
        self.set_state(world, pos, state)?;
        Ok(state)
    }

    /// Number of placed blocks across all worlds.
    pub fn len(&self) -> usize {
        self.worlds
            .read()
            .map(|w| w.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every placed position in `world`, sorted.
    pub fn positions(&self, world: WorldId) -> Vec<BlockPos> {
        let mut out: Vec<BlockPos> = self
            .worlds
            .read()
            .ok()
            .and_then(|w| w.get(&world).map(|blocks| blocks.keys().copied().collect()))
            .unwrap_or_default();
        out.sort();
        out
    }
}

impl FlyweightStore for InMemoryBlockStore {
    fn table(&self) -> &StateTable {
        &self.table
    }

    fn state_at(&self, world: WorldId, pos: BlockPos) -> Option<StateId> {
        self.worlds.read().ok()?.get(&world)?.get(&pos).copied()
    }

    fn set_state(
        &self,
        world: WorldId,
        pos: BlockPos,
        state: StateId,
    ) -> HolderResult<Option<StateId>> {
        self.table.state(state)?;
        let mut worlds = self.worlds.write().map_err(|_| HolderError::LockPoisoned)?;
        let previous = worlds.entry(world).or_default().insert(pos, state);
        tracing::trace!(world = %world, pos = %pos, state = %state, "block state swapped");
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{PropertyValue, WHEAT};

    fn store() -> InMemoryBlockStore {
        InMemoryBlockStore::new(StateTable::standard())
    }

    #[test]
    fn empty_position_has_no_state() {
        let s = store();
        assert!(s.state_at(WorldId::from_u128(1), BlockPos::ORIGIN).is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn place_and_swap() {
        let s = store();
        let world = WorldId::from_u128(1);
        let pos = BlockPos::new(4, 64, 4);
        let young = s.place(world, pos, WHEAT).unwrap();
        let grown = s.table().with_property(young, "age", PropertyValue::Int(5)).unwrap();
        let previous = s.set_state(world, pos, grown).unwrap();
        assert_eq!(previous, Some(young));
        assert_eq!(s.state_at(world, pos), Some(grown));
    }

    #[test]
    fn worlds_are_isolated() {
        let s = store();
        let (a, b) = (WorldId::from_u128(1), WorldId::from_u128(2));
        s.place(a, BlockPos::ORIGIN, WHEAT).unwrap();
        assert!(s.state_at(b, BlockPos::ORIGIN).is_none());
        assert_eq!(s.positions(a), vec![BlockPos::ORIGIN]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn rejects_foreign_state_ids() {
        let s = InMemoryBlockStore::new(StateTable::new());
        let other = StateTable::standard();
        let state = other.default_state(WHEAT).unwrap();
        assert!(matches!(
            s.set_state(WorldId::from_u128(1), BlockPos::ORIGIN, state),
            Err(HolderError::UnknownState(_))
        ));
    }
}
