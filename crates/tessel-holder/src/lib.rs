//! Native backing-store adapter interface for tessel.
//!
//! The framework never touches native objects directly. It goes through
//! the interfaces in this crate:
//!
//! - [`DataHolder`] -- per-instance holders exposing raw fields, an
//!   optional tag compound, and a [`CapabilitySet`]
//! - [`FlyweightStore`] -- `(world, position) -> state` accessor/mutator
//!   pair for coordinate-addressed block states
//!
//! # Reference Model
//!
//! An in-memory native model is included so the framework can be driven
//! end to end:
//!
//! - [`Entity`] -- entities with struct fields (air, name, motion, color)
//! - [`ItemStack`] -- items with an optional tag compound
//! - [`TileEntity`] -- signs and mob spawners persisted as tags
//! - [`StateTable`] / [`InMemoryBlockStore`] -- interned block states
//!   placed in worlds

pub mod block;
pub mod capability;
pub mod entity;
pub mod error;
pub mod holder;
pub mod item;
pub mod store;
pub mod tag;
pub mod tile;

pub use block::{BlockState, BlockType, PropertyRange, PropertyValue, StateId, StateTable};
pub use capability::{Capability, CapabilitySet};
pub use entity::{Entity, EntityKind};
pub use error::{HolderError, HolderResult};
pub use holder::DataHolder;
pub use item::ItemStack;
pub use store::{FlyweightStore, InMemoryBlockStore};
pub use tag::{Tag, TagCompound};
pub use tile::{TileEntity, TileKind};
