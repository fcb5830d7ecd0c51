//! Foundation types for tessel, the data capability framework.
//!
//! This crate provides the identifiers and serialized forms shared by every
//! other tessel crate. It carries no behavior of its own beyond parsing and
//! path handling.
//!
//! # Key Types
//!
//! - [`Key`] -- Typed, process-wide constant identifier for one property slot
//! - [`KeyDescriptor`] -- Type-erased view of a key (id, shape, path)
//! - [`ValueShape`] -- Whether a key holds a single value, list, set, or map
//! - [`DataQuery`] -- Dotted path into a serialized container
//! - [`DataContainer`] -- Ordered path → value mapping used for persistence
//! - [`DataPriority`] -- Merge precedence token for trait reconciliation
//! - [`WorldId`] / [`BlockPos`] -- Coordinate addressing for flyweight holders

pub mod container;
pub mod error;
pub mod key;
pub mod location;
pub mod priority;
pub mod query;

pub use container::DataContainer;
pub use error::TypeError;
pub use key::{Key, KeyDescriptor, KeyId, ValueShape, ValueType};
pub use location::{BlockPos, WorldId};
pub use priority::DataPriority;
pub use query::DataQuery;
