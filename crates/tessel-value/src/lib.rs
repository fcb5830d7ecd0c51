//! Value model for tessel.
//!
//! A value is a handle bound to exactly one [`Key`](tessel_types::Key): it
//! carries a default that never changes and an optional actual value.
//! `exists()` reports whether an actual value is present.
//!
//! # Value Types
//!
//! - [`Value`] / [`ImmutableValue`] -- scalar handles (in-place vs copy-on-write)
//! - [`BoundedValue`] / [`ImmutableBoundedValue`] -- values limited to `[min, max]`
//! - [`ListValue`], [`SetValue`], [`MapValue`] and their immutable forms --
//!   element-level operations over an owned collection
//! - [`AnyValue`] -- type-erased immutable value used at registry seams
//!
//! # Design Rules
//!
//! 1. Immutable operations never change the receiver.
//! 2. Collection values never share storage with their inputs or outputs.
//! 3. Bounded values refuse out-of-range writes and keep their old state.

pub mod any;
pub mod bounded;
pub mod collection;
pub mod error;
pub mod value;

pub use any::AnyValue;
pub use bounded::{BoundedValue, ImmutableBoundedValue};
pub use collection::{
    CollectionValue, ImmutableListValue, ImmutableMapValue, ImmutableSetValue, ListValue,
    MapValue, SetValue,
};
pub use error::{ValueError, ValueResult};
pub use value::{ImmutableValue, Value};
