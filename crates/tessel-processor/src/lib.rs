//! Processor strategies for tessel.
//!
//! Processors are stateless strategies that translate between the
//! framework's keys and traits and a holder's native storage. A registry
//! keeps them in ordered chains; the first processor whose `supports`
//! claims the holder handles the request.
//!
//! # Processor Kinds
//!
//! - [`ValueProcessor`] -- fast path for a single key on a per-instance holder
//! - [`TraitProcessor`] -- whole-trait path on a per-instance holder
//! - [`BlockTraitProcessor`] -- whole-trait path on a flyweight block state
//!
//! Each kind has an erased form ([`ErasedValueProcessor`],
//! [`ErasedTraitProcessor`], [`ErasedBlockProcessor`]) implemented by a
//! handle type, so chains of differently typed processors can live side
//! by side.
//!
//! # Merge
//!
//! [`merge`](merge::merge) is the single definition of the priority policy.
//! Concrete processors only map native fields to keys.

pub mod block;
pub mod data;
pub mod error;
pub mod merge;
pub mod value;

pub use block::{BlockHandle, BlockTraitProcessor, ErasedBlockProcessor};
pub use data::{reject_all, ErasedTraitProcessor, TraitHandle, TraitProcessor};
pub use error::{ProcessorError, ProcessorResult};
pub use merge::{merge, Merged};
pub use value::{check_range, ErasedValueProcessor, ValueHandle, ValueProcessor};
