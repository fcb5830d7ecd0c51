//! Processor registry and holder facade for tessel.
//!
//! Processors are registered into a [`ProcessorRegistry`] during setup:
//!
//! - value processors, chained per key
//! - trait processors, chained per trait type
//! - block trait processors, chained per trait type
//!
//! Within a chain the first processor that supports the target answers.
//! Wrapping the registry in a [`DataFacade`] seals it; from then on the
//! facade is the single read/write entry point and every failure is
//! reported through a `DataTransactionResult`.
//!
//! [`OfferHook`]s can veto a write before any processor runs.

pub mod config;
pub mod error;
pub mod facade;
pub mod hooks;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use facade::{DataFacade, Transaction};
pub use hooks::{HookDecision, KeyVetoHook, NoOpHook, OfferHook, OfferTarget};
pub use registry::ProcessorRegistry;
