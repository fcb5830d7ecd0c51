//! Trait model for tessel.
//!
//! A trait (data manipulator) is a named bundle of values describing one
//! aspect of a game object: its color, its lore, how long it can stay
//! under water. Each trait comes as a mutable/immutable pair sharing one
//! field layout.
//!
//! # Key Types
//!
//! - [`ValueContainer`] -- Read access over a trait's declared keys
//! - [`DataManipulator`] -- Mutable trait: `set`, `transform`, `copy`, `from_container`
//! - [`ImmutableDataManipulator`] -- Copy-on-write trait: `with`, `as_mutable`
//! - [`TraitType`] -- Stable identifier of a trait type
//! - [`keys`] -- The standard key catalog
//!
//! # Design Rules
//!
//! 1. Only declared keys are answered; foreign keys yield `None`, never an error.
//! 2. Equality and ordering compare current values, so `from_container(to_container(t)) == t`.
//! 3. A rejected write leaves the trait unchanged.

pub mod error;
pub mod keys;
pub mod manipulator;
pub mod types;

pub use error::{DataError, DataResult};
pub use manipulator::{
    AxisData, BreathingData, ColoredData, DataManipulator, DirectionalData, DisplayNameData,
    GrowthData, ImmutableAxisData, ImmutableBreathingData, ImmutableColoredData,
    ImmutableDataManipulator, ImmutableDirectionalData, ImmutableDisplayNameData,
    ImmutableGrowthData, ImmutableLoreData, ImmutableMobSpawnerData, ImmutableSignData,
    ImmutableVelocityData, LoreData, MobSpawnerData, SignData, TraitType, ValueContainer,
    VelocityData,
};
pub use types::{Axis, Color, Direction, Vector3d, WeightedEntity};
