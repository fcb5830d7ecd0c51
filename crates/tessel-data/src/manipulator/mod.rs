//! Data manipulators: named bundles of values, one per trait.

mod macros;
mod traits;

mod axis;
mod breathing;
mod colored;
mod directional;
mod display_name;
mod growth;
mod lore;
mod sign;
mod spawner;
mod velocity;

pub use traits::{DataManipulator, ImmutableDataManipulator, TraitType, ValueContainer};

pub use axis::{AxisData, ImmutableAxisData};
pub use breathing::{BreathingData, ImmutableBreathingData, DEFAULT_MAX_AIR};
pub use colored::{ColoredData, ImmutableColoredData};
pub use directional::{DirectionalData, ImmutableDirectionalData};
pub use display_name::{DisplayNameData, ImmutableDisplayNameData};
pub use growth::{GrowthData, ImmutableGrowthData};
pub use lore::{ImmutableLoreData, LoreData};
pub use sign::{ImmutableSignData, SignData};
pub use spawner::{ImmutableMobSpawnerData, MobSpawnerData};
pub use velocity::{ImmutableVelocityData, VelocityData};
