//! The standard key catalog.
//!
//! Key ids and paths are part of the persisted contract; renaming either
//! breaks previously serialized containers.

use tessel_types::Key;

use crate::types::{Axis, Color, Direction, Vector3d, WeightedEntity};

pub const COLOR: Key<Color> = Key::single("tessel:color", "Color");

pub const ITEM_LORE: Key<Vec<String>> = Key::list("tessel:item_lore", "Lore");

pub const DISPLAY_NAME: Key<String> = Key::single("tessel:display_name", "DisplayName");
pub const CUSTOM_NAME_VISIBLE: Key<bool> =
    Key::single("tessel:custom_name_visible", "CustomNameVisible");

pub const REMAINING_AIR: Key<i32> = Key::single("tessel:remaining_air", "RemainingAir");
pub const MAX_AIR: Key<i32> = Key::single("tessel:max_air", "MaxAir");

pub const VELOCITY: Key<Vector3d> = Key::single("tessel:velocity", "Velocity");

pub const SIGN_LINES: Key<[String; 4]> = Key::single("tessel:sign_lines", "Lines");

pub const SPAWNER_REMAINING_DELAY: Key<i16> = Key::single("tessel:spawner_remaining_delay", "Delay");
pub const SPAWNER_MINIMUM_DELAY: Key<i16> = Key::single("tessel:spawner_minimum_delay", "MinDelay");
pub const SPAWNER_MAXIMUM_DELAY: Key<i16> = Key::single("tessel:spawner_maximum_delay", "MaxDelay");
pub const SPAWNER_SPAWN_COUNT: Key<i16> = Key::single("tessel:spawner_spawn_count", "Count");
pub const SPAWNER_MAXIMUM_NEARBY_ENTITIES: Key<i16> =
    Key::single("tessel:spawner_maximum_nearby_entities", "MaxEntities");
pub const SPAWNER_REQUIRED_PLAYER_RANGE: Key<i16> =
    Key::single("tessel:spawner_required_player_range", "PlayerRange");
pub const SPAWNER_SPAWN_RANGE: Key<i16> = Key::single("tessel:spawner_spawn_range", "SpawnRange");
pub const SPAWNER_ENTITIES: Key<Vec<WeightedEntity>> = Key::list("tessel:spawner_entities", "Entities");

pub const GROWTH_STAGE: Key<i32> = Key::single("tessel:growth_stage", "Growth");

pub const DIRECTION: Key<Direction> = Key::single("tessel:direction", "Direction");

pub const AXIS: Key<Axis> = Key::single("tessel:axis", "Axis");
