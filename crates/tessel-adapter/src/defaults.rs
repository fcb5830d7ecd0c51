use tessel_data::keys::{
    COLOR, CUSTOM_NAME_VISIBLE, DISPLAY_NAME, ITEM_LORE, MAX_AIR, REMAINING_AIR, SIGN_LINES,
    SPAWNER_ENTITIES, SPAWNER_MAXIMUM_DELAY, SPAWNER_MAXIMUM_NEARBY_ENTITIES,
    SPAWNER_MINIMUM_DELAY, SPAWNER_REMAINING_DELAY, SPAWNER_REQUIRED_PLAYER_RANGE,
    SPAWNER_SPAWN_COUNT, SPAWNER_SPAWN_RANGE, VELOCITY,
};
use tessel_processor::TraitProcessor;
use tessel_registry::{DataFacade, ProcessorRegistry, RegistryConfig, RegistryError, RegistryResult};
use tessel_types::{Key, ValueType};

use crate::processors::{
    AxisProcessor, BreathingProcessor, EntityColorProcessor, EntityDisplayNameProcessor,
    FacingProcessor, GrowthProcessor, ItemDisplayNameProcessor, LeatherColorProcessor,
    LoreProcessor, MobSpawnerProcessor, SignProcessor, VelocityProcessor,
};
use crate::value::TraitValue;

fn value<P: TraitProcessor, E: ValueType>(
    name: &'static str,
    key: Key<E>,
    processor: P,
) -> RegistryResult<TraitValue<P, E>> {
    TraitValue::new(name, key, processor).ok_or_else(|| {
        RegistryError::Config(format!("{name}: backing trait does not declare {}", key.id()))
    })
}

/// Register every built-in processor.
///
/// Chains that serve several holder kinds (display name, color) hold one
/// processor per kind; their `supports` checks are disjoint, so chain
/// order does not change which one answers.
pub fn register_defaults(registry: &mut ProcessorRegistry) -> RegistryResult<()> {
    // Entities
    registry.register_trait(BreathingProcessor)?;
    registry.register_trait(EntityDisplayNameProcessor)?;
    registry.register_trait(VelocityProcessor)?;
    registry.register_trait(EntityColorProcessor)?;
    registry.register_value(value("tessel:entity_remaining_air", REMAINING_AIR, BreathingProcessor)?)?;
    registry.register_value(value("tessel:entity_max_air", MAX_AIR, BreathingProcessor)?)?;
    registry.register_value(
        value("tessel:entity_display_name", DISPLAY_NAME, EntityDisplayNameProcessor)?.removable(),
    )?;
    registry.register_value(value(
        "tessel:entity_custom_name_visible",
        CUSTOM_NAME_VISIBLE,
        EntityDisplayNameProcessor,
    )?)?;
    registry.register_value(value("tessel:entity_velocity", VELOCITY, VelocityProcessor)?)?;
    registry.register_value(value("tessel:entity_color", COLOR, EntityColorProcessor)?)?;

    // Items
    registry.register_trait(LoreProcessor)?;
    registry.register_trait(ItemDisplayNameProcessor)?;
    registry.register_trait(LeatherColorProcessor)?;
    registry.register_value(value("tessel:item_lore", ITEM_LORE, LoreProcessor)?.removable())?;
    registry.register_value(
        value("tessel:item_display_name", DISPLAY_NAME, ItemDisplayNameProcessor)?.removable(),
    )?;
    registry.register_value(value("tessel:leather_color", COLOR, LeatherColorProcessor)?.removable())?;

    // Tile entities
    registry.register_trait(SignProcessor)?;
    registry.register_trait(MobSpawnerProcessor)?;
    registry.register_value(value("tessel:sign_lines", SIGN_LINES, SignProcessor)?)?;
    let spawner_keys = [
        ("tessel:spawner_remaining_delay", SPAWNER_REMAINING_DELAY),
        ("tessel:spawner_minimum_delay", SPAWNER_MINIMUM_DELAY),
        ("tessel:spawner_maximum_delay", SPAWNER_MAXIMUM_DELAY),
        ("tessel:spawner_spawn_count", SPAWNER_SPAWN_COUNT),
        ("tessel:spawner_maximum_nearby_entities", SPAWNER_MAXIMUM_NEARBY_ENTITIES),
        ("tessel:spawner_required_player_range", SPAWNER_REQUIRED_PLAYER_RANGE),
        ("tessel:spawner_spawn_range", SPAWNER_SPAWN_RANGE),
    ];
    for (name, key) in spawner_keys {
        registry.register_value(value(name, key, MobSpawnerProcessor)?)?;
    }
    registry.register_value(value("tessel:spawner_entities", SPAWNER_ENTITIES, MobSpawnerProcessor)?)?;

    // Flyweight blocks
    registry.register_block(GrowthProcessor)?;
    registry.register_block(FacingProcessor)?;
    registry.register_block(AxisProcessor)?;

    tracing::debug!(keys = registry.keys().len(), "default processors registered");
    Ok(())
}

/// A sealed facade over the default processors.
pub fn default_facade(config: RegistryConfig) -> RegistryResult<DataFacade> {
    let mut registry = ProcessorRegistry::new(config);
    register_defaults(&mut registry)?;
    Ok(DataFacade::new(registry))
}
