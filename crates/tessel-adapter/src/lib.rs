//! Concrete processors for the reference native model.
//!
//! Each processor maps one trait onto a holder's native storage: entity
//! struct fields, an item's compound tag, a tile entity's fields or a
//! flyweight block property. Merging and priorities stay in
//! `tessel-processor`; the code here only converts fields.
//!
//! # Processors
//!
//! - Entities -- breathing, display name, velocity, fleece color
//! - Items -- lore, display name, leather color
//! - Tile entities -- sign lines, mob spawner
//! - Blocks -- growth stage, facing, axis
//!
//! [`default_facade`] registers all of them, plus a [`TraitValue`] fast
//! path for every key they declare, and seals the result.

pub mod defaults;
pub mod processors;
pub mod value;

pub use defaults::{default_facade, register_defaults};
pub use processors::*;
pub use value::TraitValue;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tessel_data::keys::{
        COLOR, CUSTOM_NAME_VISIBLE, DISPLAY_NAME, ITEM_LORE, MAX_AIR, REMAINING_AIR, SIGN_LINES,
        SPAWNER_MAXIMUM_DELAY, SPAWNER_MINIMUM_DELAY, SPAWNER_REMAINING_DELAY, SPAWNER_SPAWN_COUNT,
        VELOCITY,
    };
    use tessel_data::{
        BreathingData, Color, DirectionalData, Direction, GrowthData, LoreData, MobSpawnerData,
        ValueContainer, Vector3d,
    };
    use tessel_holder::block::{FURNACE, WHEAT};
    use tessel_holder::{
        Entity, EntityKind, FlyweightStore, InMemoryBlockStore, ItemStack, StateTable, TileEntity,
        TileKind,
    };
    use tessel_registry::{DataFacade, KeyVetoHook, ProcessorRegistry, RegistryConfig};
    use tessel_transaction::TransactionKind;
    use tessel_types::{BlockPos, DataPriority, Key, ValueType, WorldId};

    fn facade() -> DataFacade {
        default_facade(RegistryConfig::default()).unwrap()
    }

    /// Offer `value` and check the holder against the result: a success
    /// reads back `value`, anything else leaves the key as it was.
    fn offer_and_read_back<E: ValueType>(
        facade: &DataFacade,
        holder: &mut dyn tessel_holder::DataHolder,
        key: &Key<E>,
        value: E,
    ) -> Result<(), TestCaseError> {
        let before = facade.get(&*holder, key);
        let result = facade.offer(&mut *holder, key, value.clone());
        let after = facade.get(&*holder, key);
        if result.kind() == TransactionKind::Success {
            prop_assert_eq!(after, Some(value), "{}", result);
        } else {
            prop_assert_eq!(after, before, "{}", result);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[test]
    fn defaults_register_every_standard_key() {
        let facade = facade();
        let registry = facade.registry();
        assert!(registry.is_sealed());
        for id in [
            "tessel:remaining_air",
            "tessel:display_name",
            "tessel:color",
            "tessel:item_lore",
            "tessel:sign_lines",
            "tessel:spawner_entities",
        ] {
            assert!(registry.find_key(id).is_some(), "{id} not registered");
        }
        assert_eq!(registry.block_trait_types().len(), 3);
        assert_eq!(registry.value_chain(COLOR.id()).len(), 2);
    }

    #[test]
    fn defaults_cannot_be_registered_twice() {
        let mut registry = ProcessorRegistry::new(RegistryConfig::default());
        register_defaults(&mut registry).unwrap();
        assert!(register_defaults(&mut registry).is_err());
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    #[test]
    fn zombie_air_through_the_facade() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(300));

        let result = facade.offer(&mut zombie, &REMAINING_AIR, 45);
        assert!(result.is_successful());
        assert_eq!(zombie.air(), 45);

        let data: BreathingData = facade.get_data(&zombie).unwrap();
        assert_eq!(data.remaining_air(), 45);
    }

    #[test]
    fn boats_do_not_breathe() {
        let facade = facade();
        let mut boat = Entity::new(EntityKind::Boat);
        assert!(!facade.supports_key(&boat, &REMAINING_AIR));
        assert!(facade.supports_key(&boat, &VELOCITY));
        let result = facade.offer(&mut boat, &REMAINING_AIR, 10);
        assert_eq!(result.kind(), TransactionKind::Failure);
    }

    #[test]
    fn one_key_many_holder_kinds() {
        let facade = facade();
        let red = Color::of(0xB0, 0x2E, 0x26);

        let mut sheep = Entity::new(EntityKind::Sheep);
        assert!(facade.offer(&mut sheep, &COLOR, red).is_successful());
        assert_eq!(sheep.color(), red.rgb() as i32);

        let mut boots = ItemStack::new("minecraft:leather_boots");
        assert!(facade.offer(&mut boots, &COLOR, red).is_successful());
        assert_eq!(facade.get(&boots, &COLOR), Some(red));

        let mut stick = ItemStack::new("minecraft:stick");
        assert_eq!(facade.offer(&mut stick, &COLOR, red).kind(), TransactionKind::Failure);
    }

    #[test]
    fn transaction_names_a_zombie_and_pushes_it() {
        let facade = facade();
        let mut zombie = Entity::new(EntityKind::Zombie);
        let result = {
            let mut tx = facade.transaction(&mut zombie);
            tx.offer(&DISPLAY_NAME, "Grumbles".to_string())
                .offer(&CUSTOM_NAME_VISIBLE, true)
                .offer(&VELOCITY, Vector3d::new(0.0, 0.4, 0.0));
            tx.commit()
        };
        assert!(result.is_successful());
        assert_eq!(result.successful().len(), 3);
        assert_eq!(zombie.custom_name(), Some("Grumbles"));
        assert_eq!(zombie.motion(), [0.0, 0.4, 0.0]);

        let removed = facade.remove_value(&mut zombie, &DISPLAY_NAME);
        assert!(removed.is_successful());
        assert!(zombie.custom_name().is_none());
    }

    #[test]
    fn lower_incoming_max_air_keeps_holder_air() {
        let facade = facade();
        for priority in [DataPriority::PostMerge, DataPriority::DataHolder] {
            let mut zombie = Entity::new(EntityKind::Zombie);
            assert!(facade.offer(&mut zombie, &REMAINING_AIR, 250).is_successful());

            let incoming = BreathingData::new(10, 100).unwrap();
            let result = facade.offer_data_with(&mut zombie, incoming, priority);
            assert_eq!(result.kind(), TransactionKind::Failure, "{priority}");
            assert!(result.is_rejected(REMAINING_AIR.id()));
            assert!(result.is_rejected(MAX_AIR.id()));
            assert_eq!(facade.get(&zombie, &REMAINING_AIR), Some(250));
            assert_eq!(facade.get(&zombie, &MAX_AIR), Some(300));
        }
    }

    #[test]
    fn inspect_lists_only_present_traits() {
        let facade = facade();
        let zombie = Entity::new(EntityKind::Zombie);
        let traits: Vec<_> = facade.inspect(&zombie).into_iter().map(|(t, _)| t).collect();
        assert!(traits.contains(&BreathingData::TRAIT));
        assert!(!traits.contains(&tessel_data::DisplayNameData::TRAIT));
        assert!(!traits.contains(&tessel_data::ColoredData::TRAIT));
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    #[test]
    fn lore_offer_fill_and_remove() {
        let facade = facade();
        let mut sword = ItemStack::new("minecraft:diamond_sword");
        assert!(facade.get_data::<LoreData>(&sword).is_none());

        let result = facade.offer_data(&mut sword, LoreData::new(["Forged in", "the deep"]));
        assert!(result.is_successful());
        assert_eq!(
            facade.get(&sword, &ITEM_LORE),
            Some(vec!["Forged in".to_string(), "the deep".to_string()])
        );

        let filled = facade.fill(&sword, &LoreData::new(["ignored"])).unwrap();
        assert_eq!(filled.lines(), vec!["Forged in", "the deep"]);

        assert!(facade.remove_data::<LoreData>(&mut sword).is_successful());
        assert!(facade.get(&sword, &ITEM_LORE).is_none());
    }

    #[test]
    fn erased_offer_from_json() {
        let facade = facade();
        let mut stick = ItemStack::new("minecraft:stick");
        let key = facade.registry().find_key("tessel:display_name").unwrap();
        let result = facade.offer_json(&mut stick, key, json!("Pointy"));
        assert!(result.is_successful());
        assert_eq!(facade.get(&stick, &DISPLAY_NAME).as_deref(), Some("Pointy"));

        let result = facade.offer_json(&mut stick, key, json!(12));
        assert_eq!(result.kind(), TransactionKind::Failure);
    }

    // -----------------------------------------------------------------------
    // Tile entities
    // -----------------------------------------------------------------------

    #[test]
    fn sign_lines_through_the_facade() {
        let facade = facade();
        let mut sign = TileEntity::new(TileKind::Sign, BlockPos::ORIGIN);
        let lines = ["Keep".to_string(), "Out".to_string(), String::new(), String::new()];
        assert!(facade.offer(&mut sign, &SIGN_LINES, lines.clone()).is_successful());
        assert_eq!(facade.get(&sign, &SIGN_LINES), Some(lines));
    }

    #[test]
    fn spawner_keys_honor_delay_bounds() {
        let facade = facade();
        let mut spawner = TileEntity::new(TileKind::MobSpawner, BlockPos::new(0, 12, 0));
        assert!(facade.offer(&mut spawner, &SPAWNER_SPAWN_COUNT, 6).is_successful());
        assert_eq!(facade.get(&spawner, &SPAWNER_SPAWN_COUNT), Some(6));

        // A minimum above the maximum (800) would be clamped, so it is refused.
        let result = facade.offer(&mut spawner, &SPAWNER_MINIMUM_DELAY, 900);
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(result.is_rejected(SPAWNER_MINIMUM_DELAY.id()));
        let data: MobSpawnerData = facade.get_data(&spawner).unwrap();
        assert_eq!(data.minimum_delay(), 200);

        assert!(facade.offer(&mut spawner, &SPAWNER_MINIMUM_DELAY, 800).is_successful());
        let result = facade.offer(&mut spawner, &SPAWNER_MINIMUM_DELAY, -1);
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert_eq!(facade.get(&spawner, &SPAWNER_MINIMUM_DELAY), Some(800));
    }

    #[test]
    fn spawner_merge_keeps_holder_delay_bounds() {
        let facade = facade();
        let mut incoming = MobSpawnerData::default();
        incoming
            .set_minimum_delay(100)
            .unwrap()
            .set_maximum_delay(150)
            .unwrap()
            .set_remaining_delay(120)
            .unwrap();

        for priority in [DataPriority::PostMerge, DataPriority::DataHolder] {
            let mut spawner = TileEntity::new(TileKind::MobSpawner, BlockPos::new(0, 12, 0));
            let result = facade.offer_data_with(&mut spawner, incoming.clone(), priority);
            assert!(result.is_rejected(SPAWNER_MINIMUM_DELAY.id()), "{priority}");
            assert!(result.is_rejected(SPAWNER_MAXIMUM_DELAY.id()));
            assert_eq!(facade.get(&spawner, &SPAWNER_MINIMUM_DELAY), Some(200));
            assert_eq!(facade.get(&spawner, &SPAWNER_MAXIMUM_DELAY), Some(800));
        }

        let mut spawner = TileEntity::new(TileKind::MobSpawner, BlockPos::new(0, 12, 0));
        let result = facade.offer_data_with(&mut spawner, incoming, DataPriority::DataManipulator);
        assert!(result.is_successful());
        assert_eq!(facade.get(&spawner, &SPAWNER_MAXIMUM_DELAY), Some(150));
        assert_eq!(facade.get(&spawner, &SPAWNER_REMAINING_DELAY), Some(120));
    }

    #[test]
    fn hooks_veto_default_processors() {
        let mut registry = ProcessorRegistry::new(RegistryConfig::default());
        register_defaults(&mut registry).unwrap();
        registry.add_hook(KeyVetoHook::new([SIGN_LINES.id()])).unwrap();
        let facade = DataFacade::new(registry);

        let mut sign = TileEntity::new(TileKind::Sign, BlockPos::ORIGIN);
        let lines = ["No".to_string(), String::new(), String::new(), String::new()];
        let result = facade.offer(&mut sign, &SIGN_LINES, lines);
        assert_eq!(result.kind(), TransactionKind::Cancelled);
        assert_eq!(facade.get(&sign, &SIGN_LINES), Some(Default::default()));
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    #[test]
    fn block_traits_swap_flyweight_states() {
        let facade = facade();
        let world = WorldId::from_u128(3);
        let store = InMemoryBlockStore::new(StateTable::standard());
        let (crop, oven) = (BlockPos::new(1, 64, 1), BlockPos::new(2, 64, 1));
        store.place(world, crop, WHEAT).unwrap();
        store.place(world, oven, FURNACE).unwrap();

        let young = store.state_at(world, crop);
        let result = facade.offer_block_data(
            &store,
            world,
            crop,
            GrowthData::new(4, 7).unwrap(),
            DataPriority::DataManipulator,
        );
        assert!(result.is_successful());
        assert_ne!(store.state_at(world, crop), young);
        let growth: GrowthData = facade.get_block_data(&store, world, crop).unwrap();
        assert_eq!(growth.growth(), 4);

        let up = DirectionalData::new(Direction::Up);
        let result = facade.offer_block_data(&store, world, oven, up, DataPriority::DataManipulator);
        assert_eq!(result.kind(), TransactionKind::Failure);
        assert!(facade.get_block_data::<GrowthData>(&store, world, oven).is_none());
    }

    // -----------------------------------------------------------------------
    // Offer and read back
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn entity_offers_read_back(air in -50i32..400, max in -50i32..600, name in "[A-Za-z]{1,8}") {
            let facade = facade();
            let mut zombie = Entity::new(EntityKind::Zombie);
            offer_and_read_back(&facade, &mut zombie, &REMAINING_AIR, air)?;
            offer_and_read_back(&facade, &mut zombie, &MAX_AIR, max)?;
            offer_and_read_back(&facade, &mut zombie, &REMAINING_AIR, air)?;
            offer_and_read_back(&facade, &mut zombie, &DISPLAY_NAME, name)?;
        }

        #[test]
        fn spawner_offers_read_back(
            delays in proptest::collection::vec(-50i16..1000, 3),
            count in -5i16..20,
        ) {
            let facade = facade();
            let mut spawner = TileEntity::new(TileKind::MobSpawner, BlockPos::ORIGIN);
            offer_and_read_back(&facade, &mut spawner, &SPAWNER_MINIMUM_DELAY, delays[0])?;
            offer_and_read_back(&facade, &mut spawner, &SPAWNER_MAXIMUM_DELAY, delays[1])?;
            offer_and_read_back(&facade, &mut spawner, &SPAWNER_REMAINING_DELAY, delays[2])?;
            offer_and_read_back(&facade, &mut spawner, &SPAWNER_SPAWN_COUNT, count)?;
        }

        #[test]
        fn item_offers_read_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let facade = facade();
            let color = Color::of(r, g, b);
            let mut boots = ItemStack::new("minecraft:leather_boots");
            offer_and_read_back(&facade, &mut boots, &COLOR, color)?;
            let mut stick = ItemStack::new("minecraft:stick");
            offer_and_read_back(&facade, &mut stick, &COLOR, color)?;
        }
    }
}
