//! V704: block entities get namespaced ids

use super::hooks::{self, IdTable};
use super::v99::{item_stack, ITEM_ENTITIES};
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::RegistryKind;
use crate::type_ref::TypeReference;

pub(super) const BLOCK_ENTITY_RENAMES: &[(&str, &str)] = &[
    ("Airportal", "minecraft:end_portal"),
    ("Banner", "minecraft:banner"),
    ("Beacon", "minecraft:beacon"),
    ("Cauldron", "minecraft:brewing_stand"),
    ("Chest", "minecraft:chest"),
    ("Comparator", "minecraft:comparator"),
    ("Control", "minecraft:command_block"),
    ("DLDetector", "minecraft:daylight_detector"),
    ("Dropper", "minecraft:dropper"),
    ("EnchantTable", "minecraft:enchanting_table"),
    ("EndGateway", "minecraft:end_gateway"),
    ("EnderChest", "minecraft:ender_chest"),
    ("FlowerPot", "minecraft:flower_pot"),
    ("Furnace", "minecraft:furnace"),
    ("Hopper", "minecraft:hopper"),
    ("MobSpawner", "minecraft:mob_spawner"),
    ("Music", "minecraft:noteblock"),
    ("Piston", "minecraft:piston"),
    ("RecordPlayer", "minecraft:jukebox"),
    ("Sign", "minecraft:sign"),
    ("Skull", "minecraft:skull"),
    ("Structure", "minecraft:structure_block"),
    ("Trap", "minecraft:dispenser"),
];

pub(super) const ITEM_BLOCK_ENTITIES: IdTable = &[
    ("minecraft:furnace", "minecraft:furnace"),
    ("minecraft:lit_furnace", "minecraft:furnace"),
    ("minecraft:chest", "minecraft:chest"),
    ("minecraft:trapped_chest", "minecraft:chest"),
    ("minecraft:ender_chest", "minecraft:ender_chest"),
    ("minecraft:jukebox", "minecraft:jukebox"),
    ("minecraft:dispenser", "minecraft:dispenser"),
    ("minecraft:dropper", "minecraft:dropper"),
    ("minecraft:sign", "minecraft:sign"),
    ("minecraft:mob_spawner", "minecraft:mob_spawner"),
    ("minecraft:noteblock", "minecraft:noteblock"),
    ("minecraft:brewing_stand", "minecraft:brewing_stand"),
    ("minecraft:enchanting_table", "minecraft:enchanting_table"),
    ("minecraft:command_block", "minecraft:command_block"),
    ("minecraft:beacon", "minecraft:beacon"),
    ("minecraft:skull", "minecraft:skull"),
    ("minecraft:daylight_detector", "minecraft:daylight_detector"),
    ("minecraft:hopper", "minecraft:hopper"),
    ("minecraft:banner", "minecraft:banner"),
    ("minecraft:flower_pot", "minecraft:flower_pot"),
    ("minecraft:piston", "minecraft:piston"),
    ("minecraft:sticky_piston", "minecraft:piston"),
    ("minecraft:structure_block", "minecraft:structure_block"),
    ("minecraft:end_gateway", "minecraft:end_gateway"),
];

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    for (from, to) in BLOCK_ENTITY_RENAMES {
        b.rename_block_entity(from, to)?;
    }
    b.register_type(
        TypeReference::BlockEntity,
        tagged_registry("id", namespaced_string(), RegistryKind::BlockEntities),
    )
    .register_type(
        TypeReference::ItemStack,
        item_stack(
            reference(TypeReference::ItemName),
            hooks::item_stack_names("item_stack_names_v704", ITEM_BLOCK_ENTITIES, ITEM_ENTITIES),
        ),
    );
    Ok(())
}
