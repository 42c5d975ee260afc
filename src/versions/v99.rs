//! V99: the root of the chain
//!
//! Entity and block-entity ids are unnamespaced CamelCase names. Item stacks
//! may still use numeric ids, and nested `BlockEntityTag` / `EntityTag`
//! compounds get their id from the item.

use super::hooks::{self, IdTable};
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::{HookPair, RegistryKind, Template};
use crate::type_ref::TypeReference;

/// Entities that carry equipment
pub(super) const MOBS: &[&str] = &[
    "ArmorStand",
    "Creeper",
    "Skeleton",
    "Spider",
    "Giant",
    "Zombie",
    "Slime",
    "Ghast",
    "PigZombie",
    "Enderman",
    "CaveSpider",
    "Silverfish",
    "Blaze",
    "LavaSlime",
    "EnderDragon",
    "WitherBoss",
    "Bat",
    "Witch",
    "Endermite",
    "Guardian",
    "Shulker",
    "Pig",
    "Sheep",
    "Cow",
    "Chicken",
    "Squid",
    "Wolf",
    "MushroomCow",
    "SnowMan",
    "Ozelot",
    "VillagerGolem",
    "EntityHorse",
    "Rabbit",
    "Villager",
];

const SIMPLE_ENTITIES: &[&str] = &[
    "XPOrb",
    "LeashKnot",
    "Painting",
    "Fireball",
    "SmallFireball",
    "ThrownEnderpearl",
    "EyeOfEnderSignal",
    "WitherSkull",
    "PrimedTnt",
    "ShulkerBullet",
    "DragonFireball",
    "Boat",
    "EnderCrystal",
    "AreaEffectCloud",
];

const PROJECTILES: &[&str] = &["ThrownEgg", "Arrow", "TippedArrow", "SpectralArrow", "Snowball", "ThrownExpBottle"];

const MINECARTS: &[&str] = &["Minecart", "MinecartRideable", "MinecartFurnace", "MinecartTNT", "MinecartCommandBlock"];

const INVENTORY_BLOCK_ENTITIES: &[&str] = &["Furnace", "Chest", "Trap", "Dropper", "Cauldron", "Hopper"];

const SIMPLE_BLOCK_ENTITIES: &[&str] = &[
    "EnderChest",
    "Sign",
    "Music",
    "Airportal",
    "Control",
    "Beacon",
    "Skull",
    "DLDetector",
    "Comparator",
    "Banner",
    "Structure",
    "EndGateway",
    "EnchantTable",
];

pub(super) const ITEM_BLOCK_ENTITIES: IdTable = &[
    ("minecraft:furnace", "Furnace"),
    ("minecraft:lit_furnace", "Furnace"),
    ("minecraft:chest", "Chest"),
    ("minecraft:trapped_chest", "Chest"),
    ("minecraft:ender_chest", "EnderChest"),
    ("minecraft:jukebox", "RecordPlayer"),
    ("minecraft:dispenser", "Trap"),
    ("minecraft:dropper", "Dropper"),
    ("minecraft:sign", "Sign"),
    ("minecraft:mob_spawner", "MobSpawner"),
    ("minecraft:noteblock", "Music"),
    ("minecraft:brewing_stand", "Cauldron"),
    ("minecraft:enchanting_table", "EnchantTable"),
    ("minecraft:command_block", "Control"),
    ("minecraft:beacon", "Beacon"),
    ("minecraft:skull", "Skull"),
    ("minecraft:daylight_detector", "DLDetector"),
    ("minecraft:hopper", "Hopper"),
    ("minecraft:banner", "Banner"),
    ("minecraft:flower_pot", "FlowerPot"),
    ("minecraft:piston", "Piston"),
    ("minecraft:sticky_piston", "Piston"),
    ("minecraft:structure_block", "Structure"),
    ("minecraft:end_gateway", "EndGateway"),
];

pub(super) const ITEM_ENTITIES: IdTable = &[
    ("minecraft:armor_stand", "ArmorStand"),
    ("minecraft:painting", "Painting"),
    ("minecraft:boat", "Boat"),
    ("minecraft:minecart", "MinecartRideable"),
    ("minecraft:chest_minecart", "MinecartChest"),
    ("minecraft:furnace_minecart", "MinecartFurnace"),
    ("minecraft:tnt_minecart", "MinecartTNT"),
    ("minecraft:hopper_minecart", "MinecartHopper"),
    ("minecraft:command_block_minecart", "MinecartCommandBlock"),
];

fn item() -> Template {
    reference(TypeReference::ItemStack)
}

pub(super) fn items(name: &str) -> Template {
    opt(name, list(item()))
}

/// Members specific to one mob, on top of its equipment
pub(super) fn mob_members(id: &str) -> Vec<Template> {
    match id {
        "Enderman" => vec![opt("carried", reference(TypeReference::BlockName))],
        "EntityHorse" => vec![items("Items"), opt("ArmorItem", item()), opt("SaddleItem", item())],
        "Villager" => vec![
            items("Inventory"),
            opt(
                "Offers",
                opt_record(vec![opt(
                    "Recipes",
                    list(opt_record(vec![opt("buy", item()), opt("buyB", item()), opt("sell", item())])),
                )]),
            ),
        ],
        _ => Vec::new(),
    }
}

fn mob(id: &str) -> Template {
    let mut members = vec![items("Equipment")];
    members.extend(mob_members(id));
    opt_record(members)
}

fn minecart(extra: Vec<Template>) -> Template {
    let mut members = vec![opt("DisplayTile", reference(TypeReference::BlockName))];
    members.extend(extra);
    opt_record(members)
}

/// Item stacks with their nested-id hook
pub(super) fn item_stack(id: Template, names: HookPair) -> Template {
    hook(
        opt_record(vec![
            opt("id", id),
            opt(
                "tag",
                opt_record(vec![
                    opt("EntityTag", reference(TypeReference::EntityTree)),
                    opt("BlockEntityTag", reference(TypeReference::BlockEntity)),
                    opt("CanDestroy", list(reference(TypeReference::BlockName))),
                    opt("CanPlaceOn", list(reference(TypeReference::BlockName))),
                    items("Items"),
                ]),
            ),
        ]),
        names,
    )
}

pub(super) fn player_members() -> Vec<Template> {
    vec![items("Inventory"), items("EnderItems")]
}

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.register_types([
        (TypeReference::Level, opt_record(vec![opt("Player", reference(TypeReference::Player))])),
        (TypeReference::Player, opt_record(player_members())),
        (
            TypeReference::Chunk,
            record(vec![field(
                "Level",
                opt_record(vec![
                    opt("Entities", list(reference(TypeReference::EntityTree))),
                    opt("TileEntities", list(reference(TypeReference::BlockEntity))),
                    opt("TileTicks", list(record(vec![field("i", reference(TypeReference::BlockName))]))),
                ]),
            )]),
        ),
        (
            TypeReference::EntityTree,
            opt_record(vec![
                opt("Riding", reference(TypeReference::EntityTree)),
                reference(TypeReference::Entity),
            ]),
        ),
        (TypeReference::Entity, tagged_registry("id", string(), RegistryKind::Entities)),
        (TypeReference::BlockEntity, tagged_registry("id", string(), RegistryKind::BlockEntities)),
        (
            TypeReference::ItemStack,
            item_stack(
                either(short(), reference(TypeReference::ItemName)),
                hooks::item_stack_names("item_stack_names_v99", ITEM_BLOCK_ENTITIES, ITEM_ENTITIES),
            ),
        ),
        (TypeReference::BlockName, either(int(), namespaced_string())),
        (TypeReference::ItemName, namespaced_string()),
        (TypeReference::EntityName, string()),
        (TypeReference::BlockState, any()),
        (
            TypeReference::UntaggedSpawner,
            opt_record(vec![
                opt(
                    "SpawnPotentials",
                    list(record(vec![field("Entity", reference(TypeReference::EntityTree))])),
                ),
                opt("SpawnData", reference(TypeReference::EntityTree)),
            ]),
        ),
        (
            TypeReference::Structure,
            opt_record(vec![
                opt("entities", list(opt_record(vec![opt("nbt", reference(TypeReference::EntityTree))]))),
                opt("blocks", list(opt_record(vec![opt("nbt", reference(TypeReference::BlockEntity))]))),
                opt("palette", list(reference(TypeReference::BlockState))),
            ]),
        ),
        (TypeReference::Options, empty()),
        (TypeReference::Stats, empty()),
        (TypeReference::StructureFeature, empty()),
        (TypeReference::Objective, empty()),
        (TypeReference::Team, empty()),
        (
            TypeReference::SavedData,
            opt_record(vec![opt(
                "data",
                opt_record(vec![
                    opt("Objectives", list(reference(TypeReference::Objective))),
                    opt("Teams", list(reference(TypeReference::Team))),
                ]),
            )]),
        ),
    ]);

    for id in MOBS {
        b.register_entity(id, mob(id));
    }
    for id in SIMPLE_ENTITIES {
        b.register_simple_entity(id);
    }
    for id in PROJECTILES {
        b.register_entity(id, opt_record(vec![opt("inTile", reference(TypeReference::BlockName))]));
    }
    for id in MINECARTS {
        b.register_entity(id, minecart(Vec::new()));
    }
    b.register_entity("Item", opt_record(vec![opt("Item", item())]))
        .register_entity("ItemFrame", opt_record(vec![opt("Item", item())]))
        .register_entity("ThrownPotion", opt_record(vec![opt("Potion", item())]))
        .register_entity("FireworksRocketEntity", opt_record(vec![opt("FireworksItem", item())]))
        .register_entity(
            "FallingSand",
            opt_record(vec![
                opt("Block", reference(TypeReference::BlockName)),
                opt("TileEntityData", reference(TypeReference::BlockEntity)),
            ]),
        )
        .register_entity("MinecartChest", minecart(vec![items("Items")]))
        .register_entity("MinecartHopper", minecart(vec![items("Items")]))
        .register_entity("MinecartSpawner", minecart(vec![reference(TypeReference::UntaggedSpawner)]));

    for id in INVENTORY_BLOCK_ENTITIES {
        b.register_block_entity(id, opt_record(vec![items("Items")]));
    }
    for id in SIMPLE_BLOCK_ENTITIES {
        b.register_simple_block_entity(id);
    }
    b.register_block_entity("FlowerPot", opt_record(vec![opt("Item", reference(TypeReference::ItemName))]))
        .register_block_entity("RecordPlayer", opt_record(vec![opt("RecordItem", item())]))
        .register_block_entity("MobSpawner", reference(TypeReference::UntaggedSpawner))
        .register_block_entity("Piston", opt_record(vec![opt("blockId", reference(TypeReference::BlockName))]));

    Ok(())
}
