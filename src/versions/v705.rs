//! V705: entities get namespaced ids

use super::hooks::{self, IdTable};
use super::v704::ITEM_BLOCK_ENTITIES;
use super::v99::item_stack;
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::RegistryKind;
use crate::type_ref::TypeReference;

pub(super) const ENTITY_RENAMES: &[(&str, &str)] = &[
    ("AreaEffectCloud", "minecraft:area_effect_cloud"),
    ("ArmorStand", "minecraft:armor_stand"),
    ("Arrow", "minecraft:arrow"),
    ("Bat", "minecraft:bat"),
    ("Blaze", "minecraft:blaze"),
    ("Boat", "minecraft:boat"),
    ("CaveSpider", "minecraft:cave_spider"),
    ("Chicken", "minecraft:chicken"),
    ("Cow", "minecraft:cow"),
    ("Creeper", "minecraft:creeper"),
    ("Donkey", "minecraft:donkey"),
    ("DragonFireball", "minecraft:dragon_fireball"),
    ("ElderGuardian", "minecraft:elder_guardian"),
    ("EnderCrystal", "minecraft:ender_crystal"),
    ("EnderDragon", "minecraft:ender_dragon"),
    ("Enderman", "minecraft:enderman"),
    ("Endermite", "minecraft:endermite"),
    ("EyeOfEnderSignal", "minecraft:eye_of_ender_signal"),
    ("FallingSand", "minecraft:falling_block"),
    ("Fireball", "minecraft:fireball"),
    ("FireworksRocketEntity", "minecraft:fireworks_rocket"),
    ("Ghast", "minecraft:ghast"),
    ("Giant", "minecraft:giant"),
    ("Guardian", "minecraft:guardian"),
    ("Horse", "minecraft:horse"),
    ("Husk", "minecraft:husk"),
    ("Item", "minecraft:item"),
    ("ItemFrame", "minecraft:item_frame"),
    ("LavaSlime", "minecraft:magma_cube"),
    ("LeashKnot", "minecraft:leash_knot"),
    ("MinecartChest", "minecraft:chest_minecart"),
    ("MinecartCommandBlock", "minecraft:commandblock_minecart"),
    ("MinecartFurnace", "minecraft:furnace_minecart"),
    ("MinecartHopper", "minecraft:hopper_minecart"),
    ("MinecartRideable", "minecraft:minecart"),
    ("MinecartSpawner", "minecraft:spawner_minecart"),
    ("MinecartTNT", "minecraft:tnt_minecart"),
    ("Mule", "minecraft:mule"),
    ("MushroomCow", "minecraft:mooshroom"),
    ("Ozelot", "minecraft:ocelot"),
    ("Painting", "minecraft:painting"),
    ("Pig", "minecraft:pig"),
    ("PigZombie", "minecraft:zombie_pigman"),
    ("PolarBear", "minecraft:polar_bear"),
    ("PrimedTnt", "minecraft:tnt"),
    ("Rabbit", "minecraft:rabbit"),
    ("Sheep", "minecraft:sheep"),
    ("Shulker", "minecraft:shulker"),
    ("ShulkerBullet", "minecraft:shulker_bullet"),
    ("Silverfish", "minecraft:silverfish"),
    ("Skeleton", "minecraft:skeleton"),
    ("SkeletonHorse", "minecraft:skeleton_horse"),
    ("Slime", "minecraft:slime"),
    ("SmallFireball", "minecraft:small_fireball"),
    ("SnowMan", "minecraft:snowman"),
    ("Snowball", "minecraft:snowball"),
    ("SpectralArrow", "minecraft:spectral_arrow"),
    ("Spider", "minecraft:spider"),
    ("Squid", "minecraft:squid"),
    ("Stray", "minecraft:stray"),
    ("ThrownEgg", "minecraft:egg"),
    ("ThrownEnderpearl", "minecraft:ender_pearl"),
    ("ThrownExpBottle", "minecraft:xp_bottle"),
    ("ThrownPotion", "minecraft:potion"),
    ("Villager", "minecraft:villager"),
    ("VillagerGolem", "minecraft:villager_golem"),
    ("Witch", "minecraft:witch"),
    ("WitherBoss", "minecraft:wither"),
    ("WitherSkeleton", "minecraft:wither_skeleton"),
    ("WitherSkull", "minecraft:wither_skull"),
    ("Wolf", "minecraft:wolf"),
    ("XPOrb", "minecraft:xp_orb"),
    ("Zombie", "minecraft:zombie"),
    ("ZombieHorse", "minecraft:zombie_horse"),
    ("ZombieVillager", "minecraft:zombie_villager"),
];

const ITEM_ENTITIES: IdTable = &[
    ("minecraft:armor_stand", "minecraft:armor_stand"),
    ("minecraft:painting", "minecraft:painting"),
    ("minecraft:boat", "minecraft:boat"),
    ("minecraft:minecart", "minecraft:minecart"),
    ("minecraft:chest_minecart", "minecraft:chest_minecart"),
    ("minecraft:furnace_minecart", "minecraft:furnace_minecart"),
    ("minecraft:tnt_minecart", "minecraft:tnt_minecart"),
    ("minecraft:hopper_minecart", "minecraft:hopper_minecart"),
    ("minecraft:command_block_minecart", "minecraft:commandblock_minecart"),
];

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    for (from, to) in ENTITY_RENAMES {
        b.rename_entity(from, to)?;
    }
    b.register_type(
        TypeReference::Entity,
        tagged_registry("id", namespaced_string(), RegistryKind::Entities),
    )
    .register_type(TypeReference::EntityName, namespaced_string())
    .register_type(
        TypeReference::ItemStack,
        item_stack(
            reference(TypeReference::ItemName),
            hooks::item_stack_names("item_stack_names_v705", ITEM_BLOCK_ENTITIES, ITEM_ENTITIES),
        ),
    );
    Ok(())
}
