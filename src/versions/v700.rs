//! V700 to V703: variants that used to be flags on one entity get ids of their own

use super::v100::mob;
use super::v99::items;
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::Template;
use crate::type_ref::TypeReference;

fn horse(extra: Vec<Template>) -> Template {
    let mut members = vec![
        items("ArmorItems"),
        items("HandItems"),
        opt("SaddleItem", reference(TypeReference::ItemStack)),
    ];
    members.extend(extra);
    opt_record(members)
}

pub(super) fn register_v700(b: &mut SchemaBuilder) -> Result<()> {
    b.register_entity("ElderGuardian", mob("ElderGuardian"));
    Ok(())
}

pub(super) fn register_v701(b: &mut SchemaBuilder) -> Result<()> {
    b.register_entity("WitherSkeleton", mob("WitherSkeleton"))
        .register_entity("Stray", mob("Stray"));
    Ok(())
}

pub(super) fn register_v702(b: &mut SchemaBuilder) -> Result<()> {
    b.register_entity("ZombieVillager", mob("ZombieVillager"))
        .register_entity("Husk", mob("Husk"));
    Ok(())
}

pub(super) fn register_v703(b: &mut SchemaBuilder) -> Result<()> {
    let chested = || horse(vec![items("Items")]);
    b.rename_entity_with(
        "EntityHorse",
        "Horse",
        horse(vec![opt("ArmorItem", reference(TypeReference::ItemStack))]),
    )
    .register_entity("Donkey", chested())
    .register_entity("Mule", chested())
    .register_entity("ZombieHorse", horse(Vec::new()))
    .register_entity("SkeletonHorse", horse(Vec::new()));
    Ok(())
}
