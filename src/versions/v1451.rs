//! V1451.6: statistics keyed by registry ids, objective criteria as `type:id` pairs

use super::hooks;
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::Template;
use crate::type_ref::TypeReference;

fn counts(key: Template) -> Template {
    pairs(key, int())
}

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    let block = || reference(TypeReference::BlockName);
    let item = || reference(TypeReference::ItemName);
    let entity = || reference(TypeReference::EntityName);

    b.register_type(
        TypeReference::Stats,
        opt_record(vec![opt(
            "stats",
            opt_record(vec![
                opt("minecraft:mined", counts(block())),
                opt("minecraft:crafted", counts(item())),
                opt("minecraft:used", counts(item())),
                opt("minecraft:broken", counts(item())),
                opt("minecraft:picked_up", counts(item())),
                opt("minecraft:dropped", counts(item())),
                opt("minecraft:killed", counts(entity())),
                opt("minecraft:killed_by", counts(entity())),
                opt("minecraft:custom", counts(namespaced_string())),
            ]),
        )]),
    )
    .register_type(
        TypeReference::Objective,
        opt_record(vec![opt(
            "CriteriaName",
            hook(
                either(
                    record(vec![field("type", string()), field("id", namespaced_string())]),
                    string(),
                ),
                hooks::legacy_stat_criterion(),
            ),
        )]),
    );
    Ok(())
}
