//! V135: `Riding` becomes `Passengers`, players record their root vehicle

use super::v99::player_members;
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::Template;
use crate::type_ref::TypeReference;

pub(super) fn player_members_v135() -> Vec<Template> {
    let mut members = player_members();
    members.push(opt(
        "RootVehicle",
        opt_record(vec![opt("Entity", reference(TypeReference::EntityTree))]),
    ));
    members
}

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.register_type(
        TypeReference::EntityTree,
        opt_record(vec![
            opt("Passengers", list(reference(TypeReference::EntityTree))),
            reference(TypeReference::Entity),
        ]),
    )
    .register_type(TypeReference::Player, opt_record(player_members_v135()));
    Ok(())
}
