//! V1022: creative hotbars, shoulder entities and the recipe book

use super::v135::player_members_v135;
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::type_ref::TypeReference;

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    let mut player = player_members_v135();
    player.extend([
        opt("ShoulderEntityLeft", reference(TypeReference::EntityTree)),
        opt("ShoulderEntityRight", reference(TypeReference::EntityTree)),
        opt(
            "recipeBook",
            opt_record(vec![
                opt("recipes", list(reference(TypeReference::Recipe))),
                opt("toBeDisplayed", list(reference(TypeReference::Recipe))),
            ]),
        ),
    ]);

    b.register_type(TypeReference::Recipe, namespaced_string())
        .register_type(TypeReference::Player, opt_record(player))
        // Hotbar slots keyed "0".."8", kept in file order
        .register_type(
            TypeReference::Hotbar,
            pairs(string(), list(reference(TypeReference::ItemStack))),
        );
    Ok(())
}
