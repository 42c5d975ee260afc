//! V102: item stack ids are always names

use super::hooks;
use super::v99::{item_stack, ITEM_BLOCK_ENTITIES, ITEM_ENTITIES};
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::type_ref::TypeReference;

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.register_type(
        TypeReference::ItemStack,
        item_stack(
            reference(TypeReference::ItemName),
            hooks::item_stack_names("item_stack_names_v99", ITEM_BLOCK_ENTITIES, ITEM_ENTITIES),
        ),
    );
    Ok(())
}
