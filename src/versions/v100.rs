//! V100: mob `Equipment` splits into `ArmorItems` and `HandItems`

use super::v99::{items, mob_members, MOBS};
use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::template::dsl::*;
use crate::template::Template;

pub(super) fn mob(id: &str) -> Template {
    let mut members = vec![items("ArmorItems"), items("HandItems")];
    members.extend(mob_members(id));
    opt_record(members)
}

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    for id in MOBS {
        b.register_entity(id, mob(id));
    }
    Ok(())
}
