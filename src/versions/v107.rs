//! V107: the generic `Minecart` entity is gone

use crate::error::Result;
use crate::schema::SchemaBuilder;

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.remove_entity("Minecart");
    Ok(())
}
