use super::v100::mob;
use crate::error::Result;
use crate::schema::SchemaBuilder;

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.register_entity("PolarBear", mob("PolarBear"));
    Ok(())
}
