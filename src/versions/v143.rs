//! V143: tipped arrows merge into `Arrow`

use crate::error::Result;
use crate::schema::SchemaBuilder;

pub(super) fn register(b: &mut SchemaBuilder) -> Result<()> {
    b.remove_entity("TippedArrow");
    Ok(())
}
