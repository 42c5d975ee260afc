//! The declared format history
//!
//! One module per revision that changed something. Each exposes a
//! `register` function that only states its own changes; inheriting from
//! the previous revision is done by the chain builder.

mod hooks;
mod v100;
mod v1022;
mod v102;
mod v107;
mod v135;
mod v143;
mod v1451;
mod v501;
mod v700;
mod v704;
mod v705;
mod v99;

use crate::chain::SchemaChain;
use crate::error::Result;
use crate::version::DataVersion;

/// Build the full chain, validating every node's references
pub fn build_schema_chain() -> Result<SchemaChain> {
    build_schema_chain_with(true)
}

pub fn build_schema_chain_with(validate_references: bool) -> Result<SchemaChain> {
    let mut chain = SchemaChain::builder();
    chain
        .validate_references(validate_references)
        .version(99, v99::register)?
        .version(100, v100::register)?
        .version(102, v102::register)?
        .version(107, v107::register)?
        .version(135, v135::register)?
        .version(143, v143::register)?
        .version(501, v501::register)?
        .version(700, v700::register_v700)?
        .version(701, v700::register_v701)?
        .version(702, v700::register_v702)?
        .version(703, v700::register_v703)?
        .version(704, v704::register)?
        .version(705, v705::register)?
        .version(1022, v1022::register)?
        .version(DataVersion::with_sub(1451, 6), v1451::register)?;
    chain.build()
}
