//! Checksum utilities for schema fingerprints

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::schema::Schema;
use crate::template::{RegistryKind, Template};

/// SHA256 checksum of canonical template text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Checksum of a template's canonical single-line text
    pub fn of_template(template: &Template) -> Self {
        Self::from_str(&template.to_string())
    }

    /// Checksum of a whole node.
    ///
    /// Entries are hashed in key order, so two nodes with equal registries have
    /// equal fingerprints regardless of how they were built. Forces every thunk.
    pub fn of_schema(schema: &Schema) -> Self {
        let mut hasher = Sha256::new();
        for type_ref in schema.type_refs() {
            if let Ok(template) = schema.type_template(type_ref) {
                hasher.update(format!("type {} = {}\n", type_ref, template));
            }
        }
        for kind in [RegistryKind::Entities, RegistryKind::BlockEntities] {
            for (id, thunk) in schema.registry(kind) {
                hasher.update(format!("{} {} = {}\n", kind, id, thunk.force()));
            }
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for listings
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        let computed = Self::from_str(content);
        self.0 == computed.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::template::dsl::*;
    use crate::type_ref::TypeReference;

    #[test]
    fn test_checksum_consistency() {
        let t = opt_record(vec![opt("Items", list(reference(TypeReference::ItemStack)))]);
        assert_eq!(Checksum::of_template(&t), Checksum::of_template(&t.clone()));
        assert_ne!(Checksum::of_template(&t), Checksum::of_template(&empty()));
    }

    #[test]
    fn test_checksum_verification() {
        let checksum = Checksum::from_str("optional{}");
        assert!(checksum.verify("optional{}"));
        assert!(!checksum.verify("record{}"));
        assert_eq!(checksum.short().len(), 12);
    }

    #[test]
    fn test_fingerprint_ignores_registration_order() {
        let mut a = SchemaBuilder::root(1);
        a.register_simple_entity("minecraft:cow")
            .register_entity("minecraft:pig", opt_record(vec![opt("Saddle", bool())]));
        let mut b = SchemaBuilder::root(1);
        b.register_entity("minecraft:pig", opt_record(vec![opt("Saddle", bool())]))
            .register_simple_entity("minecraft:cow");

        let a = a.build().unwrap();
        let b = b.build().unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
