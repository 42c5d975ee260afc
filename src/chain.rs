//! Schema Chain
//!
//! The ordered list of schema nodes, oldest first. Each node after the first
//! extends the one before it, so node `i` is always the parent of node `i + 1`.
//! A built chain is immutable and can be shared across threads.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, SchemaError};
use crate::graph::ReferenceGraph;
use crate::schema::{Schema, SchemaBuilder};
use crate::version::DataVersion;

/// Ordered, strictly increasing sequence of schema nodes
#[derive(Debug, Clone)]
pub struct SchemaChain {
    schemas: Vec<Arc<Schema>>,
}

impl SchemaChain {
    pub fn builder() -> SchemaChainBuilder {
        SchemaChainBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Nodes oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.iter()
    }

    pub fn first(&self) -> Option<&Arc<Schema>> {
        self.schemas.first()
    }

    pub fn latest(&self) -> Option<&Arc<Schema>> {
        self.schemas.last()
    }

    pub fn versions(&self) -> Vec<DataVersion> {
        self.schemas.iter().map(|s| s.version()).collect()
    }

    /// The node declared at exactly `version`
    pub fn get(&self, version: DataVersion) -> Option<&Arc<Schema>> {
        self.schemas
            .binary_search_by(|s| s.version().cmp(&version))
            .ok()
            .map(|i| &self.schemas[i])
    }

    /// The newest node at or below `version`.
    ///
    /// Data stamped with a version nobody declared is read with the schema that
    /// was current at that point.
    pub fn schema_for(&self, version: DataVersion) -> Option<&Arc<Schema>> {
        let idx = self.schemas.partition_point(|s| s.version() <= version);
        idx.checked_sub(1).map(|i| &self.schemas[i])
    }

    /// Resolve a user-supplied version string ("latest", "1451.6", "v704")
    pub fn resolve(&self, query: &str) -> Result<&Arc<Schema>> {
        if query.trim().eq_ignore_ascii_case("latest") {
            return self
                .latest()
                .ok_or_else(|| SchemaError::UnknownVersion(query.to_string()));
        }
        let version = DataVersion::parse(query)?;
        self.get(version)
            .ok_or_else(|| SchemaError::UnknownVersion(query.to_string()))
    }

    /// `(older, newer)` for every consecutive pair of nodes
    pub fn adjacent(&self) -> impl Iterator<Item = (&Arc<Schema>, &Arc<Schema>)> {
        self.schemas.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl<'a> IntoIterator for &'a SchemaChain {
    type Item = &'a Arc<Schema>;
    type IntoIter = std::slice::Iter<'a, Arc<Schema>>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}

/// Builds a [`SchemaChain`] one version at a time
pub struct SchemaChainBuilder {
    schemas: Vec<Arc<Schema>>,
    validate_references: bool,
}

impl Default for SchemaChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaChainBuilder {
    pub fn new() -> Self {
        Self {
            schemas: Vec::new(),
            validate_references: true,
        }
    }

    /// Check every node for dangling references in [`build`](Self::build)
    pub fn validate_references(&mut self, validate: bool) -> &mut Self {
        self.validate_references = validate;
        self
    }

    /// Declare the next version.
    ///
    /// The new node starts as a copy of the previous node (if any) and `declare`
    /// applies this version's registrations on top.
    pub fn version<F>(&mut self, version: impl Into<DataVersion>, declare: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut SchemaBuilder) -> Result<()>,
    {
        let version = version.into();
        let mut builder = match self.schemas.last() {
            Some(parent) => SchemaBuilder::extending(parent, version),
            None => SchemaBuilder::root(version),
        };
        declare(&mut builder)?;
        self.schemas.push(Arc::new(builder.build()?));
        Ok(self)
    }

    pub fn build(&mut self) -> Result<SchemaChain> {
        let schemas = std::mem::take(&mut self.schemas);

        if self.validate_references {
            for schema in &schemas {
                let graph = ReferenceGraph::from_schema(schema);
                graph.validate()?;
                debug!(
                    version = %schema.version(),
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "references resolved"
                );
            }
        }

        info!(
            versions = schemas.len(),
            first = ?schemas.first().map(|s| s.version()),
            latest = ?schemas.last().map(|s| s.version()),
            "built schema chain"
        );

        Ok(SchemaChain { schemas })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::dsl::*;
    use crate::type_ref::TypeReference;

    fn chain() -> SchemaChain {
        let mut builder = SchemaChain::builder();
        builder
            .version(10, |b| {
                b.register_type(TypeReference::ItemName, string());
                Ok(())
            })
            .unwrap()
            .version(20, |b| {
                b.register_type(TypeReference::ItemName, namespaced_string());
                Ok(())
            })
            .unwrap()
            .version(DataVersion::with_sub(20, 3), |_| Ok(()))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_nodes_link_to_previous() {
        let chain = chain();
        assert_eq!(chain.len(), 3);
        for (older, newer) in chain.adjacent() {
            assert!(older.version() < newer.version());
            assert!(Arc::ptr_eq(newer.parent().unwrap(), older));
        }
        assert!(chain.first().unwrap().parent().is_none());
    }

    #[test]
    fn test_exact_and_floor_lookup() {
        let chain = chain();
        assert!(chain.get(DataVersion::new(15)).is_none());
        assert_eq!(chain.schema_for(DataVersion::new(15)).unwrap().version(), DataVersion::new(10));
        assert_eq!(chain.schema_for(DataVersion::new(20)).unwrap().version(), DataVersion::new(20));
        assert_eq!(
            chain.schema_for(DataVersion::new(999)).unwrap().version(),
            DataVersion::with_sub(20, 3)
        );
        assert!(chain.schema_for(DataVersion::new(5)).is_none());
    }

    #[test]
    fn test_resolve() {
        let chain = chain();
        assert_eq!(chain.resolve("latest").unwrap().version(), DataVersion::with_sub(20, 3));
        assert_eq!(chain.resolve("v20").unwrap().version(), DataVersion::new(20));
        assert!(matches!(chain.resolve("15"), Err(SchemaError::UnknownVersion(_))));
        assert!(matches!(chain.resolve("abc"), Err(SchemaError::InvalidVersion(_))));
    }

    #[test]
    fn test_non_monotonic_declaration_fails() {
        let mut builder = SchemaChain::builder();
        builder.version(10, |_| Ok(())).unwrap();
        let err = builder.version(10, |_| Ok(())).err().unwrap();
        assert!(matches!(err, SchemaError::NonMonotonicVersion { .. }));
    }

    #[test]
    fn test_dangling_reference_fails_build() {
        let mut builder = SchemaChain::builder();
        builder
            .version(1, |b| {
                b.register_type(TypeReference::Player, list(reference(TypeReference::ItemStack)));
                Ok(())
            })
            .unwrap();
        assert!(matches!(builder.build(), Err(SchemaError::DanglingReference { .. })));

        let mut builder = SchemaChain::builder();
        builder
            .validate_references(false)
            .version(1, |b| {
                b.register_type(TypeReference::Player, list(reference(TypeReference::ItemStack)));
                Ok(())
            })
            .unwrap();
        assert!(builder.build().is_ok());
    }
}
