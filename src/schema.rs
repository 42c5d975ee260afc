//! Schema nodes
//!
//! A [`Schema`] is one historical format revision. Its three registries (type
//! templates, entity templates, block-entity templates) are built by
//! [`SchemaBuilder`]: copy the parent's registries, then apply this version's
//! registrations in declaration order. The copy is not optional, so a revision
//! can never silently lose inherited coverage. After [`SchemaBuilder::build`]
//! the node is read-only and lookups are plain map reads.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError, ShapeError};
use crate::namespace;
use crate::template::dsl::empty;
use crate::template::{DynamicOps, RegistryKind, Template, Variants, Walker};
use crate::type_ref::TypeReference;
use crate::version::DataVersion;

type Init = dyn Fn() -> Template + Send + Sync;

/// A lazily built, shared template.
///
/// Clones share one cell, so a template inherited by later versions (or carried
/// over by a rename) is built at most once and stays pointer-identical.
#[derive(Clone)]
pub struct Thunk {
    cell: Arc<OnceLock<Arc<Template>>>,
    init: Arc<Init>,
}

impl Thunk {
    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> Template + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(OnceLock::new()),
            init: Arc::new(init),
        }
    }

    pub fn ready(template: Template) -> Self {
        let shared = Arc::new(template);
        let fallback = Arc::clone(&shared);
        Self {
            cell: Arc::new(OnceLock::from(shared)),
            init: Arc::new(move || (*fallback).clone()),
        }
    }

    /// Build the template if needed and return it
    pub fn force(&self) -> Arc<Template> {
        Arc::clone(self.cell.get_or_init(|| Arc::new((self.init)())))
    }

    pub fn is_forced(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Whether both thunks are the same registration
    pub fn same_as(&self, other: &Thunk) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl From<Template> for Thunk {
    fn from(template: Template) -> Self {
        Thunk::ready(template)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(template) => write!(f, "Thunk({})", template),
            None => f.write_str("Thunk(<pending>)"),
        }
    }
}

/// One historical format revision
pub struct Schema {
    version: DataVersion,
    parent: Option<Arc<Schema>>,
    types: HashMap<TypeReference, Thunk>,
    entities: BTreeMap<String, Thunk>,
    block_entities: BTreeMap<String, Thunk>,
}

impl Schema {
    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// The immediately preceding revision
    pub fn parent(&self) -> Option<&Arc<Schema>> {
        self.parent.as_ref()
    }

    /// Template registered for `type_ref` here or in any ancestor.
    ///
    /// A miss means the schema graph itself is broken.
    pub fn type_template(&self, type_ref: TypeReference) -> Result<Arc<Template>> {
        self.types
            .get(&type_ref)
            .map(Thunk::force)
            .ok_or(SchemaError::UnresolvedTypeReference {
                type_ref,
                version: self.version,
            })
    }

    pub fn has_type(&self, type_ref: TypeReference) -> bool {
        self.types.contains_key(&type_ref)
    }

    /// Registered type references, in catalog order
    pub fn type_refs(&self) -> Vec<TypeReference> {
        let mut refs: Vec<_> = self.types.keys().copied().collect();
        refs.sort();
        refs
    }

    pub(crate) fn type_thunk(&self, type_ref: TypeReference) -> Option<&Thunk> {
        self.types.get(&type_ref)
    }

    /// Variant template for `id` in the tagged union registered for `type_ref`.
    ///
    /// `id` is normalized before matching, so `"cow"` and `"minecraft:cow"` are
    /// the same key.
    pub fn choice_type(&self, type_ref: TypeReference, id: &str) -> Result<Arc<Template>> {
        let template = self.type_template(type_ref)?;
        let union = template.as_tagged_union().ok_or(SchemaError::NotAChoiceType {
            type_ref,
            version: self.version,
        })?;

        let key = namespace::normalize(id);
        let variant = match &union.variants {
            Variants::Inline(variants) => variants.get(key.as_ref()).cloned().map(Arc::new),
            Variants::Registry(kind) => self.registry_entry(*kind, &key),
        };
        variant.ok_or_else(|| SchemaError::UnrecognizedVariant {
            type_ref,
            id: id.to_string(),
            version: self.version,
        })
    }

    pub fn registry(&self, kind: RegistryKind) -> &BTreeMap<String, Thunk> {
        match kind {
            RegistryKind::Entities => &self.entities,
            RegistryKind::BlockEntities => &self.block_entities,
        }
    }

    /// Template registered under `id` (normalized) in one of the registries
    pub fn registry_entry(&self, kind: RegistryKind, id: &str) -> Option<Arc<Template>> {
        self.registry(kind)
            .get(namespace::normalize(id).as_ref())
            .map(Thunk::force)
    }

    pub fn entity(&self, id: &str) -> Option<Arc<Template>> {
        self.registry_entry(RegistryKind::Entities, id)
    }

    pub fn block_entity(&self, id: &str) -> Option<Arc<Template>> {
        self.registry_entry(RegistryKind::BlockEntities, id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn block_entity_ids(&self) -> impl Iterator<Item = &str> {
        self.block_entities.keys().map(String::as_str)
    }

    /// SHA-256 over every registry entry, independent of registration order
    pub fn fingerprint(&self) -> Checksum {
        Checksum::of_schema(self)
    }

    /// Interpret an on-disk value as `type_ref`, returning its canonical form
    pub fn read(
        &self,
        type_ref: TypeReference,
        ops: &dyn DynamicOps,
        value: Value,
    ) -> std::result::Result<Value, ShapeError> {
        let template = self.type_template(type_ref)?;
        Walker::reader(self, ops).walk(&template, value)
    }

    /// Serialize a canonical value of `type_ref` to its on-disk form
    pub fn write(
        &self,
        type_ref: TypeReference,
        ops: &dyn DynamicOps,
        value: Value,
    ) -> std::result::Result<Value, ShapeError> {
        let template = self.type_template(type_ref)?;
        Walker::writer(self, ops).walk(&template, value)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("version", &self.version)
            .field("parent", &self.parent.as_ref().map(|p| p.version))
            .field("types", &self.types.len())
            .field("entities", &self.entities.len())
            .field("block_entities", &self.block_entities.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DeclaredKey {
    Type(TypeReference),
    Entry(RegistryKind, String),
}

/// Builds one [`Schema`] on top of its parent.
///
/// Registering a key twice in one version is allowed: the last registration wins.
pub struct SchemaBuilder {
    version: DataVersion,
    parent: Option<Arc<Schema>>,
    types: HashMap<TypeReference, Thunk>,
    entities: BTreeMap<String, Thunk>,
    block_entities: BTreeMap<String, Thunk>,
    declared: HashSet<DeclaredKey>,
}

impl SchemaBuilder {
    /// The first node of a chain
    pub fn root(version: impl Into<DataVersion>) -> Self {
        Self {
            version: version.into(),
            parent: None,
            types: HashMap::new(),
            entities: BTreeMap::new(),
            block_entities: BTreeMap::new(),
            declared: HashSet::new(),
        }
    }

    /// A node starting from exact copies of `parent`'s registries
    pub fn extending(parent: &Arc<Schema>, version: impl Into<DataVersion>) -> Self {
        Self {
            version: version.into(),
            parent: Some(Arc::clone(parent)),
            types: parent.types.clone(),
            entities: parent.entities.clone(),
            block_entities: parent.block_entities.clone(),
            declared: HashSet::new(),
        }
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Template currently registered for `type_ref` (inherited or declared here)
    pub fn current_type(&self, type_ref: TypeReference) -> Option<Arc<Template>> {
        self.types.get(&type_ref).map(Thunk::force)
    }

    /// Template currently registered under `id` in one of the registries
    pub fn current_entry(&self, kind: RegistryKind, id: &str) -> Option<Arc<Template>> {
        self.registry(kind)
            .get(namespace::normalize(id).as_ref())
            .map(Thunk::force)
    }

    pub fn register_type(&mut self, type_ref: TypeReference, template: impl Into<Thunk>) -> &mut Self {
        self.note_declared(DeclaredKey::Type(type_ref));
        self.types.insert(type_ref, template.into());
        self
    }

    pub fn register_types<I, T>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (TypeReference, T)>,
        T: Into<Thunk>,
    {
        for (type_ref, template) in entries {
            self.register_type(type_ref, template);
        }
        self
    }

    pub fn register_entity(&mut self, id: &str, template: impl Into<Thunk>) -> &mut Self {
        self.insert_entry(RegistryKind::Entities, id, template.into());
        self
    }

    /// An entity with no members of interest
    pub fn register_simple_entity(&mut self, id: &str) -> &mut Self {
        self.register_entity(id, empty())
    }

    /// Insert or overwrite each `Some` entry; remove each `None` entry
    pub fn register_entities<I, K, T>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Option<T>)>,
        K: AsRef<str>,
        T: Into<Thunk>,
    {
        self.apply_entries(RegistryKind::Entities, entries);
        self
    }

    pub fn remove_entity(&mut self, id: &str) -> &mut Self {
        self.remove_entry(RegistryKind::Entities, id);
        self
    }

    /// Move an entity to a new id, keeping its template
    pub fn rename_entity(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        self.rename_entry(RegistryKind::Entities, from, to)?;
        Ok(self)
    }

    /// Move an entity to a new id with a new template. A missing `from` is ignored.
    pub fn rename_entity_with(&mut self, from: &str, to: &str, template: impl Into<Thunk>) -> &mut Self {
        self.remove_entry(RegistryKind::Entities, from);
        self.insert_entry(RegistryKind::Entities, to, template.into());
        self
    }

    pub fn register_block_entity(&mut self, id: &str, template: impl Into<Thunk>) -> &mut Self {
        self.insert_entry(RegistryKind::BlockEntities, id, template.into());
        self
    }

    pub fn register_simple_block_entity(&mut self, id: &str) -> &mut Self {
        self.register_block_entity(id, empty())
    }

    pub fn register_block_entities<I, K, T>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Option<T>)>,
        K: AsRef<str>,
        T: Into<Thunk>,
    {
        self.apply_entries(RegistryKind::BlockEntities, entries);
        self
    }

    pub fn remove_block_entity(&mut self, id: &str) -> &mut Self {
        self.remove_entry(RegistryKind::BlockEntities, id);
        self
    }

    pub fn rename_block_entity(&mut self, from: &str, to: &str) -> Result<&mut Self> {
        self.rename_entry(RegistryKind::BlockEntities, from, to)?;
        Ok(self)
    }

    pub fn rename_block_entity_with(
        &mut self,
        from: &str,
        to: &str,
        template: impl Into<Thunk>,
    ) -> &mut Self {
        self.remove_entry(RegistryKind::BlockEntities, from);
        self.insert_entry(RegistryKind::BlockEntities, to, template.into());
        self
    }

    /// Freeze the registries into a [`Schema`]
    pub fn build(self) -> Result<Schema> {
        if let Some(parent) = &self.parent {
            if parent.version >= self.version {
                return Err(SchemaError::NonMonotonicVersion {
                    parent: parent.version,
                    version: self.version,
                });
            }
        }

        debug!(
            version = %self.version,
            types = self.types.len(),
            entities = self.entities.len(),
            block_entities = self.block_entities.len(),
            declared = self.declared.len(),
            "built schema node"
        );

        Ok(Schema {
            version: self.version,
            parent: self.parent,
            types: self.types,
            entities: self.entities,
            block_entities: self.block_entities,
        })
    }

    fn registry(&self, kind: RegistryKind) -> &BTreeMap<String, Thunk> {
        match kind {
            RegistryKind::Entities => &self.entities,
            RegistryKind::BlockEntities => &self.block_entities,
        }
    }

    fn registry_mut(&mut self, kind: RegistryKind) -> &mut BTreeMap<String, Thunk> {
        match kind {
            RegistryKind::Entities => &mut self.entities,
            RegistryKind::BlockEntities => &mut self.block_entities,
        }
    }

    fn note_declared(&mut self, key: DeclaredKey) {
        if !self.declared.insert(key.clone()) {
            debug!(version = %self.version, key = ?key, "registration overrides one from the same version");
        }
    }

    fn insert_entry(&mut self, kind: RegistryKind, id: &str, thunk: Thunk) {
        let key = namespace::normalize(id).into_owned();
        self.note_declared(DeclaredKey::Entry(kind, key.clone()));
        self.registry_mut(kind).insert(key, thunk);
    }

    fn remove_entry(&mut self, kind: RegistryKind, id: &str) -> Option<Thunk> {
        let key = namespace::normalize(id).into_owned();
        self.note_declared(DeclaredKey::Entry(kind, key.clone()));
        self.registry_mut(kind).remove(&key)
    }

    fn rename_entry(&mut self, kind: RegistryKind, from: &str, to: &str) -> Result<()> {
        let thunk = self.remove_entry(kind, from).ok_or_else(|| SchemaError::UnknownRenameSource {
            registry: kind.label(),
            id: from.to_string(),
            version: self.version,
        })?;
        self.insert_entry(kind, to, thunk);
        Ok(())
    }

    fn apply_entries<I, K, T>(&mut self, kind: RegistryKind, entries: I)
    where
        I: IntoIterator<Item = (K, Option<T>)>,
        K: AsRef<str>,
        T: Into<Thunk>,
    {
        for (id, template) in entries {
            match template {
                Some(template) => self.insert_entry(kind, id.as_ref(), template.into()),
                None => {
                    self.remove_entry(kind, id.as_ref());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::dsl::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn root() -> Arc<Schema> {
        let mut b = SchemaBuilder::root(1);
        b.register_type(TypeReference::ItemName, namespaced_string())
            .register_type(
                TypeReference::Entity,
                tagged_registry("id", string(), RegistryKind::Entities),
            )
            .register_simple_entity("Cow")
            .register_entity("Pig", opt_record(vec![opt("Saddle", bool())]));
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_inherits_parent_registries() {
        let parent = root();
        let child = SchemaBuilder::extending(&parent, 2).build().unwrap();
        assert_eq!(child.parent().map(|p| p.version()), Some(DataVersion::new(1)));
        assert_eq!(
            child.type_template(TypeReference::ItemName).unwrap(),
            parent.type_template(TypeReference::ItemName).unwrap()
        );
        assert!(child.entity("Pig").is_some());
    }

    #[test]
    fn test_unregistered_type_is_unresolved() {
        let schema = root();
        let err = schema.type_template(TypeReference::Chunk).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedTypeReference { .. }));
    }

    #[test]
    fn test_non_monotonic_version_rejected() {
        let parent = root();
        let err = SchemaBuilder::extending(&parent, 1).build().unwrap_err();
        assert!(matches!(err, SchemaError::NonMonotonicVersion { .. }));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut b = SchemaBuilder::root(1);
        b.register_type(TypeReference::Team, int())
            .register_type(TypeReference::Team, string());
        let schema = b.build().unwrap();
        assert_eq!(*schema.type_template(TypeReference::Team).unwrap(), string());
    }

    #[test]
    fn test_rename_carries_template() {
        let parent = root();
        let mut b = SchemaBuilder::extending(&parent, 2);
        b.rename_entity("Pig", "pig").unwrap();
        let child = b.build().unwrap();

        assert!(child.entity("Pig").is_none());
        assert_eq!(child.entity("minecraft:pig"), parent.entity("Pig"));
        assert!(child.registry(RegistryKind::Entities)["minecraft:pig"]
            .same_as(&parent.registry(RegistryKind::Entities)["Pig"]));
        assert!(parent.entity("pig").is_none());
    }

    #[test]
    fn test_rename_unknown_source_fails() {
        let parent = root();
        let mut b = SchemaBuilder::extending(&parent, 2);
        let err = b.rename_entity("Horse", "horse").err().unwrap();
        assert!(matches!(err, SchemaError::UnknownRenameSource { .. }));
    }

    #[test]
    fn test_register_entities_with_removals() {
        let parent = root();
        let mut b = SchemaBuilder::extending(&parent, 2);
        b.register_entities([("Cow", None), ("Sheep", Some(empty()))]);
        let child = b.build().unwrap();
        assert!(child.entity("Cow").is_none());
        assert!(child.entity("Sheep").is_some());
        assert!(parent.entity("Cow").is_some());
    }

    #[test]
    fn test_choice_type_normalizes_id() {
        let parent = root();
        let mut b = SchemaBuilder::extending(&parent, 2);
        b.register_simple_entity("minecraft:sheep");
        let child = b.build().unwrap();

        assert!(child.choice_type(TypeReference::Entity, "sheep").is_ok());
        assert!(child.choice_type(TypeReference::Entity, "minecraft:sheep").is_ok());
        let err = child.choice_type(TypeReference::Entity, "Sheep").unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedVariant { .. }));
        let err = child.choice_type(TypeReference::ItemName, "x").unwrap_err();
        assert!(matches!(err, SchemaError::NotAChoiceType { .. }));
    }

    #[test]
    fn test_thunk_is_forced_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let thunk = Thunk::lazy(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            empty()
        });
        let copy = thunk.clone();
        assert!(!thunk.is_forced());
        thunk.force();
        copy.force();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(copy.is_forced());
    }
}
