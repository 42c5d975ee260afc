//! Registry diff between two schema nodes
//!
//! Answers "what did this revision declare?" for any pair of nodes: keys added,
//! removed, renamed (the same registration moved to a new id) or changed (a new
//! template under the same key, with a line diff of the rendered templates).

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use std::fmt;

use crate::graph::NodeKey;
use crate::schema::{Schema, Thunk};
use crate::template::RegistryKind;
use crate::type_ref::TypeReference;
use crate::version::DataVersion;

/// Type of registry change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    /// The older key's registration now lives under a new key
    Renamed,
    /// Same key, structurally different template
    Changed,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ChangeType::Added => "+",
            ChangeType::Removed => "-",
            ChangeType::Renamed => ">",
            ChangeType::Changed => "~",
        };
        f.write_str(symbol)
    }
}

/// A detected change between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryChange {
    pub change_type: ChangeType,
    /// Key in the newer node (older node for removals)
    pub key: NodeKey,
    /// Older key, for renames
    pub renamed_from: Option<NodeKey>,
    /// Unified line diff of the pretty-printed templates, for changes
    pub text_diff: Option<String>,
}

impl fmt::Display for RegistryChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.renamed_from {
            Some(from) => write!(f, "{} {} (from {})", self.change_type, self.key, from),
            None => write!(f, "{} {}", self.change_type, self.key),
        }
    }
}

/// Result of diffing two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDiff {
    pub from: DataVersion,
    pub to: DataVersion,
    pub changes: Vec<RegistryChange>,
}

impl SchemaDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn count(&self, change_type: ChangeType) -> usize {
        self.changes.iter().filter(|c| c.change_type == change_type).count()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        if self.changes.is_empty() {
            return format!("{} -> {}: no changes", self.from, self.to);
        }
        format!(
            "{} -> {}: {} added, {} removed, {} renamed, {} changed",
            self.from,
            self.to,
            self.count(ChangeType::Added),
            self.count(ChangeType::Removed),
            self.count(ChangeType::Renamed),
            self.count(ChangeType::Changed),
        )
    }
}

/// Compare every registry of `older` with `newer`.
///
/// Changes are ordered by key: type references first, then entities, then
/// block entities.
pub fn diff_schemas(older: &Schema, newer: &Schema) -> SchemaDiff {
    let mut changes = Vec::new();

    let old_types: BTreeMap<NodeKey, Thunk> = type_entries(older);
    let new_types: BTreeMap<NodeKey, Thunk> = type_entries(newer);
    diff_registry(&old_types, &new_types, false, &mut changes);

    for kind in [RegistryKind::Entities, RegistryKind::BlockEntities] {
        let old_entries = registry_entries(older, kind);
        let new_entries = registry_entries(newer, kind);
        diff_registry(&old_entries, &new_entries, true, &mut changes);
    }

    SchemaDiff {
        from: older.version(),
        to: newer.version(),
        changes,
    }
}

fn type_entries(schema: &Schema) -> BTreeMap<NodeKey, Thunk> {
    TypeReference::ALL
        .iter()
        .filter_map(|r| schema.type_thunk(*r).map(|t| (NodeKey::Type(*r), t.clone())))
        .collect()
}

fn registry_entries(schema: &Schema, kind: RegistryKind) -> BTreeMap<NodeKey, Thunk> {
    schema
        .registry(kind)
        .iter()
        .map(|(id, t)| (NodeKey::Entry(kind, id.clone()), t.clone()))
        .collect()
}

fn diff_registry(
    old: &BTreeMap<NodeKey, Thunk>,
    new: &BTreeMap<NodeKey, Thunk>,
    detect_renames: bool,
    changes: &mut Vec<RegistryChange>,
) {
    let mut vanished: Vec<(&NodeKey, &Thunk)> =
        old.iter().filter(|(key, _)| !new.contains_key(*key)).collect();

    for (key, thunk) in new {
        match old.get(key) {
            Some(previous) => {
                if previous.same_as(thunk) {
                    continue;
                }
                let (before, after) = (previous.force(), thunk.force());
                if before != after {
                    changes.push(RegistryChange {
                        change_type: ChangeType::Changed,
                        key: key.clone(),
                        renamed_from: None,
                        text_diff: Some(text_diff(&before.to_pretty_string(), &after.to_pretty_string())),
                    });
                }
            }
            None => {
                let source = detect_renames
                    .then(|| vanished.iter().position(|(_, old_thunk)| old_thunk.same_as(thunk)))
                    .flatten();
                match source {
                    Some(pos) => {
                        let (from, _) = vanished.remove(pos);
                        changes.push(RegistryChange {
                            change_type: ChangeType::Renamed,
                            key: key.clone(),
                            renamed_from: Some(from.clone()),
                            text_diff: None,
                        });
                    }
                    None => changes.push(RegistryChange {
                        change_type: ChangeType::Added,
                        key: key.clone(),
                        renamed_from: None,
                        text_diff: None,
                    }),
                }
            }
        }
    }

    for (key, _) in vanished {
        changes.push(RegistryChange {
            change_type: ChangeType::Removed,
            key: key.clone(),
            renamed_from: None,
            text_diff: None,
        });
    }
}

fn text_diff(old_text: &str, new_text: &str) -> String {
    let diff = TextDiff::from_lines(old_text, new_text);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(sign);
        out.push_str(change.value());
        if change.missing_newline() {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::template::dsl::*;
    use std::sync::Arc;

    #[test]
    fn test_added_removed_renamed_changed() {
        let mut b = SchemaBuilder::root(1);
        b.register_type(TypeReference::ItemName, string())
            .register_type(TypeReference::Team, string())
            .register_simple_entity("Cow")
            .register_simple_entity("Pig")
            .register_entity("Zombie", opt_record(vec![opt("IsBaby", bool())]));
        let older = Arc::new(b.build().unwrap());

        let mut b = SchemaBuilder::extending(&older, 2);
        b.register_type(TypeReference::ItemName, namespaced_string())
            .register_type(TypeReference::Objective, empty())
            .remove_entity("Pig")
            .rename_entity("Cow", "cow")
            .unwrap();
        b.register_entity("Zombie", opt_record(vec![opt("IsBaby", bool()), opt("CanBreakDoors", bool())]));
        let newer = b.build().unwrap();

        let diff = diff_schemas(&older, &newer);
        assert_eq!(diff.count(ChangeType::Added), 1);
        assert_eq!(diff.count(ChangeType::Removed), 1);
        assert_eq!(diff.count(ChangeType::Renamed), 1);
        assert_eq!(diff.count(ChangeType::Changed), 2);

        let renamed = diff
            .changes
            .iter()
            .find(|c| c.change_type == ChangeType::Renamed)
            .unwrap();
        assert_eq!(renamed.key, NodeKey::Entry(RegistryKind::Entities, "minecraft:cow".into()));
        assert_eq!(renamed.renamed_from, Some(NodeKey::Entry(RegistryKind::Entities, "Cow".into())));

        let zombie = diff
            .changes
            .iter()
            .find(|c| c.key == NodeKey::Entry(RegistryKind::Entities, "Zombie".into()))
            .unwrap();
        assert!(zombie.text_diff.as_deref().unwrap().contains("+  \"CanBreakDoors\"?: bool"));
    }

    #[test]
    fn test_reregistering_equal_template_is_not_a_change() {
        let mut b = SchemaBuilder::root(1);
        b.register_type(TypeReference::Team, string());
        let older = Arc::new(b.build().unwrap());
        let mut b = SchemaBuilder::extending(&older, 2);
        b.register_type(TypeReference::Team, string());
        let newer = b.build().unwrap();

        let diff = diff_schemas(&older, &newer);
        assert!(diff.is_empty());
        assert_eq!(diff.summary(), "1 -> 2: no changes");
    }
}
