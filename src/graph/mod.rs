//! Reference Graph
//!
//! Per-node dependency graph built with petgraph. Nodes are the node's type
//! references and registry entries; edges are lazy references and
//! registry-backed tagged unions. Used to find dangling references before a
//! chain is handed out, to report recursive groups, and for DOT export.

pub mod analysis;

pub use analysis::{recursive_groups, RecursiveGroup};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::template::{RegistryKind, Template};
use crate::type_ref::TypeReference;
use crate::version::DataVersion;

/// Identifier of a graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKey {
    /// A registered type reference: "type:entity_tree"
    Type(TypeReference),
    /// A registry entry: "entity:minecraft:cow"
    Entry(RegistryKind, String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Type(r) => write!(f, "type:{}", r),
            NodeKey::Entry(kind, id) => write!(f, "{}:{}", kind, id),
        }
    }
}

/// Types of edges in the reference graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// `Template::Reference`
    Reference,
    /// Tagged union drawing this entry from a registry
    Variant,
}

/// A reference to a type that is not registered at this node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingReference {
    pub from: NodeKey,
    pub to: TypeReference,
}

impl DanglingReference {
    pub fn into_error(self, version: DataVersion) -> SchemaError {
        SchemaError::DanglingReference {
            version,
            from: self.from.to_string(),
            to: self.to,
        }
    }
}

/// A fuzzy search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub key: NodeKey,
    pub score: i64,
}

/// The reference graph of one schema node
pub struct ReferenceGraph {
    pub(crate) version: DataVersion,
    pub(crate) graph: DiGraph<NodeKey, EdgeKind>,
    pub(crate) node_indices: HashMap<NodeKey, NodeIndex>,
    dangling: Vec<DanglingReference>,
}

impl ReferenceGraph {
    /// Build the graph, forcing every template registered at `schema`
    pub fn from_schema(schema: &Schema) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        let mut sources: Vec<(NodeKey, std::sync::Arc<Template>)> = Vec::new();
        for type_ref in schema.type_refs() {
            if let Ok(template) = schema.type_template(type_ref) {
                sources.push((NodeKey::Type(type_ref), template));
            }
        }
        for kind in [RegistryKind::Entities, RegistryKind::BlockEntities] {
            for (id, thunk) in schema.registry(kind) {
                sources.push((NodeKey::Entry(kind, id.clone()), thunk.force()));
            }
        }

        for (key, _) in &sources {
            let idx = graph.add_node(key.clone());
            node_indices.insert(key.clone(), idx);
        }

        let mut dangling = Vec::new();
        for (key, template) in &sources {
            let from = node_indices[key];
            for target in template.references() {
                match node_indices.get(&NodeKey::Type(target)) {
                    Some(&to) => {
                        graph.add_edge(from, to, EdgeKind::Reference);
                    }
                    None => dangling.push(DanglingReference {
                        from: key.clone(),
                        to: target,
                    }),
                }
            }
            for kind in template.registries() {
                for id in schema.registry(kind).keys() {
                    if let Some(&to) = node_indices.get(&NodeKey::Entry(kind, id.clone())) {
                        graph.add_edge(from, to, EdgeKind::Variant);
                    }
                }
            }
        }

        Self {
            version: schema.version(),
            graph,
            node_indices,
            dangling,
        }
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// References to types this node does not register
    pub fn dangling(&self) -> &[DanglingReference] {
        &self.dangling
    }

    /// Fail with the first dangling reference, if any
    pub fn validate(&self) -> Result<(), SchemaError> {
        match self.dangling.first() {
            Some(dangling) => Err(dangling.clone().into_error(self.version)),
            None => Ok(()),
        }
    }

    /// Get immediate outgoing edges (dependencies)
    pub fn refs_out(&self, key: &NodeKey) -> Vec<&NodeKey> {
        self.neighbors(key, Direction::Outgoing)
    }

    /// Get immediate incoming edges (dependents)
    pub fn refs_in(&self, key: &NodeKey) -> Vec<&NodeKey> {
        self.neighbors(key, Direction::Incoming)
    }

    fn neighbors(&self, key: &NodeKey, direction: Direction) -> Vec<&NodeKey> {
        let Some(&node_idx) = self.node_indices.get(key) else {
            return Vec::new();
        };

        let mut out: Vec<&NodeKey> = self
            .graph
            .edges_directed(node_idx, direction)
            .filter_map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph.node_weight(other)
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Search nodes by name (fuzzy), best match first
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<(i64, &NodeKey)> = self
            .node_indices
            .keys()
            .filter_map(|key| {
                let name = match key {
                    NodeKey::Type(r) => r.name().to_string(),
                    NodeKey::Entry(_, id) => id.clone(),
                };
                matcher.fuzzy_match(&name, query).map(|score| (score, key))
            })
            .collect();

        // Sort by score descending, then by key for stable output
        results.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        results
            .into_iter()
            .take(limit)
            .map(|(score, key)| SearchResult {
                key: key.clone(),
                score,
            })
            .collect()
    }

    /// Export the reference graph to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("digraph \"schema_{}\" {{\n", self.version));
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        let mut keys: Vec<&NodeKey> = self.node_indices.keys().collect();
        keys.sort();
        for key in keys {
            let color = match key {
                NodeKey::Type(_) => "#90CAF9",
                NodeKey::Entry(RegistryKind::Entities, _) => "#A5D6A7",
                NodeKey::Entry(RegistryKind::BlockEntities, _) => "#FFCC80",
            };
            output.push_str(&format!("  \"{}\" [fillcolor=\"{}\"];\n", key, color));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            if let (Some(source), Some(target)) = (
                self.graph.node_weight(edge.source()),
                self.graph.node_weight(edge.target()),
            ) {
                let style = match edge.weight() {
                    EdgeKind::Reference => "solid",
                    EdgeKind::Variant => "dashed",
                };
                output.push_str(&format!("  \"{}\" -> \"{}\" [style={}];\n", source, target, style));
            }
        }

        for dangling in &self.dangling {
            output.push_str(&format!(
                "  \"{}\" -> \"type:{}\" [color=red, label=\"dangling\"];\n",
                dangling.from, dangling.to
            ));
        }

        output.push_str("}\n");
        output
    }
}
