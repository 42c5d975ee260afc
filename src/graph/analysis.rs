//! Recursive group analysis
//!
//! Recursion in templates is legal (it is what `Reference` exists for), but
//! every recursive group has to bottom out in an optional member or a list,
//! so it is worth listing them.

use petgraph::algo::kosaraju_scc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use super::{NodeKey, ReferenceGraph};

/// A strongly connected component (cycle group) in the reference graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveGroup {
    pub id: usize,
    /// Members in key order
    pub members: Vec<NodeKey>,
    /// Whether this is a single node that references itself
    pub is_self_referential: bool,
}

impl RecursiveGroup {
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.members.contains(key)
    }
}

/// Groups of mutually recursive nodes plus self-referencing nodes
pub fn recursive_groups(graph: &ReferenceGraph) -> Vec<RecursiveGroup> {
    let mut components: Vec<Vec<NodeKey>> = Vec::new();
    let mut self_referential = Vec::new();

    for scc in kosaraju_scc(&graph.graph) {
        if scc.len() == 1 {
            let node_idx = scc[0];
            let has_self_ref = graph
                .graph
                .edges_directed(node_idx, Direction::Outgoing)
                .any(|e| e.target() == node_idx);
            if !has_self_ref {
                continue;
            }
            self_referential.push(true);
        } else {
            self_referential.push(false);
        }

        let mut members: Vec<NodeKey> = scc
            .iter()
            .filter_map(|idx| graph.graph.node_weight(*idx).cloned())
            .collect();
        members.sort();
        components.push(members);
    }

    let mut groups: Vec<(Vec<NodeKey>, bool)> = components.into_iter().zip(self_referential).collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    groups
        .into_iter()
        .enumerate()
        .map(|(id, (members, is_self_referential))| RecursiveGroup {
            id,
            members,
            is_self_referential,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;
    use crate::template::dsl::*;
    use crate::template::RegistryKind;
    use crate::type_ref::TypeReference;

    #[test]
    fn test_self_and_mutual_recursion() {
        let mut b = SchemaBuilder::root(1);
        b.register_type(
            TypeReference::EntityTree,
            opt_record(vec![opt("Riding", reference(TypeReference::EntityTree))]),
        )
        .register_type(
            TypeReference::ItemStack,
            opt_record(vec![opt("tag", opt_record(vec![opt("BlockEntityTag", reference(TypeReference::BlockEntity))]))]),
        )
        .register_type(
            TypeReference::BlockEntity,
            tagged_registry("id", string(), RegistryKind::BlockEntities),
        )
        .register_block_entity("Chest", opt_record(vec![opt("Items", list(reference(TypeReference::ItemStack)))]))
        .register_type(TypeReference::Team, string());

        let graph = ReferenceGraph::from_schema(&b.build().unwrap());
        let groups = recursive_groups(&graph);
        assert_eq!(groups.len(), 2);

        let tree = groups
            .iter()
            .find(|g| g.contains(&NodeKey::Type(TypeReference::EntityTree)))
            .unwrap();
        assert!(tree.is_self_referential);
        assert_eq!(tree.members.len(), 1);

        let items = groups
            .iter()
            .find(|g| g.contains(&NodeKey::Type(TypeReference::ItemStack)))
            .unwrap();
        assert!(!items.is_self_referential);
        assert_eq!(items.members.len(), 3);
    }
}
