//! Neighbor resolution: ordered source/target descriptors for a node.
//!
//! Pure reads through [`GraphAccessor`]; no side effects. The run
//! controller re-resolves between phases, so both lookups must stay cheap
//! and repeatable.

use std::sync::Arc;

use super::accessor::GraphAccessor;
use super::node::GraphNode;

/// Minimal neighbor view the compiler works with: id plus display label.
///
/// The label defaults to the id, so every descriptor always has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborDescriptor {
    pub id: String,
    pub label: String,
}

impl NeighborDescriptor {
    /// Builds a descriptor; a missing label falls back to the id.
    pub fn new(id: impl Into<String>, label: Option<String>) -> Self {
        let id = id.into();
        let label = label.unwrap_or_else(|| id.clone());
        Self { id, label }
    }

    /// Descriptor for an existing node, using its display label.
    pub fn of(node: &GraphNode) -> Self {
        Self::new(node.id.clone(), node.label.clone())
    }
}

/// Resolves a node's upstream and downstream neighbors as descriptors.
///
/// **Interaction**: Holds an `Arc<dyn GraphAccessor>`; used by
/// [`RunController`](crate::run::RunController) once per state-machine phase.
#[derive(Clone)]
pub struct NeighborResolver {
    accessor: Arc<dyn GraphAccessor>,
}

impl NeighborResolver {
    pub fn new(accessor: Arc<dyn GraphAccessor>) -> Self {
        Self { accessor }
    }

    /// Ordered descriptors of the nodes feeding into `node_id`.
    pub fn sources(&self, node_id: &str) -> Vec<NeighborDescriptor> {
        self.accessor
            .source_neighbors(node_id)
            .iter()
            .map(NeighborDescriptor::of)
            .collect()
    }

    /// Ordered descriptors of the nodes `node_id` feeds into.
    pub fn targets(&self, node_id: &str) -> Vec<NeighborDescriptor> {
        self.accessor
            .target_neighbors(node_id)
            .iter()
            .map(NeighborDescriptor::of)
            .collect()
    }
}
