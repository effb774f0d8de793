//! In-memory graph document implementing `GraphAccessor`.
//!
//! One mutex over both collections gives every `apply_*` call the required
//! atomicity. Neighbor order follows edge insertion order, which is the
//! order the canvas created the connections in.

use std::sync::Mutex;

use super::accessor::{EdgesTransform, GraphAccessor, GraphTransform, NodesTransform};
use super::edge::GraphEdge;
use super::node::GraphNode;

#[derive(Default)]
struct DocumentState {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

/// Shared in-memory workflow document.
///
/// **Interaction**: Used as `Arc<dyn GraphAccessor>` by every component on
/// the run path; also used directly by tests and demos to seed graphs and
/// inspect results.
#[derive(Default)]
pub struct GraphDocument {
    state: Mutex<DocumentState>,
}

impl GraphDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the document with nodes and edges (builder style, for tests/demos).
    pub fn with_graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            state: Mutex::new(DocumentState { nodes, edges }),
        }
    }

    /// Adds a node at the end of the collection.
    pub fn insert_node(&self, node: GraphNode) {
        self.state.lock().expect("document lock").nodes.push(node);
    }

    /// Adds an edge at the end of the collection.
    pub fn insert_edge(&self, edge: GraphEdge) {
        self.state.lock().expect("document lock").edges.push(edge);
    }

    /// Snapshot of all node ids, in insertion order.
    pub fn node_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("document lock")
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .collect()
    }

    /// Number of edges currently in the document.
    pub fn edge_count(&self) -> usize {
        self.state.lock().expect("document lock").edges.len()
    }

    /// Snapshot of all edges, in insertion order.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.state.lock().expect("document lock").edges.clone()
    }
}

impl GraphAccessor for GraphDocument {
    fn get_node(&self, id: &str) -> Option<GraphNode> {
        self.state
            .lock()
            .expect("document lock")
            .nodes
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    fn apply_to_nodes(&self, transform: NodesTransform) {
        let mut state = self.state.lock().expect("document lock");
        transform(&mut state.nodes);
    }

    fn apply_to_edges(&self, transform: EdgesTransform) {
        let mut state = self.state.lock().expect("document lock");
        transform(&mut state.edges);
    }

    fn apply_to_graph(&self, transform: GraphTransform) {
        let mut state = self.state.lock().expect("document lock");
        let DocumentState { nodes, edges } = &mut *state;
        transform(nodes, edges);
    }

    fn source_neighbors(&self, id: &str) -> Vec<GraphNode> {
        let state = self.state.lock().expect("document lock");
        state
            .edges
            .iter()
            .filter(|e| e.target == id)
            .filter_map(|e| state.nodes.iter().find(|n| n.id == e.source))
            .cloned()
            .collect()
    }

    fn target_neighbors(&self, id: &str) -> Vec<GraphNode> {
        let state = self.state.lock().expect("document lock");
        state
            .edges
            .iter()
            .filter(|e| e.source == id)
            .filter_map(|e| state.nodes.iter().find(|n| n.id == e.target))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::Position;

    fn pos() -> Position {
        Position { x: 0.0, y: 0.0 }
    }

    fn three_node_chain() -> GraphDocument {
        GraphDocument::with_graph(
            vec![
                GraphNode::text("a", pos(), "left"),
                GraphNode::text("b", pos(), "mid"),
                GraphNode::text("c", pos(), "right"),
            ],
            vec![GraphEdge::new("a", "b"), GraphEdge::new("b", "c")],
        )
    }

    /// **Scenario**: source_neighbors/target_neighbors follow edge direction.
    #[test]
    fn neighbors_follow_edge_direction() {
        let doc = three_node_chain();
        let sources: Vec<_> = doc.source_neighbors("b").into_iter().map(|n| n.id).collect();
        assert_eq!(sources, vec!["a"]);
        let targets: Vec<_> = doc.target_neighbors("b").into_iter().map(|n| n.id).collect();
        assert_eq!(targets, vec!["c"]);
        assert!(doc.source_neighbors("a").is_empty());
        assert!(doc.target_neighbors("c").is_empty());
    }

    /// **Scenario**: Neighbor order matches edge insertion order, not node order.
    #[test]
    fn neighbor_order_matches_edge_insertion_order() {
        let doc = GraphDocument::with_graph(
            vec![
                GraphNode::text("s1", pos(), ""),
                GraphNode::text("s2", pos(), ""),
                GraphNode::text("op", pos(), ""),
            ],
            vec![GraphEdge::new("s2", "op"), GraphEdge::new("s1", "op")],
        );
        let sources: Vec<_> = doc.source_neighbors("op").into_iter().map(|n| n.id).collect();
        assert_eq!(sources, vec!["s2", "s1"]);
    }

    /// **Scenario**: apply_to_graph mutates nodes and edges in one step.
    #[test]
    fn apply_to_graph_touches_both_collections() {
        let doc = three_node_chain();
        doc.apply_to_graph(Box::new(|nodes, edges| {
            nodes.push(GraphNode::text("d", Position { x: 1.0, y: 1.0 }, ""));
            edges.push(GraphEdge::new("c", "d"));
        }));
        assert_eq!(doc.node_ids(), vec!["a", "b", "c", "d"]);
        assert_eq!(doc.edge_count(), 3);
        let targets: Vec<_> = doc.target_neighbors("c").into_iter().map(|n| n.id).collect();
        assert_eq!(targets, vec!["d"]);
    }

    /// **Scenario**: get_node returns a snapshot; later transforms do not affect it.
    #[test]
    fn get_node_returns_snapshot() {
        let doc = three_node_chain();
        let before = doc.get_node("a").expect("node a");
        doc.apply_to_nodes(Box::new(|nodes| {
            for n in nodes.iter_mut() {
                if n.id == "a" {
                    if let crate::graph::node::NodeData::Content(c) = &mut n.data {
                        c.content = "changed".into();
                    }
                }
            }
        }));
        assert_eq!(before.content(), Some("left"));
        assert_eq!(doc.get_node("a").unwrap().content(), Some("changed"));
    }
}
