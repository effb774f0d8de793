//! Graph access trait: lookups plus atomic whole-collection transforms.
//!
//! The graph document is a single shared mutable structure; every mutation
//! goes through an `apply_*` transform that runs atomically relative to all
//! other transforms. Callers never mutate fields directly.

use super::edge::GraphEdge;
use super::node::GraphNode;

/// Transform over the node collection.
pub type NodesTransform = Box<dyn FnOnce(&mut Vec<GraphNode>) + Send>;
/// Transform over the edge collection.
pub type EdgesTransform = Box<dyn FnOnce(&mut Vec<GraphEdge>) + Send>;
/// Transform over both collections in one atomic step.
pub type GraphTransform = Box<dyn FnOnce(&mut Vec<GraphNode>, &mut Vec<GraphEdge>) + Send>;

/// Node/edge lookup and atomic bulk-update primitives.
///
/// **Interaction**: Consumed as `Arc<dyn GraphAccessor>` by the resolver,
/// materializer and stream synchronizer. [`GraphDocument`](super::GraphDocument)
/// is the in-memory reference implementation; the canvas layer provides the
/// production one.
pub trait GraphAccessor: Send + Sync {
    /// Returns a snapshot of the node with the given id, if present.
    fn get_node(&self, id: &str) -> Option<GraphNode>;

    /// Applies a transform to the node collection, atomically relative to
    /// every other `apply_*` call.
    fn apply_to_nodes(&self, transform: NodesTransform);

    /// Applies a transform to the edge collection, atomically relative to
    /// every other `apply_*` call.
    fn apply_to_edges(&self, transform: EdgesTransform);

    /// Applies a transform to nodes and edges in one atomic step. Used by
    /// the materializer, which must create a node and its edge together.
    fn apply_to_graph(&self, transform: GraphTransform);

    /// Nodes feeding into `id`, in edge insertion order.
    fn source_neighbors(&self, id: &str) -> Vec<GraphNode>;

    /// Nodes `id` feeds into, in edge insertion order.
    fn target_neighbors(&self, id: &str) -> Vec<GraphNode>;
}
