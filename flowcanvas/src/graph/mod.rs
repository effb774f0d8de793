//! Workflow graph model: nodes, edges, shared document, neighbor resolution.
//!
//! The canvas layer owns rendering and node lifecycle; this module owns the
//! shared document and the atomic-transform access contract every run-path
//! component goes through.

mod accessor;
mod document;
mod edge;
mod node;
mod resolver;

pub use accessor::{EdgesTransform, GraphAccessor, GraphTransform, NodesTransform};
pub use document::GraphDocument;
pub use edge::GraphEdge;
pub use node::{
    ContentData, GraphNode, NodeData, NodeKind, OperationData, OperationParams, PathEntry,
    PerplexityModel, Position, ReturnMode,
};
pub use resolver::{NeighborDescriptor, NeighborResolver};
