//! Target materializer: creates the downstream result node for a run.
//!
//! Called only when resolution reports zero targets for the operation node.
//! Creates exactly one content node plus its connecting edge and writes the
//! `result_node` back-reference onto the parent, all in a single atomic
//! graph transform. The run re-resolves targets afterwards; materialization
//! and dispatch never share a resolution snapshot.

use std::sync::Arc;

use crate::error::RunError;
use crate::graph::{
    ContentData, GraphAccessor, GraphEdge, GraphNode, NodeData, OperationParams,
};

/// Canvas offset of a materialized result node relative to its parent.
pub const RESULT_OFFSET: (f64, f64) = (160.0, -64.0);

/// Creates the missing downstream result node for an operation node.
///
/// **Interaction**: Holds an `Arc<dyn GraphAccessor>`; invoked by
/// [`RunController`](crate::run::RunController) in the `Materializing` phase.
#[derive(Clone)]
pub struct TargetMaterializer {
    accessor: Arc<dyn GraphAccessor>,
}

impl TargetMaterializer {
    pub fn new(accessor: Arc<dyn GraphAccessor>) -> Self {
        Self { accessor }
    }

    /// Picks an unused id for the result node of `parent_id`.
    fn result_node_id(&self, parent_id: &str) -> String {
        let base = format!("{}-result", parent_id);
        if self.accessor.get_node(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.accessor.get_node(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Creates one result node and one connecting edge for `parent_id`.
    ///
    /// The node starts empty with `loading = true`, offset `(+160, -64)`
    /// from the parent, structured for edit-structured parents and plain
    /// text for every other operation. Returns the new node's id.
    ///
    /// # Errors
    ///
    /// Returns `RunError::InvalidNode` if the parent is missing or not an
    /// operation node.
    pub fn materialize(&self, parent_id: &str) -> Result<String, RunError> {
        let parent = self
            .accessor
            .get_node(parent_id)
            .ok_or_else(|| RunError::InvalidNode(parent_id.to_string()))?;
        let structured = matches!(
            parent.data,
            NodeData::Operation(ref op) if matches!(op.params, OperationParams::EditStructured { .. })
        );
        if !matches!(parent.data, NodeData::Operation(_)) {
            return Err(RunError::InvalidNode(parent_id.to_string()));
        }

        let new_id = self.result_node_id(parent_id);
        let position = parent.position.offset(RESULT_OFFSET.0, RESULT_OFFSET.1);
        let parent_id_owned = parent_id.to_string();
        let node_id = new_id.clone();

        // One transform: node, edge and the parent back-reference land together.
        self.accessor.apply_to_graph(Box::new(move |nodes, edges| {
            nodes.push(GraphNode {
                id: node_id.clone(),
                position,
                label: None,
                data: NodeData::Content(ContentData {
                    content: String::new(),
                    loading: true,
                    structured,
                }),
            });
            edges.push(GraphEdge::new(parent_id_owned.clone(), node_id.clone()));
            if let Some(parent) = nodes.iter_mut().find(|n| n.id == parent_id_owned) {
                if let NodeData::Operation(op) = &mut parent.data {
                    op.result_node = Some(node_id);
                }
            }
        }));

        Ok(new_id)
    }
}
