//! Graph edge model: a directed source → target connection.

use serde::{Deserialize, Serialize};

/// One directed edge of the workflow graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    /// Node the edge leaves from.
    pub source: String,
    /// Node the edge points to.
    pub target: String,
}

impl GraphEdge {
    /// Creates an edge with a deterministic id derived from its endpoints.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}__{}", source, target),
            source,
            target,
        }
    }
}
