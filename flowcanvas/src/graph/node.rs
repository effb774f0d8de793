//! Graph node model: content nodes and operation nodes.
//!
//! Content nodes hold text or structured documents and a loading flag;
//! operation nodes hold the parameters the request compiler consumes.
//! The canvas owns node lifecycle; this crate only creates one result
//! node per materialized run (see `materialize`).

use serde::{Deserialize, Serialize};

/// Canvas position of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Returns this position shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Node kind, derived from [`NodeData`]. Distinguishes content nodes from
/// the four operation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Structured,
    EditText,
    EditStructured,
    SearchGoogle,
    SearchPerplexity,
}

impl NodeKind {
    /// True for the four operation kinds.
    pub fn is_operation(&self) -> bool {
        !matches!(self, NodeKind::Text | NodeKind::Structured)
    }

    /// Backend block type string for a node of this kind.
    pub fn block_type(&self) -> &'static str {
        match self {
            NodeKind::Structured | NodeKind::EditStructured => "structured",
            _ => "text",
        }
    }
}

/// How an edit-text operation slices its input.
///
/// Compiled to a `[start, end]` slice by the request compiler:
/// `All → [0,-1]`, `FirstN → [0,n]`, `LastN → [-n,-1]`,
/// `ExcludeFirstN → [n,-1]`, `ExcludeLastN → [0,-n]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnMode {
    All,
    FirstN,
    LastN,
    ExcludeFirstN,
    ExcludeLastN,
}

/// One segment of a structured-data path, as entered in the config menu.
///
/// `value` is kept as the raw string; the compiler coerces numeric-looking
/// values to indices at compile time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// UI row key (display only, not part of the compiled path).
    pub key: String,
    /// Raw segment value; `"2"` compiles to index `2`, `"a"` to key `"a"`.
    pub value: String,
}

impl PathEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Perplexity model selector; closed set mirrored from the config dropdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerplexityModel {
    Sonar,
    SonarPro,
    SonarReasoning,
}

impl PerplexityModel {
    /// Wire name of the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerplexityModel::Sonar => "sonar",
            PerplexityModel::SonarPro => "sonar-pro",
            PerplexityModel::SonarReasoning => "sonar-reasoning",
        }
    }
}

/// Parameters of an operation node, one variant per operation kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OperationParams {
    /// Text edit: slice `content` according to `return_mode` / `count`.
    EditText {
        /// Text the operation works on (the `content` field of the wire edge).
        content: String,
        return_mode: ReturnMode,
        /// The `n` of the `FirstN`/`LastN`/`Exclude*` modes; ignored by `All`.
        count: i64,
    },
    /// Structured edit: one backend operation built from `action` and `path`.
    EditStructured {
        /// UI action string; `"replace"` compiles to backend `"set_value"`.
        action: String,
        path: Vec<PathEntry>,
        /// Replacement value; required by `"replace"`, ignored otherwise.
        value: Option<String>,
    },
    /// Google web search over the first source neighbor's content.
    SearchGoogle { top_k: u32 },
    /// Perplexity question answering over the first source neighbor's content.
    SearchPerplexity { model: PerplexityModel },
}

impl OperationParams {
    /// Node kind implied by these parameters.
    pub fn kind(&self) -> NodeKind {
        match self {
            OperationParams::EditText { .. } => NodeKind::EditText,
            OperationParams::EditStructured { .. } => NodeKind::EditStructured,
            OperationParams::SearchGoogle { .. } => NodeKind::SearchGoogle,
            OperationParams::SearchPerplexity { .. } => NodeKind::SearchPerplexity,
        }
    }
}

/// Payload of a content node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    /// Current document text (or serialized structured document).
    pub content: String,
    /// True while a run is streaming into this node.
    pub loading: bool,
    /// Structured (table/JSON) vs. plain text document.
    pub structured: bool,
}

/// Payload of an operation node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationData {
    pub params: OperationParams,
    /// Back-reference written by the materializer when it creates the
    /// downstream result node for this operation.
    pub result_node: Option<String>,
}

/// Node payload: content or operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeData {
    Content(ContentData),
    Operation(OperationData),
}

/// One node of the workflow graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub position: Position,
    /// Display label; falls back to `id` when absent.
    pub label: Option<String>,
    pub data: NodeData,
}

impl GraphNode {
    /// Creates a plain text content node.
    pub fn text(id: impl Into<String>, position: Position, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            label: None,
            data: NodeData::Content(ContentData {
                content: content.into(),
                loading: false,
                structured: false,
            }),
        }
    }

    /// Creates a structured content node.
    pub fn structured(
        id: impl Into<String>,
        position: Position,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            label: None,
            data: NodeData::Content(ContentData {
                content: content.into(),
                loading: false,
                structured: true,
            }),
        }
    }

    /// Creates an operation node with the given parameters.
    pub fn operation(id: impl Into<String>, position: Position, params: OperationParams) -> Self {
        Self {
            id: id.into(),
            position,
            label: None,
            data: NodeData::Operation(OperationData {
                params,
                result_node: None,
            }),
        }
    }

    /// Sets the display label (builder style).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Node kind derived from the payload.
    pub fn kind(&self) -> NodeKind {
        match &self.data {
            NodeData::Content(c) if c.structured => NodeKind::Structured,
            NodeData::Content(_) => NodeKind::Text,
            NodeData::Operation(op) => op.params.kind(),
        }
    }

    /// Display label, defaulting to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Operation parameters, if this is an operation node.
    pub fn operation_params(&self) -> Option<&OperationParams> {
        match &self.data {
            NodeData::Operation(op) => Some(&op.params),
            NodeData::Content(_) => None,
        }
    }

    /// Content text, if this is a content node.
    pub fn content(&self) -> Option<&str> {
        match &self.data {
            NodeData::Content(c) => Some(&c.content),
            NodeData::Operation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: kind() is derived from the payload for all six kinds.
    #[test]
    fn kind_derived_from_payload() {
        let pos = Position { x: 0.0, y: 0.0 };
        assert_eq!(GraphNode::text("a", pos, "").kind(), NodeKind::Text);
        assert_eq!(GraphNode::structured("b", pos, "").kind(), NodeKind::Structured);
        assert_eq!(
            GraphNode::operation(
                "c",
                pos,
                OperationParams::EditText {
                    content: String::new(),
                    return_mode: ReturnMode::All,
                    count: 0,
                },
            )
            .kind(),
            NodeKind::EditText
        );
        assert_eq!(
            GraphNode::operation(
                "d",
                pos,
                OperationParams::EditStructured {
                    action: "get".into(),
                    path: vec![],
                    value: None,
                },
            )
            .kind(),
            NodeKind::EditStructured
        );
        assert_eq!(
            GraphNode::operation("e", pos, OperationParams::SearchGoogle { top_k: 5 }).kind(),
            NodeKind::SearchGoogle
        );
        assert_eq!(
            GraphNode::operation(
                "f",
                pos,
                OperationParams::SearchPerplexity {
                    model: PerplexityModel::Sonar,
                },
            )
            .kind(),
            NodeKind::SearchPerplexity
        );
    }

    /// **Scenario**: display_label falls back to id when no label is set.
    #[test]
    fn display_label_defaults_to_id() {
        let pos = Position { x: 0.0, y: 0.0 };
        let bare = GraphNode::text("n1", pos, "");
        assert_eq!(bare.display_label(), "n1");
        let labeled = GraphNode::text("n1", pos, "").with_label("My Note");
        assert_eq!(labeled.display_label(), "My Note");
    }

    /// **Scenario**: block_type maps structured kinds to "structured", the rest to "text".
    #[test]
    fn block_type_by_kind() {
        assert_eq!(NodeKind::Text.block_type(), "text");
        assert_eq!(NodeKind::Structured.block_type(), "structured");
        assert_eq!(NodeKind::EditStructured.block_type(), "structured");
        assert_eq!(NodeKind::SearchGoogle.block_type(), "text");
    }

    /// **Scenario**: Position::offset shifts both coordinates.
    #[test]
    fn position_offset_shifts_coordinates() {
        let p = Position { x: 10.0, y: 20.0 }.offset(160.0, -64.0);
        assert_eq!(p, Position { x: 170.0, y: -44.0 });
    }
}
