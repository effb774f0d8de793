//! Backend wire types for one execution request.
//!
//! Field names and tag values are part of the backend protocol; the serde
//! attributes here pin them. `BTreeMap` keeps serialized key order stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full payload POSTed to the execution endpoint for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Snapshot of every resolved source and target node, keyed by node id.
    pub blocks: BTreeMap<String, BlockSpec>,
    /// One edge spec per operation node, keyed by the owning node's id.
    pub edges: BTreeMap<String, EdgeSpec>,
}

/// Minimal backend-facing snapshot of one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub data: BlockData,
}

/// Content payload of a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    pub content: String,
}

impl BlockSpec {
    pub fn new(
        label: impl Into<String>,
        block_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            block_type: block_type.into(),
            data: BlockData {
                content: content.into(),
            },
        }
    }
}

/// Tagged edge spec: `{"type": "modify"|"search", "data": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EdgeSpec {
    Modify(ModifyEdge),
    Search(SearchEdge),
}

/// Modify edge data, tagged by `modify_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modify_type", rename_all = "snake_case")]
pub enum ModifyEdge {
    EditText(EditTextEdge),
    EditStructured(EditStructuredEdge),
}

/// `modify_type = "edit_text"` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditTextEdge {
    pub extra_configs: EditTextConfigs,
    pub content: String,
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

/// Slice configuration of an edit-text edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditTextConfigs {
    pub slice: [i64; 2],
    pub sort_type: SortType,
}

/// `sort_type` wire value. The protocol only knows `"/"`, so the type
/// admits nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[default]
    #[serde(rename = "/")]
    Slash,
}

/// `modify_type = "edit_structured"` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditStructuredEdge {
    pub extra_configs: EditStructuredConfigs,
    pub content: String,
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

/// Operation list of an edit-structured edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditStructuredConfigs {
    pub operations: Vec<StructuredOp>,
}

/// One backend structured-data operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredOp {
    #[serde(rename = "type")]
    pub op_type: String,
    pub params: StructuredOpParams,
}

/// Parameters of a structured-data operation. Absent fields are omitted
/// from the wire entirely.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredOpParams {
    /// Compiled path: numeric segments are indices, the rest string keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    /// Replacement value (`set_value` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Fallback returned by `get` when the path does not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Traversal depth bound (`get_keys` / `get_values`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

/// Search edge data, tagged by `sub_search_type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sub_search_type", rename_all = "lowercase")]
pub enum SearchEdge {
    Google(GoogleSearchEdge),
    Perplexity(PerplexitySearchEdge),
}

/// `sub_search_type = "google"` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoogleSearchEdge {
    pub search_type: WebSearchType,
    pub top_k: u32,
    /// Id of the source node whose content is the query.
    pub query_id: String,
    pub extra_configs: EmptyConfigs,
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

/// `search_type` of a google edge, pinned to `"web"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebSearchType {
    #[default]
    #[serde(rename = "web")]
    Web,
}

/// `sub_search_type = "perplexity"` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerplexitySearchEdge {
    pub search_type: QaSearchType,
    pub extra_configs: PerplexityConfigs,
    /// Id of the source node whose content is the question.
    pub query_id: String,
    pub inputs: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, String>,
}

/// `search_type` of a perplexity edge, pinned to `"qa"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QaSearchType {
    #[default]
    #[serde(rename = "qa")]
    Qa,
}

/// Model selector of a perplexity edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerplexityConfigs {
    pub model: String,
}

/// Serializes as `{}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyConfigs {}
