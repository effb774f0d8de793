//! Request compiler: one pure mapping per operation kind.
//!
//! Takes the triggered operation node, the resolved neighbor descriptors
//! and a graph accessor for content snapshots, and produces the
//! [`ExecutionRequest`] the dispatcher sends. Blocks are snapshotted here,
//! once, and never re-fetched mid-run.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::RunError;
use crate::graph::{GraphAccessor, GraphNode, NeighborDescriptor, OperationParams, PathEntry, ReturnMode};

use super::request::{
    BlockSpec, EdgeSpec, EditStructuredConfigs, EditStructuredEdge, EditTextConfigs, EditTextEdge,
    EmptyConfigs, ExecutionRequest, GoogleSearchEdge, ModifyEdge, PerplexityConfigs,
    PerplexitySearchEdge, QaSearchType, SearchEdge, SortType, StructuredOp, StructuredOpParams,
    WebSearchType,
};

/// Fallback the backend returns when a `get` path does not exist.
pub const GET_FAILED_DEFAULT: &str = "Get Failed, value not exist";

/// Depth bound for `get_keys` / `get_values` traversal.
pub const KEYS_MAX_DEPTH: u32 = 100;

/// Compiles a `[start, end]` slice from an edit-text return mode and count.
pub fn slice_for(mode: ReturnMode, n: i64) -> [i64; 2] {
    match mode {
        ReturnMode::All => [0, -1],
        ReturnMode::FirstN => [0, n],
        ReturnMode::LastN => [-n, -1],
        ReturnMode::ExcludeFirstN => [n, -1],
        ReturnMode::ExcludeLastN => [0, -n],
    }
}

/// Coerces one raw path segment: numeric-looking values become JSON numbers
/// (indices), everything else stays a string key. NaN never counts as
/// numeric.
pub fn coerce_segment(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(raw.to_string())
}

/// Compiles the ordered path entries into backend path segments.
pub fn compile_path(path: &[PathEntry]) -> Vec<Value> {
    path.iter().map(|e| coerce_segment(&e.value)).collect()
}

/// Compiles one structured-data operation from the UI action, path and
/// replacement value.
///
/// `"replace"` becomes backend `"set_value"` and carries `params.value`;
/// `"get"` carries the not-found default; `"get_keys"` / `"get_values"`
/// carry a depth bound instead of a path; every other action passes through
/// unchanged with the compiled path.
pub fn compile_structured_op(action: &str, path: &[PathEntry], value: Option<&str>) -> StructuredOp {
    match action {
        "replace" => StructuredOp {
            op_type: "set_value".into(),
            params: StructuredOpParams {
                path: Some(compile_path(path)),
                value: Some(value.unwrap_or_default().to_string()),
                ..Default::default()
            },
        },
        "get" => StructuredOp {
            op_type: "get".into(),
            params: StructuredOpParams {
                path: Some(compile_path(path)),
                default: Some(GET_FAILED_DEFAULT.into()),
                ..Default::default()
            },
        },
        "get_keys" | "get_values" => StructuredOp {
            op_type: action.into(),
            params: StructuredOpParams {
                max_depth: Some(KEYS_MAX_DEPTH),
                ..Default::default()
            },
        },
        other => StructuredOp {
            op_type: other.into(),
            params: StructuredOpParams {
                path: Some(compile_path(path)),
                ..Default::default()
            },
        },
    }
}

fn id_label_map(neighbors: &[NeighborDescriptor]) -> BTreeMap<String, String> {
    neighbors
        .iter()
        .map(|n| (n.id.clone(), n.label.clone()))
        .collect()
}

/// Snapshots one neighbor as a block. Sources carry their current content;
/// targets get an empty placeholder. A neighbor deleted since resolution
/// degrades to an empty text block rather than failing the run.
fn block_for(
    accessor: &dyn GraphAccessor,
    neighbor: &NeighborDescriptor,
    placeholder: bool,
) -> BlockSpec {
    match accessor.get_node(&neighbor.id) {
        Some(node) => {
            let content = if placeholder {
                String::new()
            } else {
                node.content().unwrap_or_default().to_string()
            };
            BlockSpec::new(neighbor.label.clone(), node.kind().block_type(), content)
        }
        None => BlockSpec::new(neighbor.label.clone(), "text", ""),
    }
}

/// Compiles the full execution request for one operation node.
///
/// Pure apart from content snapshots read through `accessor`. `blocks`
/// contains an entry for every resolved source and target; `edges` has one
/// entry keyed by the operation node's id.
///
/// # Errors
///
/// Returns `RunError::InvalidNode` if `node` is not an operation node.
pub fn compile_request(
    node: &GraphNode,
    sources: &[NeighborDescriptor],
    targets: &[NeighborDescriptor],
    accessor: &dyn GraphAccessor,
) -> Result<ExecutionRequest, RunError> {
    let params = node
        .operation_params()
        .ok_or_else(|| RunError::InvalidNode(node.id.clone()))?;

    let inputs = id_label_map(sources);
    let outputs = id_label_map(targets);
    // query_id addresses the first source only; searches with no upstream
    // node dispatch with an empty query id and rely on backend rejection.
    let query_id = sources.first().map(|s| s.id.clone()).unwrap_or_default();

    let edge = match params {
        OperationParams::EditText {
            content,
            return_mode,
            count,
        } => EdgeSpec::Modify(ModifyEdge::EditText(EditTextEdge {
            extra_configs: EditTextConfigs {
                slice: slice_for(*return_mode, *count),
                sort_type: SortType::Slash,
            },
            content: content.clone(),
            inputs,
            outputs,
        })),
        OperationParams::EditStructured { action, path, value } => {
            EdgeSpec::Modify(ModifyEdge::EditStructured(EditStructuredEdge {
                extra_configs: EditStructuredConfigs {
                    operations: vec![compile_structured_op(action, path, value.as_deref())],
                },
                content: String::new(),
                inputs,
                outputs,
            }))
        }
        OperationParams::SearchGoogle { top_k } => {
            EdgeSpec::Search(SearchEdge::Google(GoogleSearchEdge {
                search_type: WebSearchType::Web,
                top_k: *top_k,
                query_id,
                extra_configs: EmptyConfigs::default(),
                inputs,
                outputs,
            }))
        }
        OperationParams::SearchPerplexity { model } => {
            EdgeSpec::Search(SearchEdge::Perplexity(PerplexitySearchEdge {
                search_type: QaSearchType::Qa,
                extra_configs: PerplexityConfigs {
                    model: model.as_str().into(),
                },
                query_id,
                inputs,
                outputs,
            }))
        }
    };

    let mut blocks = BTreeMap::new();
    for source in sources {
        blocks.insert(source.id.clone(), block_for(accessor, source, false));
    }
    for target in targets {
        blocks.insert(target.id.clone(), block_for(accessor, target, true));
    }

    Ok(ExecutionRequest {
        blocks,
        edges: BTreeMap::from([(node.id.clone(), edge)]),
    })
}
