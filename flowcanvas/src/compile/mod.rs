//! Operation-to-request compiler and backend wire types.
//!
//! Pure mapping from `(operation kind, parameters, neighbor descriptors)`
//! to an [`ExecutionRequest`]. No schema validation happens here; malformed
//! requests surface as backend rejections at dispatch time.

mod compiler;
mod request;

pub use compiler::{
    coerce_segment, compile_path, compile_request, compile_structured_op, slice_for,
    GET_FAILED_DEFAULT, KEYS_MAX_DEPTH,
};
pub use request::{
    BlockData, BlockSpec, EdgeSpec, EditStructuredConfigs, EditStructuredEdge, EditTextConfigs,
    EditTextEdge, EmptyConfigs, ExecutionRequest, GoogleSearchEdge, ModifyEdge, PerplexityConfigs,
    PerplexitySearchEdge, QaSearchType, SearchEdge, SortType, StructuredOp, StructuredOpParams,
    WebSearchType,
};
