//! Run execution error types.
//!
//! Used by `RunController::trigger` and every collaborator on the dispatch
//! path. Zero resolved targets before materialization is benign (it triggers
//! materialization) and is deliberately not represented here.

use thiserror::Error;

/// Error raised while executing an operation node.
///
/// `Network` and `BackendRejection` come from the dispatcher, `Stream` from
/// a per-target stream session. `NoTargets` is the dead end reached when a
/// run still resolves zero targets after its one materialization attempt.
#[derive(Debug, Error)]
pub enum RunError {
    /// Transport-level failure before any backend response was received.
    #[error("network failure: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status.
    #[error("backend rejected request ({status}): {body}")]
    BackendRejection {
        /// HTTP status code.
        status: u16,
        /// Response body, forwarded as-is for diagnostics.
        body: String,
    },

    /// A per-target stream session failed after dispatch succeeded.
    #[error("stream failed for node {node_id}: {message}")]
    Stream {
        /// Target node whose session failed.
        node_id: String,
        /// Failure message from the streaming collaborator.
        message: String,
    },

    /// Zero targets resolved even after materialization was attempted once.
    #[error("no target node available for {0} after materialization")]
    NoTargets(String),

    /// The triggered node is missing or is not an operation node.
    #[error("node {0} is not a runnable operation")]
    InvalidNode(String),
}
