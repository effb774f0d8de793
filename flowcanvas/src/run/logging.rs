//! Logging utilities for run execution.
//!
//! Structured logging for run phases, materialization, dispatch and
//! per-target stream outcomes. With the `tracing` feature the `tracing`
//! crate is used; otherwise events go to stderr.

use crate::error::RunError;
use crate::run::RunState;

/// Log a run trigger being accepted.
pub fn log_run_start(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(node_id = node_id, "Starting run");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Starting run: {}", node_id);
}

/// Log a trigger dropped because a run is already in flight.
pub fn log_trigger_dropped(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, "Trigger dropped, run already in flight");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Trigger dropped, run already in flight: {}", node_id);
}

/// Log a state-machine phase transition.
pub fn log_phase(node_id: &str, state: RunState) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, ?state, "Run phase");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Run phase: {} -> {:?}", node_id, state);
}

/// Log a materialized result node.
pub fn log_materialized(node_id: &str, result_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::info!(node_id = node_id, result_id = result_id, "Materialized result node");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[INFO] Materialized result node: {} -> {}", node_id, result_id);
}

/// Log a run settling with an error.
pub fn log_run_error(node_id: &str, error: &RunError) {
    #[cfg(feature = "tracing")]
    tracing::error!(node_id = node_id, ?error, "Run failed");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[ERROR] Run failed: {}: {:?}", node_id, error);
}

/// Log an error attributed to one node (feedback path).
pub fn log_node_error(node_id: &str, message: &str) {
    #[cfg(feature = "tracing")]
    tracing::error!(node_id = node_id, message = message, "Node error");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[ERROR] Node error: {}: {}", node_id, message);
}

/// Log a loading-indicator reset (feedback path).
pub fn log_loading_reset(node_id: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(node_id = node_id, "Loading reset");

    #[cfg(not(feature = "tracing"))]
    eprintln!("[DEBUG] Loading reset: {}", node_id);
}
