//! # flowcanvas
//!
//! Execution core of a visual workflow editor: users wire content nodes
//! through operation nodes (text editing, structured-data editing, web
//! search) on a graph canvas. This crate owns what happens when one
//! operation node runs: resolve its neighbors, compile the backend
//! request, guarantee a downstream result node exists, dispatch, and
//! stream results back into the live graph with per-node failure
//! isolation.
//!
//! ## Design Principles
//!
//! - **Atomic graph mutation**: The shared document is only ever changed
//!   through whole-collection transforms on [`GraphAccessor`]; no direct
//!   field mutation crosses the seam.
//! - **One controller per node**: [`RunRegistry`] hands out exactly one
//!   [`RunController`] per operation node; re-entrant triggers are dropped,
//!   not queued.
//! - **Snapshot compilation**: [`compile::compile_request`] snapshots every
//!   source and target block once; nothing is re-fetched mid-run.
//! - **Per-target isolation**: Each target's stream session resolves
//!   independently; one failure never stops the others, and loading flags
//!   are reset on every exit path.
//!
//! ## Main Modules
//!
//! - [`graph`]: nodes, edges, the shared document and neighbor resolution.
//! - [`compile`]: the operation-to-request compiler and wire types.
//! - [`materialize`]: creation of the missing downstream result node.
//! - [`dispatch`]: the execution endpoint client and result streaming.
//! - [`sync`]: the stream synchronizer (loading flags, error fan-out).
//! - [`run`]: the per-node state machine and controller registry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flowcanvas::config::ExecutorConfig;
//! use flowcanvas::dispatch::{HttpDispatcher, HttpResultStreamer};
//! use flowcanvas::feedback::LogFeedback;
//! use flowcanvas::graph::{GraphDocument, GraphNode, OperationParams, Position, ReturnMode};
//! use flowcanvas::run::RunRegistry;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), flowcanvas::RunError> {
//! let doc = Arc::new(GraphDocument::new());
//! doc.insert_node(GraphNode::operation(
//!     "edit",
//!     Position { x: 0.0, y: 0.0 },
//!     OperationParams::EditText {
//!         content: "hello".into(),
//!         return_mode: ReturnMode::All,
//!         count: 0,
//!     },
//! ));
//!
//! let config = ExecutorConfig::from_env();
//! let registry = RunRegistry::new(
//!     doc.clone(),
//!     Arc::new(HttpDispatcher::new(&config)),
//!     Arc::new(HttpResultStreamer::new(&config, doc.clone())),
//!     Arc::new(LogFeedback),
//! );
//! registry.trigger("edit").await?;
//! # Ok(())
//! # }
//! ```
//!
//! Runnable demos live in `flowcanvas-examples`, not in this crate.

pub mod compile;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod graph;
pub mod materialize;
pub mod run;
pub mod sync;

pub use compile::{compile_request, ExecutionRequest};
pub use config::ExecutorConfig;
pub use dispatch::{ExecutionDispatcher, HttpDispatcher, HttpResultStreamer, ResultStreamer, TaskHandle};
pub use error::RunError;
pub use feedback::{LogFeedback, RecordingFeedback, RunFeedback};
pub use graph::{
    GraphAccessor, GraphDocument, GraphEdge, GraphNode, NeighborDescriptor, NeighborResolver,
    NodeData, NodeKind, OperationParams, PathEntry, PerplexityModel, Position, ReturnMode,
};
pub use materialize::TargetMaterializer;
pub use run::{RunController, RunRegistry, RunState, TriggerOutcome};
pub use sync::{StreamSynchronizer, SyncOutcome};
