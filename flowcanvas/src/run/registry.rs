//! Run registry: exactly one controller per operation node id.
//!
//! The per-node re-entrancy guard only works if every trigger for a node
//! goes through the same controller instance; the registry owns that
//! invariant and hands out `Arc<RunController>`s.

use std::sync::Arc;

use dashmap::DashMap;

use crate::dispatch::{ExecutionDispatcher, ResultStreamer};
use crate::error::RunError;
use crate::feedback::RunFeedback;
use crate::graph::GraphAccessor;

use super::{RunController, TriggerOutcome};

/// Hands out the single [`RunController`] for each operation node.
///
/// **Interaction**: Owned by the editor shell; collaborator handles are
/// cloned into every controller it creates. Controllers for distinct nodes
/// run independently and concurrently.
pub struct RunRegistry {
    accessor: Arc<dyn GraphAccessor>,
    dispatcher: Arc<dyn ExecutionDispatcher>,
    streamer: Arc<dyn ResultStreamer>,
    feedback: Arc<dyn RunFeedback>,
    controllers: DashMap<String, Arc<RunController>>,
}

impl RunRegistry {
    pub fn new(
        accessor: Arc<dyn GraphAccessor>,
        dispatcher: Arc<dyn ExecutionDispatcher>,
        streamer: Arc<dyn ResultStreamer>,
        feedback: Arc<dyn RunFeedback>,
    ) -> Self {
        Self {
            accessor,
            dispatcher,
            streamer,
            feedback,
            controllers: DashMap::new(),
        }
    }

    /// Returns the controller for `node_id`, creating it on first use.
    pub fn controller(&self, node_id: &str) -> Arc<RunController> {
        self.controllers
            .entry(node_id.to_string())
            .or_insert_with(|| {
                Arc::new(RunController::new(
                    node_id,
                    self.accessor.clone(),
                    self.dispatcher.clone(),
                    self.streamer.clone(),
                    self.feedback.clone(),
                ))
            })
            .clone()
    }

    /// Triggers a run for `node_id` through its single controller.
    pub async fn trigger(&self, node_id: &str) -> Result<TriggerOutcome, RunError> {
        self.controller(node_id).trigger().await
    }

    /// Stops (resets) the controller for `node_id`, if one exists.
    pub fn stop(&self, node_id: &str) {
        if let Some(controller) = self.controllers.get(node_id) {
            controller.stop();
        }
    }

    /// Drops the controller for a node the canvas deleted.
    pub fn remove(&self, node_id: &str) {
        self.controllers.remove(node_id);
    }
}
