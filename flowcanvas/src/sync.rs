//! Stream synchronizer: dispatch one request and stream results into the
//! graph with per-target failure isolation.
//!
//! Before dispatch every target's content is cleared and its loading flag
//! set, in one atomic node transform. On rejection every target gets an
//! independent error report; on success one stream session runs per target
//! and each resolves on its own. The loading reset for every target is
//! guaranteed on every exit path by a drop guard.

use std::sync::Arc;

use futures::future::join_all;

use crate::compile::ExecutionRequest;
use crate::dispatch::{ExecutionDispatcher, ResultStreamer, TaskHandle};
use crate::error::RunError;
use crate::feedback::RunFeedback;
use crate::graph::{GraphAccessor, NeighborDescriptor, NodeData};
use crate::run::logging;

/// Outcome of a dispatched-and-streamed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Handle the backend assigned to this run.
    pub task: TaskHandle,
    /// Targets whose stream session failed (errors already reported).
    pub failed_targets: Vec<String>,
}

/// Clears loading flags and notifies the UI for a set of targets when
/// dropped. Guarantees the reset on every exit path, including errors.
struct LoadingReset {
    accessor: Arc<dyn GraphAccessor>,
    feedback: Arc<dyn RunFeedback>,
    target_ids: Vec<String>,
}

impl Drop for LoadingReset {
    fn drop(&mut self) {
        let ids = self.target_ids.clone();
        self.accessor.apply_to_nodes(Box::new(move |nodes| {
            for node in nodes.iter_mut() {
                if ids.iter().any(|id| *id == node.id) {
                    if let NodeData::Content(c) = &mut node.data {
                        c.loading = false;
                    }
                }
            }
        }));
        for id in &self.target_ids {
            self.feedback.reset_loading(id);
        }
    }
}

/// Streams incremental output into each target node, manages loading flags
/// and reports per-node errors.
///
/// **Interaction**: Owned by [`RunController`](crate::run::RunController);
/// drives `ExecutionDispatcher` and `ResultStreamer` and mutates the graph
/// only through atomic transforms.
pub struct StreamSynchronizer {
    accessor: Arc<dyn GraphAccessor>,
    streamer: Arc<dyn ResultStreamer>,
    feedback: Arc<dyn RunFeedback>,
}

impl StreamSynchronizer {
    pub fn new(
        accessor: Arc<dyn GraphAccessor>,
        streamer: Arc<dyn ResultStreamer>,
        feedback: Arc<dyn RunFeedback>,
    ) -> Self {
        Self {
            accessor,
            streamer,
            feedback,
        }
    }

    /// Clears every target's content and sets its loading flag, atomically.
    fn prepare_targets(&self, targets: &[NeighborDescriptor]) {
        let ids: Vec<String> = targets.iter().map(|t| t.id.clone()).collect();
        self.accessor.apply_to_nodes(Box::new(move |nodes| {
            for node in nodes.iter_mut() {
                if ids.iter().any(|id| *id == node.id) {
                    if let NodeData::Content(c) = &mut node.data {
                        c.content.clear();
                        c.loading = true;
                    }
                }
            }
        }));
    }

    /// Dispatches the request and streams results into every target.
    ///
    /// `on_streaming` fires once dispatch has succeeded, before stream
    /// sessions open (the controller advances its state machine there).
    ///
    /// # Errors
    ///
    /// Returns the dispatch error after reporting it to every target.
    /// Individual stream failures do not fail the run; they are reported
    /// per target and listed in the outcome.
    pub async fn run(
        &self,
        dispatcher: &dyn ExecutionDispatcher,
        request: &ExecutionRequest,
        targets: &[NeighborDescriptor],
        on_streaming: impl FnOnce(),
    ) -> Result<SyncOutcome, RunError> {
        let _reset = LoadingReset {
            accessor: self.accessor.clone(),
            feedback: self.feedback.clone(),
            target_ids: targets.iter().map(|t| t.id.clone()).collect(),
        };

        self.prepare_targets(targets);

        let task = match dispatcher.dispatch(request).await {
            Ok(task) => task,
            Err(err) => {
                // Every target gets its own report; no short-circuiting.
                let message = err.to_string();
                for target in targets {
                    self.feedback.report_error(&target.id, &message);
                }
                return Err(err);
            }
        };

        on_streaming();

        let sessions = targets.iter().map(|target| {
            let task = task.clone();
            async move {
                self.streamer
                    .stream_result(&task, &target.id)
                    .await
                    .map_err(|err| (target.id.clone(), err))
            }
        });

        let mut failed_targets = Vec::new();
        for result in join_all(sessions).await {
            if let Err((target_id, err)) = result {
                self.feedback.report_error(&target_id, &err.to_string());
                logging::log_node_error(&target_id, &err.to_string());
                failed_targets.push(target_id);
            }
        }

        Ok(SyncOutcome {
            task,
            failed_targets,
        })
    }
}
