//! Per-node run controller: the state machine sequencing one execution.
//!
//! `Idle → Resolving → (Materializing → Resolving) → Dispatching →
//! Streaming → Settled → Idle`. A trigger while not `Idle` is silently
//! dropped, never queued. Materialization happens at most once per run and
//! always precedes dispatch; dispatch never runs against a zero-target
//! resolution snapshot.

pub mod logging;
mod registry;

pub use registry::RunRegistry;

use std::sync::{Arc, Mutex};

use crate::compile::compile_request;
use crate::dispatch::{ExecutionDispatcher, ResultStreamer};
use crate::error::RunError;
use crate::feedback::RunFeedback;
use crate::graph::{GraphAccessor, NeighborResolver};
use crate::materialize::TargetMaterializer;
use crate::sync::{StreamSynchronizer, SyncOutcome};

/// Phase of a run. Exactly one lives per operation node at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Resolving,
    Materializing,
    Dispatching,
    Streaming,
    Settled,
}

/// What a trigger call did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The run executed to settlement.
    Ran(SyncOutcome),
    /// A run was already in flight for this node; the trigger was a no-op.
    Dropped,
}

/// Resets the controller state to Idle on every exit path.
struct SettleToIdle<'a> {
    state: &'a Mutex<RunState>,
}

impl Drop for SettleToIdle<'_> {
    fn drop(&mut self) {
        *self.state.lock().expect("run state lock") = RunState::Idle;
    }
}

/// Sequences one operation node's execution: resolve, materialize if
/// needed, compile, dispatch, stream, settle.
///
/// **Interaction**: One instance per operation node id, handed out by
/// [`RunRegistry`]. Re-entrant triggers on the same instance are dropped;
/// runs for different nodes are independent.
pub struct RunController {
    node_id: String,
    accessor: Arc<dyn GraphAccessor>,
    dispatcher: Arc<dyn ExecutionDispatcher>,
    resolver: NeighborResolver,
    materializer: TargetMaterializer,
    synchronizer: StreamSynchronizer,
    feedback: Arc<dyn RunFeedback>,
    state: Mutex<RunState>,
}

impl RunController {
    pub fn new(
        node_id: impl Into<String>,
        accessor: Arc<dyn GraphAccessor>,
        dispatcher: Arc<dyn ExecutionDispatcher>,
        streamer: Arc<dyn ResultStreamer>,
        feedback: Arc<dyn RunFeedback>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            resolver: NeighborResolver::new(accessor.clone()),
            materializer: TargetMaterializer::new(accessor.clone()),
            synchronizer: StreamSynchronizer::new(
                accessor.clone(),
                streamer,
                feedback.clone(),
            ),
            accessor,
            dispatcher,
            feedback,
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Operation node this controller runs.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Current phase.
    pub fn state(&self) -> RunState {
        *self.state.lock().expect("run state lock")
    }

    /// Resets the local flag to Idle. Does NOT cancel an in-flight dispatch
    /// or stream; those run to completion in the background. Documented
    /// limitation, mirrored by the UI's stop button.
    pub fn stop(&self) {
        *self.state.lock().expect("run state lock") = RunState::Idle;
        logging::log_phase(&self.node_id, RunState::Idle);
    }

    /// Atomically claims the Idle → Resolving transition.
    fn begin(&self) -> bool {
        let mut state = self.state.lock().expect("run state lock");
        if *state != RunState::Idle {
            return false;
        }
        *state = RunState::Resolving;
        true
    }

    fn set_state(&self, next: RunState) {
        *self.state.lock().expect("run state lock") = next;
        logging::log_phase(&self.node_id, next);
    }

    /// Triggers one run. A trigger while a run is in flight is dropped.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures (already reported per target by the
    /// synchronizer) and the pre-dispatch failures `InvalidNode` /
    /// `NoTargets`, which are additionally reported on the operation node.
    pub async fn trigger(&self) -> Result<TriggerOutcome, RunError> {
        if !self.begin() {
            logging::log_trigger_dropped(&self.node_id);
            return Ok(TriggerOutcome::Dropped);
        }
        logging::log_run_start(&self.node_id);
        let _settle = SettleToIdle { state: &self.state };

        match self.run_once().await {
            Ok(outcome) => Ok(TriggerOutcome::Ran(outcome)),
            Err(err) => {
                logging::log_run_error(&self.node_id, &err);
                if matches!(err, RunError::InvalidNode(_) | RunError::NoTargets(_)) {
                    // Dispatch-path errors were already fanned out per
                    // target; these never reached the targets.
                    self.feedback.report_error(&self.node_id, &err.to_string());
                }
                Err(err)
            }
        }
    }

    async fn run_once(&self) -> Result<SyncOutcome, RunError> {
        let node = self
            .accessor
            .get_node(&self.node_id)
            .filter(|n| n.kind().is_operation())
            .ok_or_else(|| RunError::InvalidNode(self.node_id.clone()))?;

        let mut targets = self.resolver.targets(&self.node_id);
        if targets.is_empty() {
            // At most one materialization attempt per run, then a fresh
            // resolution; the pre-materialization snapshot is never
            // dispatched against.
            self.set_state(RunState::Materializing);
            let result_id = self.materializer.materialize(&self.node_id)?;
            logging::log_materialized(&self.node_id, &result_id);
            self.set_state(RunState::Resolving);
            targets = self.resolver.targets(&self.node_id);
        }
        if targets.is_empty() {
            return Err(RunError::NoTargets(self.node_id.clone()));
        }

        let sources = self.resolver.sources(&self.node_id);
        let request = compile_request(&node, &sources, &targets, self.accessor.as_ref())?;

        self.set_state(RunState::Dispatching);
        let outcome = self
            .synchronizer
            .run(self.dispatcher.as_ref(), &request, &targets, || {
                self.set_state(RunState::Streaming)
            })
            .await?;
        self.set_state(RunState::Settled);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::ExecutionRequest;
    use crate::dispatch::mock::{MockDispatcher, MockStreamer};
    use crate::dispatch::TaskHandle;
    use crate::feedback::RecordingFeedback;
    use crate::graph::{
        GraphDocument, GraphEdge, GraphNode, OperationParams, Position, ReturnMode,
    };
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn pos() -> Position {
        Position { x: 0.0, y: 0.0 }
    }

    fn edit_text_op(id: &str) -> GraphNode {
        GraphNode::operation(
            id,
            pos(),
            OperationParams::EditText {
                content: "hi".into(),
                return_mode: ReturnMode::All,
                count: 0,
            },
        )
    }

    fn wired_doc() -> Arc<GraphDocument> {
        Arc::new(GraphDocument::with_graph(
            vec![
                GraphNode::text("s1", pos(), "input").with_label("Src"),
                edit_text_op("op"),
                GraphNode::text("t1", pos(), ""),
            ],
            vec![GraphEdge::new("s1", "op"), GraphEdge::new("op", "t1")],
        ))
    }

    fn controller_for(
        doc: Arc<GraphDocument>,
        dispatcher: Arc<dyn ExecutionDispatcher>,
        node_id: &str,
    ) -> (RunController, Arc<RecordingFeedback>) {
        let feedback = Arc::new(RecordingFeedback::new());
        let streamer = Arc::new(MockStreamer::new(doc.clone(), vec!["done".into()]));
        let controller = RunController::new(node_id, doc, dispatcher, streamer, feedback.clone());
        (controller, feedback)
    }

    /// **Scenario**: A wired run dispatches once, streams into the target,
    /// and settles back to Idle.
    #[tokio::test]
    async fn wired_run_dispatches_and_settles() {
        let doc = wired_doc();
        let dispatcher = Arc::new(MockDispatcher::accepting("task-1"));
        let (controller, feedback) = controller_for(doc.clone(), dispatcher.clone(), "op");

        let outcome = controller.trigger().await.unwrap();
        match outcome {
            TriggerOutcome::Ran(sync) => {
                assert_eq!(sync.task, TaskHandle("task-1".into()));
                assert!(sync.failed_targets.is_empty());
            }
            TriggerOutcome::Dropped => panic!("run should not be dropped"),
        }
        assert_eq!(controller.state(), RunState::Idle);
        assert_eq!(dispatcher.requests().len(), 1);
        assert_eq!(doc.get_node("t1").unwrap().content(), Some("done"));
        assert_eq!(feedback.reset_count("t1"), 1);
        // No spare node was materialized for an already-wired operation.
        assert_eq!(doc.node_ids(), vec!["s1", "op", "t1"]);
    }

    /// **Scenario**: A run with zero targets materializes exactly one node
    /// and one edge before dispatching.
    #[tokio::test]
    async fn zero_targets_materializes_before_dispatch() {
        let doc = Arc::new(GraphDocument::with_graph(vec![edit_text_op("e1")], vec![]));
        let dispatcher = Arc::new(MockDispatcher::accepting("task-1"));
        let (controller, _) = controller_for(doc.clone(), dispatcher.clone(), "e1");

        controller.trigger().await.unwrap();

        assert_eq!(doc.node_ids().len(), 2, "exactly one node created");
        assert_eq!(doc.edge_count(), 1, "exactly one edge created");
        let request = &dispatcher.requests()[0];
        assert!(
            request.blocks.contains_key("e1-result"),
            "dispatch sees the materialized target"
        );
    }

    /// Dispatcher that parks inside dispatch() until released.
    struct GatedDispatcher {
        release: Notify,
    }

    #[async_trait]
    impl ExecutionDispatcher for GatedDispatcher {
        async fn dispatch(&self, _request: &ExecutionRequest) -> Result<TaskHandle, RunError> {
            self.release.notified().await;
            Ok(TaskHandle("gated".into()))
        }
    }

    async fn wait_for_state(controller: &RunController, state: RunState) {
        for _ in 0..500 {
            if controller.state() == state {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("controller never reached {:?}", state);
    }

    /// **Scenario**: Triggering while a run is in flight performs no second
    /// dispatch; the trigger is dropped.
    #[tokio::test]
    async fn reentrant_trigger_is_dropped() {
        let doc = wired_doc();
        let dispatcher = Arc::new(GatedDispatcher {
            release: Notify::new(),
        });
        let (controller, _) = controller_for(doc, dispatcher.clone(), "op");
        let controller = Arc::new(controller);

        let in_flight = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.trigger().await })
        };
        wait_for_state(&controller, RunState::Dispatching).await;

        let second = controller.trigger().await.unwrap();
        assert_eq!(second, TriggerOutcome::Dropped);

        dispatcher.release.notify_one();
        let first = in_flight.await.unwrap().unwrap();
        assert!(matches!(first, TriggerOutcome::Ran(_)));
    }

    /// **Scenario**: stop() resets the flag but does not cancel the
    /// in-flight run, which still settles normally.
    #[tokio::test]
    async fn stop_resets_flag_without_cancelling() {
        let doc = wired_doc();
        let dispatcher = Arc::new(GatedDispatcher {
            release: Notify::new(),
        });
        let (controller, _) = controller_for(doc.clone(), dispatcher.clone(), "op");
        let controller = Arc::new(controller);

        let in_flight = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.trigger().await })
        };
        wait_for_state(&controller, RunState::Dispatching).await;

        controller.stop();
        assert_eq!(controller.state(), RunState::Idle);

        dispatcher.release.notify_one();
        let first = in_flight.await.unwrap().unwrap();
        assert!(matches!(first, TriggerOutcome::Ran(_)), "stop is cosmetic");
        assert_eq!(doc.get_node("t1").unwrap().content(), Some("done"));
    }

    /// **Scenario**: Triggering a content node fails with InvalidNode and
    /// reports on that node.
    #[tokio::test]
    async fn content_node_trigger_is_invalid() {
        let doc = Arc::new(GraphDocument::with_graph(
            vec![GraphNode::text("n", pos(), "")],
            vec![],
        ));
        let dispatcher = Arc::new(MockDispatcher::accepting("task"));
        let (controller, feedback) = controller_for(doc, dispatcher, "n");

        let err = controller.trigger().await.unwrap_err();
        assert!(matches!(err, RunError::InvalidNode(ref id) if id == "n"));
        assert_eq!(feedback.error_count("n"), 1);
        assert_eq!(controller.state(), RunState::Idle);
    }

    /// **Scenario**: A rejected dispatch settles the run with the error and
    /// still returns the controller to Idle.
    #[tokio::test]
    async fn rejected_dispatch_settles_with_error() {
        let doc = wired_doc();
        let dispatcher = Arc::new(MockDispatcher::rejecting(422, "bad"));
        let (controller, feedback) = controller_for(doc, dispatcher, "op");

        let err = controller.trigger().await.unwrap_err();
        assert!(matches!(err, RunError::BackendRejection { status: 422, .. }));
        assert_eq!(feedback.error_count("t1"), 1);
        assert_eq!(feedback.reset_count("t1"), 1);
        assert_eq!(controller.state(), RunState::Idle);

        // The node is idle again, so a later trigger is accepted.
        let err = controller.trigger().await.unwrap_err();
        assert!(matches!(err, RunError::BackendRejection { .. }));
    }
}
