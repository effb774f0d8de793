//! Mock dispatcher and streamer for tests and demos.
//!
//! Scripted outcomes, no backend required. The dispatcher records every
//! request it sees; the streamer writes fixed chunks into targets through
//! the graph accessor and can be told to fail specific targets.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::compile::ExecutionRequest;
use crate::error::RunError;
use crate::graph::GraphAccessor;

use super::streamer::append_chunk;
use super::{ExecutionDispatcher, ResultStreamer, TaskHandle};

enum MockOutcome {
    Accept(String),
    Reject { status: u16, body: String },
    NetworkDown,
}

/// Mock dispatcher: records requests, returns a scripted outcome.
///
/// **Interaction**: Implements `ExecutionDispatcher`; used by run
/// controller tests and the demo crate.
pub struct MockDispatcher {
    outcome: MockOutcome,
    requests: Mutex<Vec<ExecutionRequest>>,
}

impl MockDispatcher {
    /// Accepts every request with the given task id.
    pub fn accepting(task_id: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Accept(task_id.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Rejects every request with the given status and body.
    pub fn rejecting(status: u16, body: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Reject {
                status,
                body: body.into(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request at the transport level.
    pub fn network_down() -> Self {
        Self {
            outcome: MockOutcome::NetworkDown,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in dispatch order.
    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ExecutionDispatcher for MockDispatcher {
    async fn dispatch(&self, request: &ExecutionRequest) -> Result<TaskHandle, RunError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        match &self.outcome {
            MockOutcome::Accept(task_id) => Ok(TaskHandle(task_id.clone())),
            MockOutcome::Reject { status, body } => Err(RunError::BackendRejection {
                status: *status,
                body: body.clone(),
            }),
            MockOutcome::NetworkDown => Err(RunError::Network("connection refused".into())),
        }
    }
}

/// Mock streamer: writes fixed chunks into each target, optionally failing
/// a scripted subset of targets.
pub struct MockStreamer {
    accessor: Arc<dyn GraphAccessor>,
    chunks: Vec<String>,
    failing_targets: HashSet<String>,
    sessions: Mutex<Vec<(TaskHandle, String)>>,
}

impl MockStreamer {
    /// Streams the given chunks into every target.
    pub fn new(accessor: Arc<dyn GraphAccessor>, chunks: Vec<String>) -> Self {
        Self {
            accessor,
            chunks,
            failing_targets: HashSet::new(),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Marks a target whose session fails instead of streaming (builder style).
    pub fn failing_target(mut self, node_id: impl Into<String>) -> Self {
        self.failing_targets.insert(node_id.into());
        self
    }

    /// Sessions opened so far, in order.
    pub fn sessions(&self) -> Vec<(TaskHandle, String)> {
        self.sessions.lock().expect("sessions lock").clone()
    }
}

#[async_trait]
impl ResultStreamer for MockStreamer {
    async fn stream_result(
        &self,
        task: &TaskHandle,
        target_node_id: &str,
    ) -> Result<(), RunError> {
        self.sessions
            .lock()
            .expect("sessions lock")
            .push((task.clone(), target_node_id.to_string()));
        if self.failing_targets.contains(target_node_id) {
            return Err(RunError::Stream {
                node_id: target_node_id.to_string(),
                message: "scripted stream failure".into(),
            });
        }
        for chunk in &self.chunks {
            append_chunk(self.accessor.as_ref(), target_node_id, chunk);
        }
        Ok(())
    }
}
