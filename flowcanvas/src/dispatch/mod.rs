//! Execution dispatch: send a compiled request, obtain a task handle.
//!
//! [`ExecutionDispatcher`] is the seam the run controller goes through;
//! [`HttpDispatcher`] is the production implementation,
//! [`MockDispatcher`](mock::MockDispatcher) the scripted one for tests and
//! demos.

mod http;
pub mod mock;
mod streamer;

pub use http::HttpDispatcher;
pub use streamer::{HttpResultStreamer, ResultStreamer};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::compile::ExecutionRequest;
use crate::error::RunError;

/// Opaque backend-issued task id; used to open stream sessions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(pub String);

impl TaskHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sends compiled execution requests to the backend.
///
/// **Interaction**: Consumed as `Arc<dyn ExecutionDispatcher>` by the
/// stream synchronizer. A non-2xx response is a `BackendRejection`;
/// transport errors are `Network`.
#[async_trait]
pub trait ExecutionDispatcher: Send + Sync {
    /// Dispatches one request, returning the backend task handle on 2xx.
    async fn dispatch(&self, request: &ExecutionRequest) -> Result<TaskHandle, RunError>;
}
