//! HTTP dispatcher: JSON POST of the compiled request.

use async_trait::async_trait;
use serde::Deserialize;

use crate::compile::ExecutionRequest;
use crate::config::ExecutorConfig;
use crate::error::RunError;

use super::{ExecutionDispatcher, TaskHandle};

/// 2xx response body of the execution endpoint.
#[derive(Debug, Deserialize)]
struct DispatchResponse {
    task_id: String,
}

/// Production dispatcher: `POST <endpoint>` with the request as JSON.
///
/// No timeouts are set here; they are a transport-layer concern.
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    /// Builds a dispatcher for the configured execution endpoint.
    pub fn new(config: &ExecutorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Builds a dispatcher reusing an existing client (connection pooling).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ExecutionDispatcher for HttpDispatcher {
    async fn dispatch(&self, request: &ExecutionRequest) -> Result<TaskHandle, RunError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| RunError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RunError::BackendRejection {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DispatchResponse = response
            .json()
            .await
            .map_err(|e| RunError::Network(e.to_string()))?;
        Ok(TaskHandle(parsed.task_id))
    }
}
