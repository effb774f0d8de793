//! Executor configuration: where requests go and where results stream from.
//!
//! Read from the environment (`FLOWCANVAS_ENDPOINT`,
//! `FLOWCANVAS_RESULT_ENDPOINT`) with localhost defaults for development.

use std::env;

/// Default execution endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8700/api/execute";
/// Default base URL result streams are read from (`<base>/<task_id>`).
pub const DEFAULT_RESULT_ENDPOINT: &str = "http://127.0.0.1:8700/api/result";

/// Backend endpoints used by the HTTP dispatcher and streamer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// `POST` target for compiled execution requests.
    pub endpoint: String,
    /// Base URL of the per-task result stream.
    pub result_endpoint: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            result_endpoint: DEFAULT_RESULT_ENDPOINT.to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Builds the config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("FLOWCANVAS_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into()),
            result_endpoint: env::var("FLOWCANVAS_RESULT_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_RESULT_ENDPOINT.into()),
        }
    }
}
