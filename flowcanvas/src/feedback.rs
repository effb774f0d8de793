//! User-facing run feedback collaborators.
//!
//! The editor UI implements [`RunFeedback`] to surface per-node errors and
//! to clear loading indicators. [`LogFeedback`] is the headless default;
//! [`RecordingFeedback`] is for tests.

use std::sync::Mutex;

/// Per-node error reporting and loading-indicator reset.
///
/// **Interaction**: Consumed as `Arc<dyn RunFeedback>` by the stream
/// synchronizer and run controller. Both calls must be cheap and
/// infallible; they can be invoked once per target on every exit path.
pub trait RunFeedback: Send + Sync {
    /// Reports a failure attributed to one node.
    fn report_error(&self, node_id: &str, message: &str);

    /// Clears the loading indicator of one node.
    fn reset_loading(&self, node_id: &str);
}

/// Headless feedback: logs and nothing else.
#[derive(Default)]
pub struct LogFeedback;

impl RunFeedback for LogFeedback {
    fn report_error(&self, node_id: &str, message: &str) {
        crate::run::logging::log_node_error(node_id, message);
    }

    fn reset_loading(&self, node_id: &str) {
        crate::run::logging::log_loading_reset(node_id);
    }
}

/// Recording feedback for tests: remembers every call.
#[derive(Default)]
pub struct RecordingFeedback {
    errors: Mutex<Vec<(String, String)>>,
    resets: Mutex<Vec<String>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(node_id, message)` error reports, in call order.
    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().expect("errors lock").clone()
    }

    /// All loading resets, in call order.
    pub fn resets(&self) -> Vec<String> {
        self.resets.lock().expect("resets lock").clone()
    }

    /// Number of error reports attributed to `node_id`.
    pub fn error_count(&self, node_id: &str) -> usize {
        self.errors()
            .iter()
            .filter(|(id, _)| id == node_id)
            .count()
    }

    /// Number of loading resets for `node_id`.
    pub fn reset_count(&self, node_id: &str) -> usize {
        self.resets().iter().filter(|id| *id == node_id).count()
    }
}

impl RunFeedback for RecordingFeedback {
    fn report_error(&self, node_id: &str, message: &str) {
        self.errors
            .lock()
            .expect("errors lock")
            .push((node_id.to_string(), message.to_string()));
    }

    fn reset_loading(&self, node_id: &str) {
        self.resets
            .lock()
            .expect("resets lock")
            .push(node_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: RecordingFeedback counts calls per node.
    #[test]
    fn recording_feedback_counts_calls() {
        let feedback = RecordingFeedback::new();
        feedback.report_error("t1", "boom");
        feedback.report_error("t2", "boom");
        feedback.reset_loading("t1");
        assert_eq!(feedback.error_count("t1"), 1);
        assert_eq!(feedback.error_count("t2"), 1);
        assert_eq!(feedback.reset_count("t1"), 1);
        assert_eq!(feedback.reset_count("t2"), 0);
    }
}
