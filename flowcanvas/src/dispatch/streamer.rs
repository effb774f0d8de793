//! Result streaming: incrementally write task output into a target node.
//!
//! [`ResultStreamer`] is the consumed collaborator seam; the HTTP
//! implementation reads the backend's chunked result stream and appends
//! each chunk to the target node through the graph accessor.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use crate::config::ExecutorConfig;
use crate::error::RunError;
use crate::graph::{GraphAccessor, NodeData};

use super::TaskHandle;

/// Streams one task's output into one target node.
///
/// **Interaction**: Consumed as `Arc<dyn ResultStreamer>` by the stream
/// synchronizer; one session per target, sessions may run concurrently and
/// resolve independently.
#[async_trait]
pub trait ResultStreamer: Send + Sync {
    /// Streams the task result into `target_node_id`, resolving when the
    /// stream completes.
    async fn stream_result(&self, task: &TaskHandle, target_node_id: &str)
        -> Result<(), RunError>;
}

/// Appends a chunk to a content node's text. No-op for missing nodes.
pub(crate) fn append_chunk(accessor: &dyn GraphAccessor, node_id: &str, chunk: &str) {
    let node_id = node_id.to_string();
    let chunk = chunk.to_string();
    accessor.apply_to_nodes(Box::new(move |nodes| {
        if let Some(node) = nodes.iter_mut().find(|n| n.id == node_id) {
            if let NodeData::Content(c) = &mut node.data {
                c.content.push_str(&chunk);
            }
        }
    }));
}

/// Incremental UTF-8 decoder for a chunked byte stream. The transport
/// splits the body at arbitrary byte offsets, so a multi-byte character
/// can straddle two chunks; the trailing partial sequence is held back
/// until the bytes completing it arrive.
#[derive(Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    /// Decodes as much of the buffered bytes plus `bytes` as is complete
    /// UTF-8. Genuinely invalid sequences become one replacement character
    /// each; an incomplete trailing sequence is carried to the next call.
    fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        // Truncated sequence at the end of the buffer.
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                        Some(bad) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid + bad);
                        }
                    }
                }
            }
        }
    }

    /// Flushes bytes still held once the stream has ended. A sequence left
    /// incomplete at end of stream decodes lossily.
    fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }
}

/// Production streamer: `GET <result_endpoint>/<task_id>` as a chunked
/// body, each chunk appended to the target node as UTF-8 text.
pub struct HttpResultStreamer {
    client: reqwest::Client,
    result_endpoint: String,
    accessor: Arc<dyn GraphAccessor>,
}

impl HttpResultStreamer {
    pub fn new(config: &ExecutorConfig, accessor: Arc<dyn GraphAccessor>) -> Self {
        Self {
            client: reqwest::Client::new(),
            result_endpoint: config.result_endpoint.clone(),
            accessor,
        }
    }
}

#[async_trait]
impl ResultStreamer for HttpResultStreamer {
    async fn stream_result(
        &self,
        task: &TaskHandle,
        target_node_id: &str,
    ) -> Result<(), RunError> {
        let url = format!("{}/{}", self.result_endpoint, task.as_str());
        let stream_err = |message: String| RunError::Stream {
            node_id: target_node_id.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| stream_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(stream_err(format!("result stream returned {}", status)));
        }

        let mut body = response.bytes_stream();
        let mut decoder = Utf8Carry::default();
        while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(|e| stream_err(e.to_string()))?;
            let text = decoder.push(&bytes);
            if !text.is_empty() {
                append_chunk(self.accessor.as_ref(), target_node_id, &text);
            }
        }
        let tail = decoder.finish();
        if !tail.is_empty() {
            append_chunk(self.accessor.as_ref(), target_node_id, &tail);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphDocument, GraphNode, Position};

    /// **Scenario**: append_chunk accumulates text on the target node and
    /// ignores unknown ids.
    #[test]
    fn append_chunk_accumulates_content() {
        let doc = GraphDocument::with_graph(
            vec![GraphNode::text("t1", Position { x: 0.0, y: 0.0 }, "")],
            vec![],
        );
        append_chunk(&doc, "t1", "hel");
        append_chunk(&doc, "t1", "lo");
        append_chunk(&doc, "missing", "ignored");
        assert_eq!(doc.get_node("t1").unwrap().content(), Some("hello"));
    }

    /// **Scenario**: A multi-byte character split across two chunks decodes
    /// intact once the second chunk arrives.
    #[test]
    fn carry_reassembles_split_character() {
        let mut decoder = Utf8Carry::default();
        // "é" is 0xC3 0xA9; the transport may split between the two bytes.
        assert_eq!(decoder.push(&[b'c', b'a', b'f', 0xC3]), "caf");
        assert_eq!(decoder.push(&[0xA9, b'!']), "é!");
        assert_eq!(decoder.finish(), "");
    }

    /// **Scenario**: A four-byte character arriving one byte per chunk is
    /// emitted once, whole.
    #[test]
    fn carry_spans_more_than_two_chunks() {
        let mut decoder = Utf8Carry::default();
        let bytes = "🦀".as_bytes();
        assert_eq!(decoder.push(&bytes[..1]), "");
        assert_eq!(decoder.push(&bytes[1..2]), "");
        assert_eq!(decoder.push(&bytes[2..3]), "");
        assert_eq!(decoder.push(&bytes[3..]), "🦀");
    }

    /// **Scenario**: A genuinely invalid byte becomes one replacement
    /// character and decoding continues past it.
    #[test]
    fn carry_replaces_invalid_sequences() {
        let mut decoder = Utf8Carry::default();
        assert_eq!(decoder.push(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    /// **Scenario**: A sequence left incomplete at end of stream is flushed
    /// lossily rather than dropped.
    #[test]
    fn carry_flushes_truncated_tail_at_end() {
        let mut decoder = Utf8Carry::default();
        assert_eq!(decoder.push(&[b'o', b'k', 0xC3]), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }
}
