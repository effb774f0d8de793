//! Edit-text run against a mock backend.
//!
//! Builds a lone edit-text operation node, triggers it, and prints the
//! materialized result node. Run: `cargo run -p flowcanvas-examples --example edit_text_run`

use std::sync::Arc;

use flowcanvas::dispatch::mock::{MockDispatcher, MockStreamer};
use flowcanvas::graph::{
    GraphAccessor, GraphDocument, GraphNode, OperationParams, Position, ReturnMode,
};
use flowcanvas::{RecordingFeedback, RunRegistry, TriggerOutcome};

#[tokio::main]
async fn main() {
    let doc = Arc::new(GraphDocument::new());
    doc.insert_node(GraphNode::operation(
        "edit",
        Position { x: 0.0, y: 0.0 },
        OperationParams::EditText {
            content: "hello canvas".into(),
            return_mode: ReturnMode::FirstN,
            count: 5,
        },
    ));

    let dispatcher = Arc::new(MockDispatcher::accepting("demo-task"));
    let streamer = Arc::new(MockStreamer::new(doc.clone(), vec!["hello".into()]));
    let registry = RunRegistry::new(
        doc.clone(),
        dispatcher.clone(),
        streamer,
        Arc::new(RecordingFeedback::new()),
    );

    match registry.trigger("edit").await {
        Ok(TriggerOutcome::Ran(outcome)) => {
            println!("run settled, task = {}", outcome.task.as_str());
        }
        Ok(TriggerOutcome::Dropped) => println!("trigger dropped"),
        Err(err) => println!("run failed: {}", err),
    }

    let payload = serde_json::to_string_pretty(&dispatcher.requests()[0]).unwrap();
    println!("dispatched payload:\n{}", payload);

    for id in doc.node_ids() {
        if let Some(content) = doc.get_node(&id).and_then(|n| n.content().map(String::from)) {
            println!("node {}: {:?}", id, content);
        }
    }
}
