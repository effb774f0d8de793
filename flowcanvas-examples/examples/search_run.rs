//! Google search run: query node wired into a search operation.
//!
//! Run: `cargo run -p flowcanvas-examples --example search_run`

use std::sync::Arc;

use flowcanvas::dispatch::mock::{MockDispatcher, MockStreamer};
use flowcanvas::graph::{GraphAccessor, GraphDocument, GraphEdge, GraphNode, OperationParams, Position};
use flowcanvas::{RecordingFeedback, RunRegistry};

#[tokio::main]
async fn main() {
    let doc = Arc::new(GraphDocument::with_graph(
        vec![
            GraphNode::text(
                "query",
                Position { x: 0.0, y: 0.0 },
                "rust graph editors",
            )
            .with_label("Query"),
            GraphNode::operation(
                "search",
                Position { x: 160.0, y: 0.0 },
                OperationParams::SearchGoogle { top_k: 5 },
            ),
        ],
        vec![GraphEdge::new("query", "search")],
    ));

    let dispatcher = Arc::new(MockDispatcher::accepting("search-task"));
    let streamer = Arc::new(MockStreamer::new(
        doc.clone(),
        vec!["1. example.com\n".into(), "2. example.org\n".into()],
    ));
    let registry = RunRegistry::new(
        doc.clone(),
        dispatcher.clone(),
        streamer,
        Arc::new(RecordingFeedback::new()),
    );

    // No downstream node exists yet; the run materializes one first.
    registry.trigger("search").await.expect("run settles");

    let payload = serde_json::to_value(&dispatcher.requests()[0]).unwrap();
    println!(
        "query_id = {}",
        payload["edges"]["search"]["data"]["query_id"]
    );
    let result = doc.get_node("search-result").expect("materialized result");
    println!("results:\n{}", result.content().unwrap_or_default());
}
