//! End-to-end run pipeline tests against mock backend collaborators.

use std::sync::Arc;

use serde_json::json;

use flowcanvas::dispatch::mock::{MockDispatcher, MockStreamer};
use flowcanvas::graph::{
    GraphAccessor, GraphDocument, GraphEdge, GraphNode, NodeData, OperationParams, PathEntry,
    Position,
    ReturnMode,
};
use flowcanvas::{RecordingFeedback, RunRegistry, TriggerOutcome};

fn pos() -> Position {
    Position { x: 40.0, y: 80.0 }
}

/// **Scenario**: Parent "e1", no sources, no targets, edit-text "hi" with
/// return-all. One node and one edge are created; the dispatch payload has
/// slice [0,-1], content "hi", empty inputs, and outputs mapping the new
/// node's id to itself.
#[tokio::test]
async fn edit_text_run_materializes_then_dispatches() {
    let doc = Arc::new(GraphDocument::with_graph(
        vec![GraphNode::operation(
            "e1",
            pos(),
            OperationParams::EditText {
                content: "hi".into(),
                return_mode: ReturnMode::All,
                count: 0,
            },
        )],
        vec![],
    ));
    let dispatcher = Arc::new(MockDispatcher::accepting("task-e1"));
    let streamer = Arc::new(MockStreamer::new(doc.clone(), vec!["result ".into(), "text".into()]));
    let feedback = Arc::new(RecordingFeedback::new());
    let registry = RunRegistry::new(doc.clone(), dispatcher.clone(), streamer, feedback.clone());

    let outcome = registry.trigger("e1").await.unwrap();
    assert!(matches!(outcome, TriggerOutcome::Ran(_)));

    // Exactly one node and one edge were created, offset (+160, -64).
    let ids = doc.node_ids();
    assert_eq!(ids.len(), 2);
    let new_id = ids.iter().find(|id| *id != "e1").unwrap().clone();
    assert_eq!(doc.edge_count(), 1);
    let created = doc.get_node(&new_id).unwrap();
    assert_eq!(created.position, Position { x: 200.0, y: 16.0 });

    // A second resolution sees the one target; the dispatch payload used it.
    let requests = dispatcher.requests();
    assert_eq!(requests.len(), 1, "exactly one dispatch");
    let payload = serde_json::to_value(&requests[0]).unwrap();
    let edge = &payload["edges"]["e1"];
    assert_eq!(edge["type"], json!("modify"));
    assert_eq!(edge["data"]["modify_type"], json!("edit_text"));
    assert_eq!(edge["data"]["extra_configs"]["slice"], json!([0, -1]));
    assert_eq!(edge["data"]["content"], json!("hi"));
    assert_eq!(edge["data"]["inputs"], json!({}));
    let outputs = edge["data"]["outputs"].as_object().unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[&new_id], json!(new_id));
    assert_eq!(payload["blocks"][&new_id]["data"]["content"], json!(""));

    // Streamed text landed in the new node and its loading flag cleared.
    let node = doc.get_node(&new_id).unwrap();
    assert_eq!(node.content(), Some("result text"));
    match node.data {
        NodeData::Content(ref c) => assert!(!c.loading),
        _ => panic!("result must be a content node"),
    }
    assert_eq!(feedback.reset_count(&new_id), 1);
    assert!(feedback.errors().is_empty());
}

/// **Scenario**: A structured replace over a mixed path compiles to a
/// set_value operation with the coerced path ["a", 2].
#[tokio::test]
async fn structured_replace_run_compiles_set_value() {
    let doc = Arc::new(GraphDocument::with_graph(
        vec![
            GraphNode::structured("src", pos(), "{\"a\": [1, 2, 3]}").with_label("Table"),
            GraphNode::operation(
                "op",
                pos(),
                OperationParams::EditStructured {
                    action: "replace".into(),
                    path: vec![PathEntry::new("key", "a"), PathEntry::new("num", "2")],
                    value: Some("99".into()),
                },
            ),
            GraphNode::structured("dst", pos(), ""),
        ],
        vec![GraphEdge::new("src", "op"), GraphEdge::new("op", "dst")],
    ));
    let dispatcher = Arc::new(MockDispatcher::accepting("task-op"));
    let streamer = Arc::new(MockStreamer::new(doc.clone(), vec!["{}".into()]));
    let registry = RunRegistry::new(
        doc.clone(),
        dispatcher.clone(),
        streamer,
        Arc::new(RecordingFeedback::new()),
    );

    registry.trigger("op").await.unwrap();

    let payload = serde_json::to_value(&dispatcher.requests()[0]).unwrap();
    let op = &payload["edges"]["op"]["data"]["extra_configs"]["operations"][0];
    assert_eq!(op["type"], json!("set_value"));
    assert_eq!(op["params"]["path"], json!(["a", 2]));
    assert_eq!(op["params"]["value"], json!("99"));
    // Source block was snapshotted with its content; target is a placeholder.
    assert_eq!(payload["blocks"]["src"]["label"], json!("Table"));
    assert_eq!(payload["blocks"]["src"]["type"], json!("structured"));
    assert_eq!(payload["blocks"]["src"]["data"]["content"], json!("{\"a\": [1, 2, 3]}"));
    assert_eq!(payload["blocks"]["dst"]["data"]["content"], json!(""));
}

/// **Scenario**: A rejected dispatch reports every resolved target exactly
/// once and resets loading exactly once per target.
#[tokio::test]
async fn rejection_fans_out_to_every_target() {
    let doc = Arc::new(GraphDocument::with_graph(
        vec![
            GraphNode::operation("op", pos(), OperationParams::SearchGoogle { top_k: 5 }),
            GraphNode::text("t1", pos(), ""),
            GraphNode::text("t2", pos(), ""),
        ],
        vec![GraphEdge::new("op", "t1"), GraphEdge::new("op", "t2")],
    ));
    let dispatcher = Arc::new(MockDispatcher::rejecting(503, "backend busy"));
    let streamer = Arc::new(MockStreamer::new(doc.clone(), vec![]));
    let feedback = Arc::new(RecordingFeedback::new());
    let registry = RunRegistry::new(doc.clone(), dispatcher, streamer, feedback.clone());

    let err = registry.trigger("op").await.unwrap_err();
    assert!(err.to_string().contains("503"));
    for id in ["t1", "t2"] {
        assert_eq!(feedback.error_count(id), 1, "exactly one report for {}", id);
        assert_eq!(feedback.reset_count(id), 1, "exactly one reset for {}", id);
    }
}
