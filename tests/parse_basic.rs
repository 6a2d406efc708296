//! Integration tests for the Parse phase: document parsing, structural
//! errors, round-trips, graph building.

use flowcheck::parse;
use flowcheck::parse::types::NodeCategory;
use flowcheck::report::Classification;

#[test]
fn parse_linear_workflow() {
    let json = include_str!("fixtures/linear_workflow.json");
    let workflow = parse::parse(json).expect("Should parse successfully");
    assert_eq!(workflow.name, "Daily Report Digest");
    assert_eq!(workflow.nodes.len(), 8);
    assert_eq!(workflow.connections.len(), 7);
    assert!(workflow.nodes[0].is_trigger());
    assert_eq!(
        workflow.nodes[1].node_type.as_deref(),
        Some("n8n-nodes-base.httpRequest")
    );
}

#[test]
fn parse_round_trip_keeps_unknown_fields() {
    let json = include_str!("fixtures/linear_workflow.json");
    let workflow = parse::parse(json).expect("Should parse");
    let serialized = serde_json::to_string(&workflow).expect("Should serialize");
    let workflow2 = parse::parse(&serialized).expect("Should parse again");
    assert_eq!(workflow, workflow2);
    assert!(workflow2.extra.contains_key("settings"));
    assert!(workflow2.nodes[0].extra.contains_key("typeVersion"));
}

#[test]
fn parse_invalid_json_returns_error() {
    let err = parse::parse("not valid json").unwrap_err();
    assert_eq!(err.code, "P001");
    assert_eq!(err.classification(), Classification::MalformedInput);
}

#[test]
fn parse_missing_nodes_is_malformed() {
    let err = parse::parse(r#"{"name": "x", "connections": {}}"#).unwrap_err();
    assert_eq!(err.code, "P002");
    assert!(err.message.contains("nodes"), "{}", err);
}

#[test]
fn parse_missing_connections_is_malformed() {
    let err = parse::parse(r#"{"name": "x", "nodes": []}"#).unwrap_err();
    assert_eq!(err.code, "P002");
    assert!(err.message.contains("connections"), "{}", err);
}

#[test]
fn parse_duplicate_node_ids_is_malformed() {
    let json = r#"{
        "name": "dup",
        "nodes": [
            {"id": "1", "name": "A", "category": "trigger", "parameters": {}, "position": [0, 0]},
            {"id": "1", "name": "B", "category": "action", "parameters": {}, "position": [200, 0]}
        ],
        "connections": {}
    }"#;
    let err = parse::parse(json).unwrap_err();
    assert_eq!(err.code, "P003");
    assert_eq!(err.node_id.as_deref(), Some("1"));
    assert_eq!(err.to_string(), "[Structure:P003] Duplicate node id '1'");
}

#[test]
fn parse_reads_malformed_fields_as_missing() {
    let json = include_str!("fixtures/broken_workflow.json");
    let workflow = parse::parse(json).expect("Malformed node fields are not fatal");
    let score = workflow.node_by_name("Score").unwrap();
    assert!(score.parameters.is_none());
    assert!(score.position.is_none());
    assert_eq!(score.category, Some(NodeCategory::Logic));
    assert_eq!(score.extra["position"], "left");
}

#[test]
fn unreadable_fields_survive_a_round_trip() {
    let json = include_str!("fixtures/broken_workflow.json");
    let workflow = parse::parse(json).unwrap();
    let out = serde_json::to_value(&workflow).unwrap();
    assert_eq!(out["nodes"][2]["position"], "left");

    let again = parse::parse(&out.to_string()).unwrap();
    assert_eq!(again, workflow);
}

#[test]
fn parse_keeps_unknown_category_verbatim() {
    let json = r#"{
        "name": "odd",
        "nodes": [
            {"id": "1", "name": "A", "category": "webhookish", "parameters": {}, "position": [0, 0]}
        ],
        "connections": {}
    }"#;
    let workflow = parse::parse(json).unwrap();
    assert_eq!(
        workflow.nodes[0].category,
        Some(NodeCategory::Other("webhookish".into()))
    );
    let out = serde_json::to_value(&workflow).unwrap();
    assert_eq!(out["nodes"][0]["category"], "webhookish");
}

#[test]
fn edge_target_defaults() {
    let json = r#"{
        "name": "defaults",
        "nodes": [
            {"id": "1", "name": "A", "category": "trigger", "parameters": {}, "position": [0, 0]},
            {"id": "2", "name": "B", "category": "action", "parameters": {}, "position": [200, 0]}
        ],
        "connections": {"A": {"main": [[{"node": "B"}]]}}
    }"#;
    let workflow = parse::parse(json).unwrap();
    let target = &workflow.connections["A"].main[0][0];
    assert_eq!(target.kind, "main");
    assert_eq!(target.index, 0);
}

#[test]
fn build_graph_from_linear_workflow() {
    let json = include_str!("fixtures/linear_workflow.json");
    let workflow = parse::parse(json).expect("Should parse");
    let graph = parse::WorkflowGraph::build(&workflow);
    assert_eq!(graph.node_indices.len(), 8);
    assert!(graph.dangling.is_empty());

    let schedule = graph.index_of("Schedule").unwrap();
    let log = graph.index_of("Log Result").unwrap();
    assert_eq!(graph.outgoing_count(schedule), 1);
    assert_eq!(graph.incoming_count(schedule), 0);
    assert_eq!(graph.outgoing_count(log), 0);
    assert_eq!(graph.reachable_from_triggers(&workflow).len(), 8);
    assert!(graph.find_cycle().is_none());
}

#[test]
fn build_graph_collects_dangling_references() {
    let json = include_str!("fixtures/broken_workflow.json");
    let workflow = parse::parse(json).unwrap();
    let graph = parse::WorkflowGraph::build(&workflow);
    assert_eq!(graph.dangling.len(), 2);
    assert_eq!(graph.dangling[0].source, "Enrich");
    assert_eq!(graph.dangling[0].target.as_deref(), Some("CRM Upsert"));
    assert_eq!(graph.dangling[1].source, "Old Node");
    assert!(graph.dangling[1].target.is_none());
}
