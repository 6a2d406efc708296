use std::collections::{BTreeMap, HashSet};

use flowcheck::parse::WorkflowGraph;
use flowcheck::parse::types::*;
use flowcheck::report::{Classification, Report};
use petgraph::algo::is_cyclic_directed;

// =============================================================================
// Document builders
// =============================================================================

pub fn node(name: &str, category: NodeCategory) -> Node {
    Node::new(
        format!("id-{}", name.to_lowercase().replace(' ', "-")),
        name,
        category,
    )
}

pub fn trigger(name: &str) -> Node {
    node(name, NodeCategory::Trigger)
}

pub fn action(name: &str) -> Node {
    node(name, NodeCategory::Action)
}

/// Build a workflow; nodes get distinct positions `[200 * i, 0]`.
pub fn workflow(nodes: Vec<Node>, edges: &[(&str, &str)]) -> Workflow {
    let nodes = nodes
        .into_iter()
        .enumerate()
        .map(|(i, mut n)| {
            n.position = Some(Position(200.0 * i as f64, 0.0));
            n
        })
        .collect();
    let mut wf = Workflow {
        name: "Test Workflow".into(),
        nodes,
        connections: BTreeMap::new(),
        extra: BTreeMap::new(),
    };
    for (source, target) in edges {
        wf.connect(source, target);
    }
    wf
}

/// Trigger followed by `names.len()` actions in a straight line.
pub fn chain(names: &[&str]) -> Workflow {
    let mut nodes = vec![trigger("Start")];
    nodes.extend(names.iter().map(|n| action(n)));

    let mut order = vec!["Start"];
    order.extend_from_slice(names);
    let edges: Vec<(&str, &str)> = order.windows(2).map(|w| (w[0], w[1])).collect();
    workflow(nodes, &edges)
}

pub fn edge_targets<'a>(wf: &'a Workflow, source: &str) -> Vec<&'a str> {
    wf.connections
        .get(source)
        .map(|c| c.main.iter().flatten().map(|t| t.node.as_str()).collect())
        .unwrap_or_default()
}

pub fn edge_count(wf: &Workflow) -> usize {
    wf.edges().count()
}

// =============================================================================
// Graph property checks
// =============================================================================

pub fn is_acyclic(wf: &Workflow) -> bool {
    !is_cyclic_directed(&WorkflowGraph::build(wf).graph)
}

pub fn all_references_resolve(wf: &Workflow) -> bool {
    WorkflowGraph::build(wf).dangling.is_empty()
}

pub fn all_reachable_from_triggers(wf: &Workflow) -> bool {
    let graph = WorkflowGraph::build(wf);
    let triggers = graph.trigger_indices(wf);
    if triggers.is_empty() {
        return false;
    }
    let reachable = graph.reachable_from(triggers);
    (0..wf.nodes.len()).all(|i| reachable.contains(&petgraph::graph::NodeIndex::new(i)))
}

pub fn node_ids(wf: &Workflow) -> HashSet<String> {
    wf.nodes.iter().map(|n| n.id.clone()).collect()
}

// =============================================================================
// Report assertions
// =============================================================================

pub fn assert_has_issue(report: &Report, classification: Classification) {
    assert!(
        report.issues.iter().any(|i| i.classification == classification),
        "Expected issue {}, got: {:?}",
        classification,
        report.issues
    );
}

pub fn assert_has_warning(report: &Report, classification: Classification) {
    let prefix = format!("[{}]", classification);
    assert!(
        report.warnings.iter().any(|w| w.starts_with(&prefix)),
        "Expected warning {}, got: {:?}",
        classification,
        report.warnings
    );
}
