//! `missing-trigger`: synthesize a trigger and wire it to an entry node.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use serde_json::Map;
use tracing::trace;

use super::{Repair, unique_name};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Node, NodeCategory, Position, Workflow};
use crate::report::RuleResult;

const TRIGGER_NAME: &str = "Trigger";
const TRIGGER_ID: &str = "trigger";
const DEFAULT_Y: f64 = 300.0;
const SPACING: f64 = 200.0;
/// Relative to the coordinate; well above `f64::EPSILON`.
const RELATIVE_STEP: f64 = 1e-9;

pub fn add_trigger(workflow: &Workflow, _result: &RuleResult) -> Repair {
    if workflow.nodes.iter().any(|n| n.is_trigger()) {
        return Repair::noop(workflow);
    }

    let graph = WorkflowGraph::build(workflow);
    let target = entry_node(workflow, &graph);

    let name = unique_name(workflow, TRIGGER_NAME);
    let trigger = Node {
        id: unique_id(workflow),
        name: name.clone(),
        category: Some(NodeCategory::Trigger),
        node_type: None,
        parameters: Some(Map::new()),
        position: Some(free_position(workflow, target.as_deref())),
        extra: Default::default(),
    };

    let mut next = workflow.clone();
    next.nodes.push(trigger);

    let fix = match target {
        Some(target) => {
            next.connect(&name, &target);
            format!("Added trigger node '{}' connected to '{}'", name, target)
        }
        None => format!("Added trigger node '{}'", name),
    };
    trace!(trigger = %name, "synthesized trigger");

    Repair {
        workflow: next,
        fixes: vec![fix],
    }
}

/// First node (declaration order) with no incoming edge, else the first
/// node. Later duplicates of a name are skipped since no edge can reach them.
fn entry_node(workflow: &Workflow, graph: &WorkflowGraph) -> Option<String> {
    workflow
        .nodes
        .iter()
        .enumerate()
        .find(|(i, n)| {
            let idx = NodeIndex::new(*i);
            graph.index_of(&n.name) == Some(idx) && graph.incoming_count(idx) == 0
        })
        .or_else(|| workflow.nodes.iter().enumerate().next())
        .map(|(_, n)| n.name.clone())
}

fn unique_id(workflow: &Workflow) -> String {
    let ids: HashSet<&str> = workflow.nodes.iter().map(|n| n.id.as_str()).collect();
    if !ids.contains(TRIGGER_ID) {
        return TRIGGER_ID.to_string();
    }
    (2..)
        .map(|k| format!("{}-{}", TRIGGER_ID, k))
        .find(|candidate| !ids.contains(candidate.as_str()))
        .unwrap_or_else(|| TRIGGER_ID.to_string())
}

/// Left of the leftmost node, level with the target, moved down until no
/// existing node sits on the same spot.
///
/// The step grows with the coordinate's magnitude so every candidate is a
/// distinct `f64`; one more candidate is tried than there are occupied
/// spots. The search moves up instead when moving down would overflow.
fn free_position(workflow: &Workflow, target: Option<&str>) -> Position {
    let positions: Vec<Position> = workflow.nodes.iter().filter_map(|n| n.position).collect();
    let x = positions
        .iter()
        .map(|p| p.0)
        .reduce(f64::min)
        .map(|min_x| min_x - SPACING)
        .filter(|x| x.is_finite())
        .unwrap_or(0.0);
    let y = target
        .and_then(|t| workflow.node_by_name(t))
        .and_then(|n| n.position)
        .map(|p| p.1)
        .filter(|y| y.is_finite())
        .unwrap_or(DEFAULT_Y);

    let taken: HashSet<(u64, u64)> = positions.iter().map(Position::key).collect();
    let attempts = taken.len() + 1;
    let step = (y.abs() * RELATIVE_STEP).max(SPACING / 2.0);
    let direction = if (y + step * attempts as f64).is_finite() {
        1.0
    } else {
        -1.0
    };

    (0..attempts)
        .map(|k| Position(x, y + direction * step * k as f64))
        .find(|candidate| !taken.contains(&candidate.key()))
        .unwrap_or(Position(x, y))
}
