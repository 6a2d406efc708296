//! Node-level fixes for advisory defects: default filling, duplicate
//! names, unrecognized nodes. Existing well-formed fields are never touched.

use serde_json::Map;

use super::{Repair, unique_name};
use crate::parse::types::{Node, NodeCategory, Position, Workflow};
use crate::report::{IssueDetails, RuleResult};

const DEFAULT_X: f64 = 250.0;
const DEFAULT_Y: f64 = 300.0;
const SPACING: f64 = 200.0;

/// Indices named by the result's node issues, skipping any whose node no
/// longer carries the reported name.
fn reported_nodes<'a>(
    workflow: &'a Workflow,
    result: &'a RuleResult,
) -> impl Iterator<Item = usize> + 'a {
    result.issues.iter().filter_map(move |issue| match &issue.details {
        IssueDetails::Node { node, index, .. }
            if workflow.nodes.get(*index).is_some_and(|n| n.name == *node) =>
        {
            Some(*index)
        }
        _ => None,
    })
}

/// `missing-parameters`: `{}`, `unknown`, and a position derived from the
/// node's index.
pub fn fill_defaults(workflow: &Workflow, result: &RuleResult) -> Repair {
    let mut next = workflow.clone();
    let mut fixes = Vec::new();

    for index in reported_nodes(workflow, result) {
        let node = &mut next.nodes[index];
        let mut filled = Vec::new();
        if node.parameters.is_none() {
            node.parameters = Some(Map::new());
            filled.push("parameters");
        }
        if node.category.is_none() {
            node.category = Some(NodeCategory::Unknown);
            filled.push("category");
        }
        if node.position.is_none() {
            node.position = Some(default_position(index));
            filled.push("position");
        }
        // The unreadable originals are superseded by the defaults.
        for field in &filled {
            node.extra.remove(*field);
        }
        if !filled.is_empty() {
            fixes.push(format!(
                "Filled default {} on node '{}'",
                filled.join(", "),
                node.name
            ));
        }
    }

    Repair {
        workflow: next,
        fixes,
    }
}

pub fn default_position(index: usize) -> Position {
    Position(DEFAULT_X + SPACING * index as f64, DEFAULT_Y)
}

/// `duplicate-name`: later duplicates cannot be addressed by any
/// connection, so giving them a fresh name changes no edge.
pub fn rename_duplicates(workflow: &Workflow, result: &RuleResult) -> Repair {
    let mut next = workflow.clone();
    let mut fixes = Vec::new();

    for index in reported_nodes(workflow, result) {
        let old = next.nodes[index].name.clone();
        let first = next.nodes.iter().position(|n| n.name == old);
        if first == Some(index) {
            continue;
        }
        let base = if old.trim().is_empty() { "Node" } else { old.as_str() };
        let new = unique_name(&next, base);
        next.nodes[index].name = new.clone();
        fixes.push(format!("Renamed duplicate node '{}' to '{}'", old, new));
    }

    Repair {
        workflow: next,
        fixes,
    }
}

/// `unrecognized-node`: keep the node and its edges, neutralize its
/// category. Triggers are left alone; demoting one would leave the
/// document without an entry point.
pub fn mark_passthrough(workflow: &Workflow, result: &RuleResult) -> Repair {
    let mut next = workflow.clone();
    let mut fixes = Vec::new();

    for index in reported_nodes(workflow, result) {
        let node: &mut Node = &mut next.nodes[index];
        if node.is_trigger() || node.category == Some(NodeCategory::Passthrough) {
            continue;
        }
        node.category = Some(NodeCategory::Passthrough);
        node.extra.remove("category");
        fixes.push(format!("Marked unrecognized node '{}' as passthrough", node.name));
    }

    Repair {
        workflow: next,
        fixes,
    }
}
