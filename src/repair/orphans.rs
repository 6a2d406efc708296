//! `orphaned-nodes`: hang unreachable nodes off the end of the reachable
//! graph, one edge per orphan.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace};

use super::Repair;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::Workflow;
use crate::report::{IssueDetails, RuleResult};

pub fn connect_orphans(workflow: &Workflow, result: &RuleResult) -> Repair {
    let orphans: Vec<&String> = result
        .issues
        .iter()
        .flat_map(|issue| match &issue.details {
            IssueDetails::Orphans { nodes } => nodes.iter().collect::<Vec<_>>(),
            _ => vec![],
        })
        .collect();

    let mut next = workflow.clone();
    let mut fixes = Vec::new();
    // The node connected last; it is the preferred anchor for the next orphan.
    let mut tail: Option<NodeIndex> = None;

    for name in orphans {
        // Rebuilt per orphan: each added edge changes reachability.
        let graph = WorkflowGraph::build(&next);
        let Some(orphan) = graph.index_of(name) else {
            continue;
        };
        if next.nodes[orphan.index()].is_trigger() {
            continue;
        }
        let triggers = graph.trigger_indices(&next);
        let reachable = graph.reachable_from(triggers.iter().copied());
        if triggers.is_empty() || reachable.contains(&orphan) {
            continue;
        }

        // Anything the orphan already reaches would close a cycle.
        let downstream = graph.reachable_from([orphan]);
        let Some(anchor) = pick_anchor(&graph, tail, &triggers, &reachable, &downstream) else {
            debug!(node = %name, "no anchor that avoids a cycle; left for a later pass");
            continue;
        };

        let anchor_name = graph.name(anchor).to_string();
        next.connect(&anchor_name, name);
        trace!(node = %name, anchor = %anchor_name, "connected orphan");
        fixes.push(format!(
            "Connected orphaned node '{}' after '{}'",
            name, anchor_name
        ));
        tail = Some(orphan);
    }

    Repair {
        workflow: next,
        fixes,
    }
}

/// The previous tail when still usable, then the last reachable leaf in
/// declaration order, then the first trigger.
fn pick_anchor(
    graph: &WorkflowGraph,
    tail: Option<NodeIndex>,
    triggers: &[NodeIndex],
    reachable: &HashSet<NodeIndex>,
    downstream: &HashSet<NodeIndex>,
) -> Option<NodeIndex> {
    let usable = |idx: NodeIndex| {
        reachable.contains(&idx)
            && !downstream.contains(&idx)
            && graph.index_of(graph.name(idx)) == Some(idx)
    };
    let leaf = |idx: NodeIndex| usable(idx) && graph.outgoing_count(idx) == 0;

    tail.filter(|&t| leaf(t))
        .or_else(|| graph.graph.node_indices().rev().find(|&i| leaf(i)))
        .or_else(|| triggers.iter().copied().find(|&t| usable(t)))
}
