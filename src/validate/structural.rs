//! Critical graph rules: trigger, referential integrity, reachability,
//! acyclicity.

use petgraph::graph::NodeIndex;

use super::RuleContext;
use crate::report::{Classification, Issue, IssueDetails};

pub fn trigger_exists(ctx: &RuleContext<'_>) -> Vec<Issue> {
    if ctx.workflow.nodes.iter().any(|n| n.is_trigger()) {
        return vec![];
    }
    vec![Issue::new(
        Classification::MissingTrigger,
        "Workflow has no trigger node",
        IssueDetails::None,
    )]
}

pub fn connections_resolve(ctx: &RuleContext<'_>) -> Vec<Issue> {
    ctx.graph
        .dangling
        .iter()
        .map(|d| {
            let message = match &d.target {
                Some(target) => format!(
                    "Connection from '{}' references unknown node '{}'",
                    d.source, target
                ),
                None => format!("Connections declared for unknown node '{}'", d.source),
            };
            Issue::new(
                Classification::InvalidConnection,
                message,
                IssueDetails::DanglingEdge {
                    source: d.source.clone(),
                    output: d.output,
                    target: d.target.clone(),
                },
            )
        })
        .collect()
}

/// Passes trivially without a trigger; that defect is reported on its own.
pub fn all_reachable(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let triggers = ctx.graph.trigger_indices(ctx.workflow);
    if triggers.is_empty() {
        return vec![];
    }
    let reachable = ctx.graph.reachable_from(triggers);

    let orphans: Vec<String> = ctx
        .workflow
        .nodes
        .iter()
        .enumerate()
        .filter(|(i, n)| !n.is_trigger() && !reachable.contains(&NodeIndex::new(*i)))
        .map(|(_, n)| n.name.clone())
        .collect();

    if orphans.is_empty() {
        return vec![];
    }
    vec![Issue::new(
        Classification::OrphanedNodes,
        format!(
            "{} node(s) not reachable from any trigger: {}",
            orphans.len(),
            orphans.join(", ")
        ),
        IssueDetails::Orphans { nodes: orphans },
    )]
}

pub fn acyclic(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(cycle) = ctx.graph.find_cycle() else {
        return vec![];
    };
    let path: Vec<String> = cycle
        .into_iter()
        .map(|idx| ctx.graph.name(idx).to_string())
        .collect();

    vec![Issue::new(
        Classification::CircularDependency,
        format!("Cycle detected: {}", path.join(" -> ")),
        IssueDetails::Cycle { path },
    )]
}
